use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::mission::CommandSequencer;
use crate::domains::rover::{DynClock, DynReporter, ObstacleField, RoverState};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed obstacles from the config, then any randomly scattered extras.
pub fn build_field(config: &Config, logger: &DynLogger) -> Result<ObstacleField> {
    let world = config.world()?;
    let mut field = ObstacleField::with_seeds(world, &config.world.obstacles)?;

    if config.world.random_obstacles > 0 {
        let mut rng = match config.world.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let start = world.wrap(config.start_position());
        let placed = field.scatter(config.world.random_obstacles, start, &mut rng)?;
        if placed < config.world.random_obstacles {
            logger.warn(&format!(
                "Grid full: placed {} of {} random obstacles",
                placed, config.world.random_obstacles
            ));
        }
    }

    if !field.is_path_clear(config.start_position()) {
        logger.warn(&format!(
            "Rover starts on an obstacle cell {}",
            world.wrap(config.start_position())
        ));
    }

    logger.info(&format!(
        "Obstacle field ready: {} obstacles on a {}x{} grid",
        field.len(),
        world.size(),
        world.size()
    ));
    Ok(field)
}

pub fn build_rover(config: &Config) -> Result<RoverState> {
    let rover = RoverState::new(
        config.rover.id.clone(),
        config.world()?,
        config.start_position(),
        config.rover.orientation,
        config.rover.battery,
        config.energy_costs(),
    )?;
    Ok(rover)
}

pub fn build_sequencer(
    config: &Config,
    clock: DynClock,
    reporter: DynReporter,
    logger: DynLogger,
) -> Result<CommandSequencer> {
    config.validate()?;
    let field = build_field(config, &logger)?;
    let rover = build_rover(config)?;

    Ok(CommandSequencer::new(
        rover,
        field,
        clock,
        reporter,
        logger,
        config.sequencer_settings(),
    ))
}

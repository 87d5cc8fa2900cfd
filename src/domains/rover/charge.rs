use serde::{Deserialize, Serialize};

pub const MAX_BATTERY: u8 = 100;

/// Battery levels the solar recharge passes through, in order.
pub const CHARGE_CHECKPOINTS: [u8; 2] = [50, MAX_BATTERY];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargePhase {
    AlreadyFull,
    Charging { next: usize },
    Done,
}

/// Recharge as an explicit state machine: each `next()` yields the battery
/// level of the following checkpoint, so the caller decides how long to wait
/// between them.
#[derive(Debug, Clone)]
pub struct ChargeCycle {
    phase: ChargePhase,
}

impl ChargeCycle {
    pub fn start(level: u8) -> Self {
        let phase = if level >= MAX_BATTERY {
            ChargePhase::AlreadyFull
        } else {
            let next = CHARGE_CHECKPOINTS
                .iter()
                .position(|checkpoint| *checkpoint > level)
                .unwrap_or(CHARGE_CHECKPOINTS.len() - 1);
            ChargePhase::Charging { next }
        };
        Self { phase }
    }

    pub fn phase(&self) -> ChargePhase {
        self.phase
    }

    pub fn is_already_full(&self) -> bool {
        self.phase == ChargePhase::AlreadyFull
    }
}

impl Iterator for ChargeCycle {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self.phase {
            ChargePhase::Charging { next } => {
                let level = CHARGE_CHECKPOINTS[next];
                self.phase = if next + 1 < CHARGE_CHECKPOINTS.len() {
                    ChargePhase::Charging { next: next + 1 }
                } else {
                    ChargePhase::Done
                };
                Some(level)
            }
            ChargePhase::AlreadyFull | ChargePhase::Done => None,
        }
    }
}

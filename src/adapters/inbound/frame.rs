use crate::common::DomainResult;
use crate::domains::rover::Command;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Frame {
    Sequence(Vec<Command>),
    Single(Command),
}

/// Decodes a transport frame: either a JSON array of commands or one command object.
/// Unknown command kinds survive decoding as `Unrecognized`.
pub fn decode_command_frame(frame: &str) -> DomainResult<Vec<Command>> {
    let commands = match serde_json::from_str::<Frame>(frame)? {
        Frame::Sequence(commands) => commands,
        Frame::Single(command) => vec![command],
    };
    Ok(commands)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Command kinds understood by the rover. Tokens that match none of them are
/// kept as `Unrecognized` so a sequence can skip them without failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandKind {
    MoveForward,
    MoveBackward,
    TurnLeft,
    TurnRight,
    Charge,
    Scan,
    ReturnToBase,
    Unrecognized(String),
}

impl CommandKind {
    /// Accepts canonical names in snake_case or CamelCase (any case), and the
    /// single-letter mission-control tokens Z/S/Q/D/R.
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        match trimmed {
            "Z" | "z" => return CommandKind::MoveForward,
            "S" | "s" => return CommandKind::MoveBackward,
            "Q" | "q" => return CommandKind::TurnLeft,
            "D" | "d" => return CommandKind::TurnRight,
            "R" | "r" => return CommandKind::Charge,
            _ => {}
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "moveforward" | "forward" => CommandKind::MoveForward,
            "movebackward" | "backward" => CommandKind::MoveBackward,
            "turnleft" | "left" => CommandKind::TurnLeft,
            "turnright" | "right" => CommandKind::TurnRight,
            "charge" | "recharge" => CommandKind::Charge,
            "scan" => CommandKind::Scan,
            "returntobase" | "return" => CommandKind::ReturnToBase,
            _ => CommandKind::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CommandKind::MoveForward => "move_forward",
            CommandKind::MoveBackward => "move_backward",
            CommandKind::TurnLeft => "turn_left",
            CommandKind::TurnRight => "turn_right",
            CommandKind::Charge => "charge",
            CommandKind::Scan => "scan",
            CommandKind::ReturnToBase => "return_to_base",
            CommandKind::Unrecognized(token) => token,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, CommandKind::Unrecognized(_))
    }
}

impl From<String> for CommandKind {
    fn from(token: String) -> Self {
        CommandKind::parse(&token)
    }
}

impl From<CommandKind> for String {
    fn from(kind: CommandKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub kind: CommandKind,
    pub timestamp: DateTime<Utc>,
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(CommandKind::parse(token))
    }

    pub fn sequence(kinds: impl IntoIterator<Item = CommandKind>) -> Vec<Command> {
        kinds.into_iter().map(Command::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_tokens() {
        assert_eq!(CommandKind::parse("move_forward"), CommandKind::MoveForward);
        assert_eq!(CommandKind::parse("MoveBackward"), CommandKind::MoveBackward);
        assert_eq!(CommandKind::parse("Q"), CommandKind::TurnLeft);
        assert_eq!(CommandKind::parse("d"), CommandKind::TurnRight);
        assert_eq!(CommandKind::parse("R"), CommandKind::Charge);
        assert_eq!(CommandKind::parse("scan"), CommandKind::Scan);
        assert_eq!(CommandKind::parse("return"), CommandKind::ReturnToBase);
        assert_eq!(
            CommandKind::parse("jump"),
            CommandKind::Unrecognized("jump".to_string())
        );
    }

    #[test]
    fn command_wire_shape_uses_plain_kind_strings() {
        let command = Command::new(CommandKind::TurnLeft);
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["kind"], "turn_left");

        let parsed: Command = serde_json::from_str(
            r#"{"id":"c-1","kind":"warp","timestamp":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, "c-1");
        assert!(!parsed.kind.is_recognized());
    }
}

use std::fmt;
use std::str::FromStr;

use super::SwitchError;

/// Byte the relay firmware treats as "close the contact".
pub const ON_BYTE: u8 = b'a';
/// Byte the relay firmware treats as "open the contact".
pub const OFF_BYTE: u8 = b'b';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    On,
    Off,
}

impl Command {
    pub fn byte(self) -> u8 {
        match self {
            Command::On => ON_BYTE,
            Command::Off => OFF_BYTE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::On => "On",
            Command::Off => "Off",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Command {
    type Err = SwitchError;

    /// Only the exact labels are accepted; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" => Ok(Command::On),
            "Off" => Ok(Command::Off),
            other => Err(SwitchError::InvalidCommand(other.to_string())),
        }
    }
}

/// Result of a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub command: Command,
    /// Raw bytes the device sent back; observed, not interpreted.
    pub acknowledgment: Vec<u8>,
}

impl SwitchOutcome {
    pub fn label(&self) -> &'static str {
        self.command.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_labels_only() {
        assert_eq!("On".parse::<Command>().unwrap(), Command::On);
        assert_eq!("Off".parse::<Command>().unwrap(), Command::Off);

        for bad in ["on", "OFF", " On", "Off\n", "toggle", ""] {
            assert!(
                matches!(bad.parse::<Command>(), Err(SwitchError::InvalidCommand(ref s)) if s == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn commands_map_to_distinct_bytes() {
        assert_eq!(Command::On.byte(), 0x61);
        assert_eq!(Command::Off.byte(), 0x62);
        assert_eq!(Command::Off.to_string(), "Off");
    }
}

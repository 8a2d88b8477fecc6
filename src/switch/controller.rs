use crate::serial::{SerialInterface, Transport};

use super::{Command, Result, SwitchOutcome};

/// Turns logical switch commands into serial transactions.
///
/// Holds no switch state: every call re-runs the transaction against the
/// device, so repeating a command is safe.
pub struct SwitchController<T = SerialInterface> {
    transport: T,
}

impl<T: Transport> SwitchController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Parse a raw request value and apply it.
    ///
    /// Unrecognized input is rejected before the transport is touched.
    pub fn apply_input(&self, input: &str) -> Result<SwitchOutcome> {
        let command: Command = input.parse()?;
        self.apply(command)
    }

    /// Run one transaction for `command`. Transport errors are returned as is.
    pub fn apply(&self, command: Command) -> Result<SwitchOutcome> {
        let acknowledgment = self.transport.transact(command.byte()).map_err(|e| {
            log::warn!("Switch {} not applied: {}", command, e);
            e
        })?;

        log::info!(
            "Switch {} acknowledged with {}",
            command,
            describe_acknowledgment(&acknowledgment)
        );
        Ok(SwitchOutcome { command, acknowledgment })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Quoted, escaped rendering of raw device bytes for the log.
pub fn describe_acknowledgment(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}

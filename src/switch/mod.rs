pub mod controller;
pub mod models;

pub use controller::SwitchController;
pub use models::*;

#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("Unrecognized switch command: {0:?}")]
    InvalidCommand(String),

    #[error("Serial communication error: {0}")]
    Serial(#[from] crate::serial::SerialError),
}

impl SwitchError {
    /// True when the device, not the caller, is at fault.
    pub fn is_transport(&self) -> bool {
        matches!(self, SwitchError::Serial(_))
    }
}

pub type Result<T> = std::result::Result<T, SwitchError>;

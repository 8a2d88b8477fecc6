pub mod interface;
pub mod mock;

pub use interface::{SerialInterface, SerialLink};
pub use mock::MockLink;

/// Upper bound on the acknowledgment read back after a command byte.
pub const MAX_RESPONSE_LEN: usize = 128;

/// Baud rate the relay firmware listens on unless told otherwise.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("Connection failed on {port}: {source}")]
    Connection {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("Read failed: {0}")]
    Read(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// One write-then-bounded-read cycle against a serial device.
///
/// Implementations must not let two transactions interleave on the wire.
pub trait Transport: Send + Sync {
    fn transact(&self, command: u8) -> Result<Vec<u8>>;
}


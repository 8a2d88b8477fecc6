use std::io::{self, Read, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::{Result, SerialError, Transport, MAX_RESPONSE_LEN};

/// Byte channel the interface drives: a real serial port or an in-process stand-in.
pub trait SerialLink: Read + Write + Send {}

impl<T: Read + Write + Send + ?Sized> SerialLink for T {}

/// Exclusive owner of the connection to the relay device.
///
/// The link sits behind a mutex held for the whole write+read pair, so
/// concurrent callers queue instead of interleaving bytes on the wire.
pub struct SerialInterface {
    port_name: String,
    link: Mutex<Box<dyn SerialLink>>,
}

impl SerialInterface {
    /// Open the device at `port_name`.
    ///
    /// The port is configured 8N1 without flow control. `read_timeout` bounds
    /// how long a transaction waits for the acknowledgment.
    pub fn open(port_name: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|source| SerialError::Connection {
                port: port_name.to_string(),
                source,
            })?;

        log::info!("Opened serial port {} at {} baud", port_name, baud_rate);
        Ok(Self::from_link(port_name, Box::new(port)))
    }

    /// Wrap an already open link.
    pub fn from_link(port_name: &str, link: Box<dyn SerialLink>) -> Self {
        Self {
            port_name: port_name.to_string(),
            link: Mutex::new(link),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Release the port. Consuming `self` makes a second close impossible.
    pub fn close(self) {
        log::info!("Closing serial port {}", self.port_name);
        drop(self.link);
    }
}

impl Transport for SerialInterface {
    fn transact(&self, command: u8) -> Result<Vec<u8>> {
        // A panic mid-transaction leaves nothing in the link worth protecting.
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);

        log::debug!("Writing command byte {:#04x} to {}", command, self.port_name);
        let written = link.write(&[command]).map_err(SerialError::Write)?;
        if written != 1 {
            return Err(SerialError::Write(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {} of 1 command bytes", written),
            )));
        }
        link.flush().map_err(SerialError::Write)?;

        let mut buffer = [0u8; MAX_RESPONSE_LEN];
        let bytes_read = match link.read(&mut buffer) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                log::debug!("No acknowledgment from {} before read timeout", self.port_name);
                0
            }
            Err(e) => return Err(SerialError::Read(e)),
        };

        Ok(buffer[..bytes_read].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::mock::{LinkEvent, MockLink};

    fn interface(link: &MockLink) -> SerialInterface {
        SerialInterface::from_link("mock", Box::new(link.clone()))
    }

    #[test]
    fn writes_one_byte_then_reads_bounded() {
        let link = MockLink::replying(b"ok\r\n");
        let response = interface(&link).transact(b'a').unwrap();

        assert_eq!(response, b"ok\r\n");
        assert_eq!(
            link.events(),
            vec![
                LinkEvent::Write(vec![b'a']),
                LinkEvent::Read { capacity: MAX_RESPONSE_LEN, returned: 4 },
            ]
        );
    }

    #[test]
    fn long_acknowledgment_is_truncated_to_max_len() {
        let link = MockLink::replying(&[0x55; 200]);
        let response = interface(&link).transact(b'b').unwrap();
        assert_eq!(response.len(), MAX_RESPONSE_LEN);
    }

    #[test]
    fn read_timeout_is_empty_acknowledgment() {
        let link = MockLink::silent();
        let response = interface(&link).transact(b'a').unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn zero_byte_read_is_empty_acknowledgment() {
        let link = MockLink::zero_length();
        let response = interface(&link).transact(b'b').unwrap();

        assert!(response.is_empty());
        assert_eq!(
            link.events(),
            vec![
                LinkEvent::Write(vec![b'b']),
                LinkEvent::Read { capacity: MAX_RESPONSE_LEN, returned: 0 },
            ]
        );
    }

    #[test]
    fn short_write_fails_without_reading() {
        let link = MockLink::echo().short_writes();
        let err = interface(&link).transact(b'a').unwrap_err();

        match err {
            SerialError::Write(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            other => panic!("expected write error, got {other:?}"),
        }
        assert_eq!(link.reads(), 0, "read must not follow a failed write");
    }

    #[test]
    fn write_error_fails_without_reading() {
        let link = MockLink::echo().failing_writes(io::ErrorKind::BrokenPipe);
        let err = interface(&link).transact(b'b').unwrap_err();

        assert!(matches!(err, SerialError::Write(_)));
        assert_eq!(link.reads(), 0);
    }

    #[test]
    fn read_error_is_reported() {
        let link = MockLink::echo().failing_reads(io::ErrorKind::BrokenPipe);
        let err = interface(&link).transact(b'a').unwrap_err();
        assert!(matches!(err, SerialError::Read(_)));
    }

    #[test]
    fn connection_survives_failed_transaction() {
        let link = MockLink::echo().failing_reads(io::ErrorKind::Other);
        let interface = interface(&link);

        assert!(interface.transact(b'a').is_err());
        link.clear_failures();
        let response = interface.transact(b'b').unwrap();
        assert_eq!(response.last(), Some(&b'b'));
        assert_eq!(link.writes(), 2);
    }
}

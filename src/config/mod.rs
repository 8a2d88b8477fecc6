//! Runtime settings, fixed at startup.
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address: {0:?}")]
    InvalidListenAddr(String),

    #[error("Baud rate must be greater than zero")]
    ZeroBaudRate,

    #[error("Read timeout must be greater than zero")]
    ZeroReadTimeout,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the serial commands go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSource {
    Port { path: String, baud_rate: u32 },
    /// In-process echo device, no hardware needed.
    Mock,
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub listen_addr: SocketAddr,
    pub device: DeviceSource,
    pub read_timeout: Duration,
    /// Serve the UI from here instead of the built-in copy.
    pub static_dir: Option<PathBuf>,
}

impl BridgeConfig {
    pub fn new(
        listen_addr: &str,
        device: DeviceSource,
        read_timeout: Duration,
        static_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let DeviceSource::Port { baud_rate: 0, .. } = device {
            return Err(ConfigError::ZeroBaudRate);
        }
        if read_timeout.is_zero() {
            return Err(ConfigError::ZeroReadTimeout);
        }

        Ok(Self {
            listen_addr: parse_listen_addr(listen_addr)?,
            device,
            read_timeout,
            static_dir,
        })
    }
}

/// Accepts `host:port`, `:port` (all interfaces) or a bare port number.
pub fn parse_listen_addr(raw: &str) -> Result<SocketAddr> {
    let invalid = || ConfigError::InvalidListenAddr(raw.to_string());
    let all_interfaces = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    if let Some(port) = raw.strip_prefix(':') {
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        return Ok(SocketAddr::new(all_interfaces, port));
    }
    if let Ok(port) = raw.parse::<u16>() {
        return Ok(SocketAddr::new(all_interfaces, port));
    }
    raw.parse::<SocketAddr>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_forms() {
        assert_eq!(parse_listen_addr(":8080").unwrap(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(parse_listen_addr("3000").unwrap(), "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            parse_listen_addr("127.0.0.1:9000").unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(parse_listen_addr("[::1]:80").unwrap(), "[::1]:80".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_bad_listen_addr() {
        for raw in ["", ":", ":http", "localhost", "1.2.3.4", ":70000"] {
            assert!(
                matches!(parse_listen_addr(raw), Err(ConfigError::InvalidListenAddr(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn validates_port_settings() {
        let port = |baud_rate| DeviceSource::Port { path: "/dev/ttyUSB0".into(), baud_rate };
        let timeout = Duration::from_millis(1000);

        assert!(matches!(
            BridgeConfig::new(":8080", port(0), timeout, None),
            Err(ConfigError::ZeroBaudRate)
        ));
        assert!(matches!(
            BridgeConfig::new(":8080", port(9600), Duration::ZERO, None),
            Err(ConfigError::ZeroReadTimeout)
        ));

        let config = BridgeConfig::new(":8080", port(9600), timeout, None).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.device, port(9600));
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn mock_device_skips_baud_check() {
        let config =
            BridgeConfig::new("8080", DeviceSource::Mock, Duration::from_secs(1), None);
        assert!(config.is_ok());
    }
}

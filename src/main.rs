use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use relay_bridge_lib::config::{BridgeConfig, DeviceSource};
use relay_bridge_lib::serial::DEFAULT_BAUD_RATE;

/// Switch a serial-attached relay over HTTP
#[derive(Parser, Debug)]
#[command(name = "relay-bridge", version, about, long_about = None)]
struct Args {
    /// Address to listen on (`host:port`, `:port` or a bare port)
    #[arg(value_name = "LISTEN_ADDR")]
    listen_addr: String,

    /// Serial device the relay is attached to (ignored with --mock)
    #[arg(value_name = "SERIAL_PORT", required_unless_present = "mock")]
    serial_port: Option<String>,

    /// Serial line speed
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,

    /// How long to wait for the device's acknowledgment
    #[arg(long, default_value_t = 1000)]
    read_timeout_ms: u64,

    /// Serve the browser UI from this directory instead of the built-in copy
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Use an in-process echo device instead of a serial port
    #[arg(long)]
    mock: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> relay_bridge_lib::config::Result<BridgeConfig> {
        let device = match (self.mock, self.serial_port) {
            (false, Some(path)) => DeviceSource::Port { path, baud_rate: self.baud_rate },
            _ => DeviceSource::Mock,
        };
        BridgeConfig::new(
            &self.listen_addr,
            device,
            Duration::from_millis(self.read_timeout_ms),
            self.static_dir,
        )
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = relay_bridge_lib::run(config).await {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

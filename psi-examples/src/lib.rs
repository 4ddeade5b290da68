//! Command-line plumbing shared by the example binaries.

use bilinear_psi::config::{DEFAULT_PORT, MAX_LOG_SIZE};
use bilinear_psi::params::DEFAULT_SHARED_SCALAR;
use bilinear_psi::{NonceMode, ProtocolConfig};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Options common to the Sender and the Receiver.
#[derive(Parser, Debug)]
#[clap(version, about = "Pairing-based private set intersection")]
pub struct Cli {
    /// Sender's address
    #[clap(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Sender's port
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Sender holds N = 2^n items
    #[clap(short, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=MAX_LOG_SIZE as i64))]
    pub n: u32,

    /// Receiver holds M = 2^m items
    #[clap(short, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=MAX_LOG_SIZE as i64))]
    pub m: u32,

    /// Hex literal for the shared scalar s; both parties must use the same one
    #[clap(long, default_value = DEFAULT_SHARED_SCALAR)]
    pub shared_scalar: String,

    /// Socket read/write deadline in seconds; 0 waits forever
    #[clap(long, default_value_t = 0)]
    pub timeout_secs: u64,

    /// Receiver key derivation: shared, per-item or direct
    #[clap(long, default_value_t = NonceMode::Shared)]
    pub nonce: NonceMode,
}

impl Cli {
    pub fn into_config(self) -> ProtocolConfig {
        ProtocolConfig {
            host: self.host,
            port: self.port,
            log_n: self.n,
            log_m: self.m,
            shared_scalar: self.shared_scalar,
            io_timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            nonce_mode: self.nonce,
        }
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_config() {
        let cli = Cli::parse_from(["sender"]);
        assert_eq!(cli.into_config(), ProtocolConfig::default());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "receiver", "-p", "4000", "-n", "3", "-m", "5", "--timeout-secs", "10", "--nonce", "direct",
        ]);
        let config = cli.into_config();
        assert_eq!(config.port, 4000);
        assert_eq!(config.set_sizes().unwrap(), (8, 32));
        assert_eq!(config.io_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.nonce_mode, NonceMode::Direct);
    }

    #[test]
    fn test_rejects_oversized_exponent() {
        assert!(Cli::try_parse_from(["sender", "-n", "40"]).is_err());
    }
}

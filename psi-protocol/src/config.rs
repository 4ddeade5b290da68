//! Run configuration shared by both roles.

use crate::error::{PsiError, Result};
use crate::params::DEFAULT_SHARED_SCALAR;
use crate::receiver::NonceMode;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 1234;

/// Largest accepted set-size exponent.
pub const MAX_LOG_SIZE: u32 = 24;

/// Everything a role needs to run one session.
///
/// Both peers must agree on `log_n`, `log_m` and `shared_scalar`; the
/// session header catches a disagreement before any digest is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Sender's address
    pub host: IpAddr,
    pub port: u16,
    /// N = 2^log_n
    pub log_n: u32,
    /// M = 2^log_m
    pub log_m: u32,
    /// Hex literal for the shared scalar `s`
    pub shared_scalar: String,
    /// Read/write deadline on the socket; `None` blocks indefinitely
    pub io_timeout: Option<Duration>,
    pub nonce_mode: NonceMode,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            log_n: 2,
            log_m: 2,
            shared_scalar: DEFAULT_SHARED_SCALAR.to_string(),
            io_timeout: None,
            nonce_mode: NonceMode::default(),
        }
    }
}

impl ProtocolConfig {
    /// `(N, M)`.
    ///
    /// # Errors
    /// Returns `PsiError::Initialization` if an exponent exceeds [`MAX_LOG_SIZE`].
    pub fn set_sizes(&self) -> Result<(usize, usize)> {
        Ok((size_from_log(self.log_n, "n")?, size_from_log(self.log_m, "m")?))
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn size_from_log(log: u32, name: &str) -> Result<usize> {
    if log > MAX_LOG_SIZE {
        return Err(PsiError::Initialization(format!(
            "{name} = {log} exceeds the maximum of {MAX_LOG_SIZE}"
        )));
    }
    Ok(1usize << log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProtocolConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:1234");
        assert_eq!(config.set_sizes().unwrap(), (4, 4));
        assert_eq!(config.io_timeout, None);
    }

    #[test]
    fn test_set_sizes() {
        let config = ProtocolConfig {
            log_n: 0,
            log_m: 10,
            ..Default::default()
        };
        assert_eq!(config.set_sizes().unwrap(), (1, 1024));
    }

    #[test]
    fn test_set_sizes_too_large() {
        let config = ProtocolConfig {
            log_m: MAX_LOG_SIZE + 1,
            ..Default::default()
        };
        assert!(matches!(config.set_sizes(), Err(PsiError::Initialization(_))));
    }
}

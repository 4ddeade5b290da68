//! PSI Receiver over TCP.
//!
//! Start the Sender first, then:
//! ```bash
//! cargo run --bin receiver -- -p 1234 -n 4 -m 4
//! ```

use bilinear_psi::query;
use bilinear_psi_examples::{init_logging, Cli};
use clap::Parser;
use rand::rngs::OsRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = Cli::parse().into_config();
    let (n, m) = config.set_sizes()?;

    tracing::info!(n, m, addr = %config.socket_addr(), nonce = %config.nonce_mode, "semi-honest model - receiver");

    match query(&config, &mut OsRng) {
        Ok(result) => {
            tracing::info!(
                intersection = result.len(),
                positions = ?result.matched_positions,
                "receiver finished"
            );
            println!("Intersection size: {}", result.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "receiver failed");
            Err(e.into())
        }
    }
}

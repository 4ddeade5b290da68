//! PSI Sender over TCP.
//!
//! Run the Sender first:
//! ```bash
//! cargo run --bin sender -- -p 1234 -n 4 -m 4
//! ```
//! then the Receiver with the same `-n`/`-m` (see `receiver.rs`).

use bilinear_psi::serve;
use bilinear_psi_examples::{init_logging, Cli};
use clap::Parser;
use rand::rngs::OsRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = Cli::parse().into_config();
    let (n, m) = config.set_sizes()?;

    tracing::info!(n, m, addr = %config.socket_addr(), "semi-honest model - sender");

    match serve(&config, &mut OsRng) {
        Ok(report) => {
            tracing::info!(
                published = report.published,
                receiver_items = report.receiver_items,
                "sender finished"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "sender failed");
            Err(e.into())
        }
    }
}

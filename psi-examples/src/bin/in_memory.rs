//! In-memory example of PSI protocol execution.
//!
//! Runs both roles in one process, passing the Sender's message to the
//! Receiver directly instead of over the network.
//!
//! Run with:
//! ```bash
//! cargo run --bin in_memory
//! ```

use bilinear_psi::crypto::random_scalar;
use bilinear_psi::params::DEFAULT_SHARED_SCALAR;
use bilinear_psi::{CommonParams, NonceMode, PublishMessage, ReceiverSession, SenderSession};
use bilinear_psi_examples::init_logging;
use rand::rngs::OsRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let mut rng = OsRng;

    let params = CommonParams::derive(DEFAULT_SHARED_SCALAR)?;
    println!("=== PSI Protocol In-Memory Example ===\n");

    let sender_items: Vec<Vec<u8>> = vec![
        b"sender_secret_1".to_vec(),
        b"shared_secret_1".to_vec(),
        b"sender_secret_2".to_vec(),
        b"shared_secret_2".to_vec(),
    ];
    let receiver_items: Vec<Vec<u8>> = vec![
        b"receiver_secret_1".to_vec(),
        b"shared_secret_1".to_vec(),
        b"receiver_secret_2".to_vec(),
        b"shared_secret_2".to_vec(),
    ];

    // === Phase 1: Blinding and registration ===
    let sender = SenderSession::from_bytes(&params, &sender_items)?.blind(&mut rng)?;
    println!("Sender blinded {} items", sender.len());

    let receiver =
        ReceiverSession::from_bytes(&params, &receiver_items)?.register(NonceMode::Shared, &mut rng)?;
    println!("Receiver registered {} items", receiver.len());

    // === Phase 2: Publish ===
    // Over a network this is the byte string the Sender writes after the handshake.
    let wire = sender.message().encode()?;
    println!("Sender publishes {} bytes", wire.len());
    let message = PublishMessage::decode(&wire, sender_items.len())?;

    // === Phase 3: Match ===
    let result = receiver.finalize(message)?;
    println!("\nIntersection size: {}", result.len());
    for &i in &result.matched_positions {
        println!("  {}", String::from_utf8_lossy(&receiver_items[i]));
    }

    // === Larger random sets ===
    println!("\n=== Random Sets: 64 + 64 with 10 shared ===");
    let shared: Vec<_> = (0..10).map(|_| random_scalar(&mut rng)).collect();
    let mut x: Vec<_> = (0..54).map(|_| random_scalar(&mut rng)).collect();
    let mut y: Vec<_> = (0..54).map(|_| random_scalar(&mut rng)).collect();
    x.extend(&shared);
    y.extend(&shared);

    let sender = SenderSession::new(&params, x).blind(&mut rng)?;
    let result = ReceiverSession::new(&params, y)
        .register(NonceMode::Direct, &mut rng)?
        .finalize(sender.message())?;
    println!("Intersection size: {} (expected: {})", result.len(), shared.len());

    Ok(())
}

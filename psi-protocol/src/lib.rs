//! # Pairing-based Private Set Intersection
//!
//! This library implements a two-party Private Set Intersection (PSI)
//! protocol over the BLS12-381 pairing groups (arkworks).
//!
//! A Sender holding a set X and a Receiver holding a set Y compute `X ∩ Y`
//! on the Receiver side. Only the Receiver learns the result; the Sender
//! learns nothing beyond the size of Y. The adversary model is semi-honest.
//!
//! ## Protocol Overview
//!
//! 1. **Common parameters**: both parties derive `(g1, g2, p, s, Gamma = g2^s)`
//!    from the same configured literal. `s` is known to both parties.
//!
//! 2. **Sender blinding**: the Sender draws a session randomizer `r`, publishes
//!    `ψ = g2^r` and computes `R_i = H(e(HashToG1(x_i), Gamma^r))` for each item.
//!
//! 3. **Receiver registration**: the Receiver computes
//!    `K_i = ((HashToG1(y_i)^ρ)^s)^(ρ^-1) = HashToG1(y_i)^s`.
//!
//! 4. **Exchange**: the Receiver sends the readiness token and a header with
//!    N, M and the parameter fingerprint; the Sender answers with its header,
//!    then `ψ` and its N digests.
//!
//! 5. **Matching**: the Receiver sorts the digests and binary-searches
//!    `H(e(K_i, ψ))` for each of its items.
//!
//! ## Example Usage
//!
//! ```ignore
//! use bilinear_psi::{CommonParams, NonceMode, ReceiverSession, SenderSession};
//! use bilinear_psi::params::DEFAULT_SHARED_SCALAR;
//!
//! let params = CommonParams::derive(DEFAULT_SHARED_SCALAR)?;
//! let mut rng = rand::rngs::OsRng;
//!
//! let sender = SenderSession::from_bytes(&params, &[b"apple".to_vec(), b"banana".to_vec()])?
//!     .blind(&mut rng)?;
//! let receiver = ReceiverSession::from_bytes(&params, &[b"banana".to_vec(), b"cherry".to_vec()])?
//!     .register(NonceMode::Shared, &mut rng)?;
//!
//! // send_to_receiver(sender.message());
//! let result = receiver.finalize(sender.message())?;
//! assert_eq!(result.len(), 1);
//! # Ok::<(), bilinear_psi::PsiError>(())
//! ```
//!
//! ## Security Considerations
//!
//! - `s` is a public protocol parameter, not a secret between the parties.
//! - The Receiver's blind/unblind nonce cancels exactly; [`NonceMode::Direct`]
//!   skips it with identical output.
//! - The transport is plain TCP; wrap it in TLS against network attackers.
//!
//! ## Modules
//!
//! - [`crypto`] - Hash-to-G1, GT digests and wire encodings
//! - [`params`] - Common parameter derivation
//! - [`sender`] / [`receiver`] - The two roles
//! - [`matcher`] - Sorted digest lookup
//! - [`messages`] - Wire message types
//! - [`transport`] - Fixed-width framing over TCP
//! - [`protocol`] - Full-session drivers
//! - [`config`] - Run configuration
//! - [`error`] - Error types

pub use config::ProtocolConfig;
pub use crypto::Digest;
pub use error::{PsiError, Result};
pub use matcher::DigestIndex;
pub use messages::{PsiResult, PublishMessage, SessionHeader};
pub use params::CommonParams;
pub use protocol::{query, run_receiver, run_sender, serve, SenderReport};
pub use receiver::{NonceMode, ReceiverSession, RegisteredReceiver};
pub use sender::{BlindedSender, SenderSession};
pub use transport::Channel;

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod messages;
pub mod params;
pub mod protocol;
pub mod receiver;
pub mod sender;
pub mod transport;

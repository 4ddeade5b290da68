//! Straight-line drivers for both roles.
//!
//! Each driver runs the whole exchange as one sequence of blocking steps.
//! Any error ends the session; no partial result is reported.

use crate::config::ProtocolConfig;
use crate::error::{PsiError, Result};
use crate::messages::{PsiResult, PublishMessage, SessionHeader, HEADER_LEN, READY_TOKEN};
use crate::params::CommonParams;
use crate::receiver::{NonceMode, ReceiverSession};
use crate::sender::SenderSession;
use crate::transport::{self, Channel};
use rand::{CryptoRng, Rng};
use std::io::{Read, Write};
use std::time::Instant;

/// What the Sender learns from a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderReport {
    /// Digests published, always N
    pub published: usize,
    /// Receiver set size confirmed by the peer's header
    pub receiver_items: usize,
}

/// Sender side of one session over an established channel.
///
/// Blinds the set, waits for the Receiver's readiness token and header,
/// answers with its own header and then publishes `ψ` and the digests.
///
/// # Errors
/// `PsiError::InvalidToken` or `PsiError::ProtocolMismatch` if the Receiver
/// disagrees on the session, `PsiError::Transport` on any I/O failure.
pub fn run_sender<S, R>(
    params: &CommonParams,
    channel: &mut Channel<S>,
    session: SenderSession<'_>,
    receiver_items: usize,
    rng: &mut R,
) -> Result<SenderReport>
where
    S: Read + Write,
    R: Rng + CryptoRng + ?Sized,
{
    let start = Instant::now();
    let blinded = session.blind(rng)?;
    tracing::info!(
        items = blinded.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "computation phase complete"
    );

    let token = channel.recv_fixed(READY_TOKEN.len())?;
    if token != READY_TOKEN {
        tracing::warn!(token = %String::from_utf8_lossy(&token), "unexpected readiness token");
        return Err(PsiError::InvalidToken);
    }
    let peer = SessionHeader::from_bytes(&channel.recv_array::<HEADER_LEN>()?);
    tracing::info!("connection complete");

    let ours = SessionHeader::new(blinded.len(), receiver_items, params.fingerprint()?);
    channel.send_fixed(&ours.to_bytes())?;
    channel.flush()?;
    if let Err(e) = ours.check_peer(&peer) {
        tracing::warn!(error = %e, "receiver disagrees on session parameters");
        return Err(e);
    }

    let start = Instant::now();
    channel.send_fixed(&blinded.message().encode()?)?;
    channel.flush()?;
    tracing::info!(
        digests = blinded.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "communication phase complete"
    );

    Ok(SenderReport {
        published: blinded.len(),
        receiver_items,
    })
}

/// Receiver side of one session over an established channel.
///
/// Registers the set, signals readiness with its header, checks the
/// Sender's header, reads `ψ` and exactly `sender_items` digests and
/// extracts the intersection.
///
/// # Errors
/// `PsiError::ProtocolMismatch` if the Sender disagrees on the session,
/// `PsiError::Transport` on any I/O failure including a short read.
pub fn run_receiver<S, R>(
    params: &CommonParams,
    channel: &mut Channel<S>,
    session: ReceiverSession<'_>,
    sender_items: usize,
    nonce_mode: NonceMode,
    rng: &mut R,
) -> Result<PsiResult>
where
    S: Read + Write,
    R: Rng + CryptoRng + ?Sized,
{
    let start = Instant::now();
    let registered = session.register(nonce_mode, rng)?;
    tracing::info!(
        items = registered.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "registration phase complete"
    );

    let ours = SessionHeader::new(sender_items, registered.len(), params.fingerprint()?);
    channel.send_fixed(READY_TOKEN)?;
    channel.send_fixed(&ours.to_bytes())?;
    channel.flush()?;

    let peer = SessionHeader::from_bytes(&channel.recv_array::<HEADER_LEN>()?);
    ours.check_peer(&peer)?;

    let start = Instant::now();
    let bytes = channel.recv_fixed(PublishMessage::wire_len(sender_items)?)?;
    let message = PublishMessage::decode(&bytes, sender_items)?;
    tracing::info!(
        digests = message.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "communication phase complete"
    );

    let start = Instant::now();
    let result = registered.finalize(message)?;
    tracing::info!(
        intersection = result.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "intersection extraction complete"
    );
    Ok(result)
}

/// Run the Sender with a random set of N items: derive the parameters,
/// accept one Receiver and publish.
pub fn serve<R>(config: &ProtocolConfig, rng: &mut R) -> Result<SenderReport>
where
    R: Rng + CryptoRng + ?Sized,
{
    let (n, m) = config.set_sizes()?;
    let params = CommonParams::derive(&config.shared_scalar)?;
    let (stream, _peer) = transport::listen(config.socket_addr())?;
    let mut channel = Channel::from_tcp(stream, config.io_timeout)?;

    let session = SenderSession::random(&params, n, rng);
    run_sender(&params, &mut channel, session, m, rng)
}

/// Run the Receiver with a random set of M items against the Sender at
/// `config.socket_addr()`.
pub fn query<R>(config: &ProtocolConfig, rng: &mut R) -> Result<PsiResult>
where
    R: Rng + CryptoRng + ?Sized,
{
    let (n, m) = config.set_sizes()?;
    let params = CommonParams::derive(&config.shared_scalar)?;
    let stream = transport::connect(config.socket_addr())?;
    let mut channel = Channel::from_tcp(stream, config.io_timeout)?;

    let session = ReceiverSession::random(&params, m, rng);
    run_receiver(&params, &mut channel, session, n, config.nonce_mode, rng)
}

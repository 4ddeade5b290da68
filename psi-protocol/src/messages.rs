//! Message types exchanged between the Sender and the Receiver.
//!
//! Every field on the wire is fixed-width; there are no length prefixes.
//! Sizes are known to both sides from configuration and cross-checked
//! through the [`SessionHeader`].

use crate::crypto::{decode_g2, encode_g2, g2_wire_len, Digest, DIGEST_LEN};
use crate::error::{PsiError, Result};
use ark_bls12_381::{Fr, G2Affine};

/// Readiness token the Receiver sends once its tokens are registered.
pub const READY_TOKEN: &[u8] = b"Start";

/// Encoded size of a [`SessionHeader`].
pub const HEADER_LEN: usize = 8 + 8 + DIGEST_LEN;

/// Set sizes and parameter fingerprint each side believes the session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader {
    /// N, the Sender's set size
    pub sender_items: u64,
    /// M, the Receiver's set size
    pub receiver_items: u64,
    /// Fingerprint of the common parameters
    pub fingerprint: Digest,
}

impl SessionHeader {
    pub fn new(sender_items: usize, receiver_items: usize, fingerprint: Digest) -> Self {
        Self {
            sender_items: sender_items as u64,
            receiver_items: receiver_items as u64,
            fingerprint,
        }
    }

    /// Big-endian `N || M || fingerprint`.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..8].copy_from_slice(&self.sender_items.to_be_bytes());
        out[8..16].copy_from_slice(&self.receiver_items.to_be_bytes());
        out[16..].copy_from_slice(self.fingerprint.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let mut n = [0u8; 8];
        let mut m = [0u8; 8];
        let mut fingerprint = [0u8; DIGEST_LEN];
        n.copy_from_slice(&bytes[..8]);
        m.copy_from_slice(&bytes[8..16]);
        fingerprint.copy_from_slice(&bytes[16..]);
        Self {
            sender_items: u64::from_be_bytes(n),
            receiver_items: u64::from_be_bytes(m),
            fingerprint: Digest(fingerprint),
        }
    }

    /// Compare the peer's header against ours.
    ///
    /// # Errors
    /// Returns `PsiError::ProtocolMismatch` naming the first field that differs.
    pub fn check_peer(&self, peer: &SessionHeader) -> Result<()> {
        if self.sender_items != peer.sender_items {
            return Err(PsiError::mismatch("N", self.sender_items, peer.sender_items));
        }
        if self.receiver_items != peer.receiver_items {
            return Err(PsiError::mismatch("M", self.receiver_items, peer.receiver_items));
        }
        if self.fingerprint != peer.fingerprint {
            return Err(PsiError::mismatch(
                "common parameters",
                hex::encode(self.fingerprint.as_bytes()),
                hex::encode(peer.fingerprint.as_bytes()),
            ));
        }
        Ok(())
    }
}

/// The Sender's published values: `ψ = g2^r` followed by its N digests.
///
/// Digests are kept in the Sender's item order; position carries no
/// meaning for the Receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishMessage {
    pub psi: G2Affine,
    pub digests: Vec<Digest>,
}

impl PublishMessage {
    pub fn new(psi: G2Affine, digests: Vec<Digest>) -> Self {
        Self { psi, digests }
    }

    /// Returns the number of digests in this message.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Encoded size of a message carrying `n` digests.
    ///
    /// # Errors
    /// Returns `PsiError::Precondition` if the size overflows `usize`.
    pub fn wire_len(n: usize) -> Result<usize> {
        n.checked_mul(DIGEST_LEN)
            .and_then(|d| d.checked_add(g2_wire_len()))
            .ok_or_else(|| PsiError::Precondition(format!("{n} digests do not fit in memory")))
    }

    /// `ψ || R_1 || .. || R_N`.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(Self::wire_len(self.digests.len())?);
        out.extend_from_slice(&encode_g2(&self.psi)?);
        for digest in &self.digests {
            out.extend_from_slice(digest.as_bytes());
        }
        Ok(out)
    }

    /// Decode a message that must carry exactly `n` digests.
    ///
    /// # Errors
    /// Returns `PsiError::Serialization` if the length is wrong or `ψ` is not a
    /// valid G2 point.
    pub fn decode(bytes: &[u8], n: usize) -> Result<Self> {
        let expected = Self::wire_len(n)?;
        if bytes.len() != expected {
            return Err(PsiError::Serialization(format!(
                "publish message must be {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let (psi_bytes, digest_bytes) = bytes.split_at(g2_wire_len());
        let psi = decode_g2(psi_bytes)?;
        let digests = digest_bytes
            .chunks_exact(DIGEST_LEN)
            .map(|chunk| {
                let mut d = [0u8; DIGEST_LEN];
                d.copy_from_slice(chunk);
                Digest(d)
            })
            .collect();
        Ok(Self { psi, digests })
    }
}

/// Final result of the PSI protocol on the Receiver side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsiResult {
    /// Receiver items found in the Sender's set
    pub matched_items: Vec<Fr>,
    /// Positions of those items in the Receiver's set
    pub matched_positions: Vec<usize>,
}

impl PsiResult {
    pub fn new(matched_items: Vec<Fr>, matched_positions: Vec<usize>) -> Self {
        Self {
            matched_items,
            matched_positions,
        }
    }

    /// Returns the size of the intersection.
    pub fn len(&self) -> usize {
        self.matched_items.len()
    }

    /// Returns true if the intersection is empty.
    pub fn is_empty(&self) -> bool {
        self.matched_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::{AffineRepr, CurveGroup};

    fn sample_psi() -> G2Affine {
        (G2Affine::generator() * Fr::from(11u64)).into_affine()
    }

    #[test]
    fn test_header_layout() {
        let header = SessionHeader::new(4, 8, Digest([7u8; DIGEST_LEN]));
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..8], &4u64.to_be_bytes());
        assert_eq!(&bytes[8..16], &8u64.to_be_bytes());
        assert_eq!(&bytes[16..], &[7u8; DIGEST_LEN]);
        assert_eq!(SessionHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn test_header_check_peer() {
        let ours = SessionHeader::new(4, 8, Digest([1u8; DIGEST_LEN]));
        assert!(ours.check_peer(&ours).is_ok());

        let wrong_n = SessionHeader::new(2, 8, Digest([1u8; DIGEST_LEN]));
        assert!(matches!(
            ours.check_peer(&wrong_n),
            Err(PsiError::ProtocolMismatch { field: "N", .. })
        ));

        let wrong_m = SessionHeader::new(4, 16, Digest([1u8; DIGEST_LEN]));
        assert!(matches!(
            ours.check_peer(&wrong_m),
            Err(PsiError::ProtocolMismatch { field: "M", .. })
        ));

        let wrong_params = SessionHeader::new(4, 8, Digest([2u8; DIGEST_LEN]));
        assert!(matches!(
            ours.check_peer(&wrong_params),
            Err(PsiError::ProtocolMismatch { field: "common parameters", .. })
        ));
    }

    #[test]
    fn test_publish_message_wire_format() {
        let digests = vec![Digest([3u8; DIGEST_LEN]), Digest([1u8; DIGEST_LEN])];
        let msg = PublishMessage::new(sample_psi(), digests.clone());
        assert_eq!(msg.len(), 2);
        assert!(!msg.is_empty());

        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), PublishMessage::wire_len(2).unwrap());
        assert_eq!(&bytes[g2_wire_len()..g2_wire_len() + DIGEST_LEN], &[3u8; DIGEST_LEN]);

        let decoded = PublishMessage::decode(&bytes, 2).unwrap();
        assert_eq!(decoded.digests, digests, "digest order must be preserved");
        assert_eq!(decoded.psi, msg.psi);
    }

    #[test]
    fn test_publish_message_empty_set() {
        let msg = PublishMessage::new(sample_psi(), vec![]);
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), g2_wire_len());
        assert!(PublishMessage::decode(&bytes, 0).unwrap().is_empty());
    }

    #[test]
    fn test_publish_message_wrong_length() {
        let msg = PublishMessage::new(sample_psi(), vec![Digest([0u8; DIGEST_LEN])]);
        let bytes = msg.encode().unwrap();
        assert!(matches!(
            PublishMessage::decode(&bytes, 2),
            Err(PsiError::Serialization(_))
        ));
        assert!(matches!(
            PublishMessage::decode(&bytes[..bytes.len() - 1], 1),
            Err(PsiError::Serialization(_))
        ));
    }

    #[test]
    fn test_wire_len_overflow() {
        assert!(PublishMessage::wire_len(usize::MAX).is_err());
    }

    #[test]
    fn test_psi_result() {
        let result = PsiResult::new(vec![Fr::from(5u64)], vec![3]);
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert!(PsiResult::new(vec![], vec![]).is_empty());
    }
}

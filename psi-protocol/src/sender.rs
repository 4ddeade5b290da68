//! Sender role: blinds its set under `Gamma^r` and publishes the digests.

use crate::crypto::{encode_item, hash_gt, pairing, random_nonzero_scalar, random_scalar, Digest};
use crate::error::{PsiError, Result};
use crate::messages::PublishMessage;
use crate::params::CommonParams;
use ark_bls12_381::{Fr, G2Affine};
use ark_ec::CurveGroup;
use ark_ff::Zero;
use rand::Rng;

/// Sender holding its item set, before the session randomizer is drawn.
#[derive(Debug)]
pub struct SenderSession<'p> {
    params: &'p CommonParams,
    items: Vec<Fr>,
}

impl<'p> SenderSession<'p> {
    pub fn new(params: &'p CommonParams, items: Vec<Fr>) -> Self {
        Self { params, items }
    }

    /// Sample `n` items uniformly from `[0, p)`.
    pub fn random<R: Rng + ?Sized>(params: &'p CommonParams, n: usize, rng: &mut R) -> Self {
        let items = (0..n).map(|_| random_scalar(rng)).collect();
        Self::new(params, items)
    }

    /// Encode application items given as bytes.
    ///
    /// # Errors
    /// Returns `PsiError::EmptyInput` if any item is empty.
    pub fn from_bytes(params: &'p CommonParams, items: &[Vec<u8>]) -> Result<Self> {
        let items = items
            .iter()
            .map(|item| encode_item(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(params, items))
    }

    pub fn items(&self) -> &[Fr] {
        &self.items
    }

    /// Draw a fresh randomizer `r` from `[1, p)` and blind every item.
    pub fn blind<R: Rng + ?Sized>(self, rng: &mut R) -> Result<BlindedSender> {
        let r = random_nonzero_scalar(rng);
        self.blind_with(r)
    }

    /// Blind every item under a given randomizer.
    ///
    /// Computes `ψ = g2^r`, `chi = Gamma^r` and `R_i = HashG_T(e(HashToG1(x_i), chi))`.
    /// Neither `r` nor `chi` outlives this call.
    ///
    /// # Errors
    /// Returns `PsiError::Precondition` if `r` is zero, since `ψ` would be the identity.
    pub fn blind_with(self, r: Fr) -> Result<BlindedSender> {
        if r.is_zero() {
            return Err(PsiError::Precondition(
                "session randomizer must be nonzero".to_string(),
            ));
        }
        let psi = (self.params.g2 * r).into_affine();
        let chi = (self.params.gamma * r).into_affine();

        let digests = self
            .items
            .iter()
            .map(|x| {
                let h = self.params.hash_to_g1(x)?;
                hash_gt(&pairing(h, chi))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(items = digests.len(), "sender set blinded");

        Ok(BlindedSender {
            items: self.items,
            psi,
            digests,
        })
    }
}

/// Sender after blinding: holds `ψ` and the digests, ready to publish.
#[derive(Debug, Clone)]
pub struct BlindedSender {
    items: Vec<Fr>,
    psi: G2Affine,
    digests: Vec<Digest>,
}

impl BlindedSender {
    /// `ψ = g2^r`
    pub fn psi(&self) -> &G2Affine {
        &self.psi
    }

    /// Digests in the same order as [`items`](Self::items).
    pub fn digests(&self) -> &[Digest] {
        &self.digests
    }

    pub fn items(&self) -> &[Fr] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// The message sent to the Receiver.
    pub fn message(&self) -> PublishMessage {
        PublishMessage::new(self.psi, self.digests.clone())
    }
}

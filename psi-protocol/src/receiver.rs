//! Receiver role: derives `K_i = HashToG1(y_i)^s` and matches against the
//! Sender's published digests.

use crate::crypto::{encode_item, hash_gt, pairing, random_nonzero_scalar, random_scalar, Digest};
use crate::error::{PsiError, Result};
use crate::matcher::DigestIndex;
use crate::messages::{PsiResult, PublishMessage};
use crate::params::CommonParams;
use ark_bls12_381::{Fr, G1Affine, G2Affine};
use ark_ec::CurveGroup;
use ark_ff::Field;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How the Receiver computes its per-item keys.
///
/// Every mode yields the same `K_i`: the blind/unblind nonce cancels exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonceMode {
    /// One nonce for the whole batch.
    #[default]
    Shared,
    /// A fresh nonce for every item.
    PerItem,
    /// Skip the nonce and exponentiate by `s` directly.
    Direct,
}

impl fmt::Display for NonceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NonceMode::Shared => "shared",
            NonceMode::PerItem => "per-item",
            NonceMode::Direct => "direct",
        };
        f.write_str(name)
    }
}

impl FromStr for NonceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "shared" => Ok(NonceMode::Shared),
            "per-item" => Ok(NonceMode::PerItem),
            "direct" => Ok(NonceMode::Direct),
            other => Err(format!("unknown nonce mode: {other}")),
        }
    }
}

/// `((h^rho)^s)^(rho^-1)`
///
/// # Errors
/// Returns `PsiError::Precondition` if `rho` is zero.
pub fn blind_unblind(h: &G1Affine, s: &Fr, rho: &Fr) -> Result<G1Affine> {
    let rho_inv = rho
        .inverse()
        .ok_or_else(|| PsiError::Precondition("nonce must be nonzero".to_string()))?;
    let blinded = *h * rho;
    let raised = blinded * s;
    Ok((raised * rho_inv).into_affine())
}

/// Receiver holding its item set, before registration.
#[derive(Debug)]
pub struct ReceiverSession<'p> {
    params: &'p CommonParams,
    items: Vec<Fr>,
}

impl<'p> ReceiverSession<'p> {
    pub fn new(params: &'p CommonParams, items: Vec<Fr>) -> Self {
        Self { params, items }
    }

    /// Sample `m` items uniformly from `[0, p)`.
    pub fn random<R: Rng + ?Sized>(params: &'p CommonParams, m: usize, rng: &mut R) -> Self {
        let items = (0..m).map(|_| random_scalar(rng)).collect();
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

    /// Compute `K_i` for every item, drawing nonces from `[1, p)` as `mode` says.
    pub fn register<R: Rng + ?Sized>(
        self,
        mode: NonceMode,
        rng: &mut R,
    ) -> Result<RegisteredReceiver<'p>> {
        let s = self.params.s;
        let keys = match mode {
            NonceMode::Shared => {
                let rho = random_nonzero_scalar(rng);
                self.map_items(|h| blind_unblind(h, &s, &rho))?
            }
            NonceMode::PerItem => {
                self.map_items(|h| blind_unblind(h, &s, &random_nonzero_scalar(rng)))?
            }
            NonceMode::Direct => self.map_items(|h| Ok((*h * s).into_affine()))?,
        };
        tracing::debug!(items = keys.len(), %mode, "receiver set registered");
        Ok(self.into_registered(keys))
    }

    /// Compute `K_i` for every item with one caller-chosen nonce.
    ///
    /// # Errors
    /// Returns `PsiError::Precondition` if `rho` is zero.
    pub fn register_with_nonce(self, rho: Fr) -> Result<RegisteredReceiver<'p>> {
        let s = self.params.s;
        let keys = self.map_items(|h| blind_unblind(h, &s, &rho))?;
        Ok(self.into_registered(keys))
    }

    fn map_items<F>(&self, mut f: F) -> Result<Vec<G1Affine>>
    where
        F: FnMut(&G1Affine) -> Result<G1Affine>,
    {
        self.items
            .iter()
            .map(|y| f(&self.params.hash_to_g1(y)?))
            .collect()
    }

    fn into_registered(self, keys: Vec<G1Affine>) -> RegisteredReceiver<'p> {
        RegisteredReceiver {
            params: self.params,
            items: self.items,
            keys,
        }
    }
}

/// Receiver after registration: holds `K_i` and can match published digests.
#[derive(Debug)]
pub struct RegisteredReceiver<'p> {
    params: &'p CommonParams,
    items: Vec<Fr>,
    keys: Vec<G1Affine>,
}

impl<'p> RegisteredReceiver<'p> {
    pub fn params(&self) -> &'p CommonParams {
        self.params
    }

    pub fn items(&self) -> &[Fr] {
        &self.items
    }

    /// `K_i`, in item order.
    pub fn keys(&self) -> &[G1Affine] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Query digests `HashG_T(e(K_i, ψ))`, in item order.
    pub fn query_digests(&self, psi: &G2Affine) -> Result<Vec<Digest>> {
        self.keys
            .iter()
            .map(|k| hash_gt(&pairing(*k, *psi)))
            .collect()
    }

    /// Sort the published digests and look up every query digest.
    pub fn finalize(self, message: PublishMessage) -> Result<PsiResult> {
        let queries = self.query_digests(&message.psi)?;
        let index = DigestIndex::new(message.digests);
        let positions = index.matching_positions(&queries);
        let matched = positions.iter().map(|&i| self.items[i]).collect();

        tracing::debug!(
            queries = queries.len(),
            published = index.len(),
            matches = positions.len(),
            "intersection extracted"
        );

        Ok(PsiResult::new(matched, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DEFAULT_SHARED_SCALAR;
    use crate::sender::SenderSession;
    use ark_ff::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_blind_unblind_cancels() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let mut rng = StdRng::seed_from_u64(10);
        let h = params.hash_to_g1(&Fr::from(5u64)).unwrap();
        let direct = (h * params.s).into_affine();
        for _ in 0..8 {
            let rho = random_nonzero_scalar(&mut rng);
            assert_eq!(blind_unblind(&h, &params.s, &rho).unwrap(), direct);
        }
        assert_eq!(blind_unblind(&h, &params.s, &Fr::from(1u64)).unwrap(), direct);
    }

    #[test]
    fn test_zero_nonce_rejected() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let h = params.hash_to_g1(&Fr::from(5u64)).unwrap();
        assert!(matches!(
            blind_unblind(&h, &params.s, &Fr::zero()),
            Err(PsiError::Precondition(_))
        ));
        let result = ReceiverSession::new(&params, vec![Fr::from(5u64)])
            .register_with_nonce(Fr::zero());
        assert!(matches!(result, Err(PsiError::Precondition(_))));
    }

    #[test]
    fn test_keys_independent_of_nonce_mode() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let items: Vec<Fr> = (0..4).map(|_| random_scalar(&mut rng)).collect();

        let expected: Vec<G1Affine> = items
            .iter()
            .map(|y| (params.hash_to_g1(y).unwrap() * params.s).into_affine())
            .collect();

        for mode in [NonceMode::Shared, NonceMode::PerItem, NonceMode::Direct] {
            let registered = ReceiverSession::new(&params, items.clone())
                .register(mode, &mut rng)
                .unwrap();
            assert_eq!(registered.keys(), expected.as_slice(), "mode {mode}");
        }
    }

    #[test]
    fn test_shared_item_matches_for_any_randomizer() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let x = random_scalar(&mut rng);

        for _ in 0..4 {
            let sender = SenderSession::new(&params, vec![x]).blind(&mut rng).unwrap();
            let receiver = ReceiverSession::new(&params, vec![x])
                .register(NonceMode::PerItem, &mut rng)
                .unwrap();
            let queries = receiver.query_digests(sender.psi()).unwrap();
            assert_eq!(queries, sender.digests());
        }
    }

    #[test]
    fn test_finalize_reports_members() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let shared = [Fr::from(100u64), Fr::from(200u64)];
        let x = vec![Fr::from(1u64), shared[0], Fr::from(2u64), shared[1]];
        let y = vec![shared[1], Fr::from(3u64), Fr::from(4u64), shared[0]];

        let sender = SenderSession::new(&params, x).blind(&mut rng).unwrap();
        let result = ReceiverSession::new(&params, y)
            .register(NonceMode::Shared, &mut rng)
            .unwrap()
            .finalize(sender.message())
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.matched_positions, vec![0, 3]);
        assert_eq!(result.matched_items, vec![shared[1], shared[0]]);
    }

    #[test]
    fn test_nonce_mode_parse() {
        for mode in [NonceMode::Shared, NonceMode::PerItem, NonceMode::Direct] {
            assert_eq!(mode.to_string().parse::<NonceMode>().unwrap(), mode);
        }
        assert!("sometimes".parse::<NonceMode>().is_err());
        assert_eq!(NonceMode::default(), NonceMode::Shared);
    }
}

//! Common reference parameters shared by both roles.

use crate::crypto::{Digest, HashToG1, DIGEST_LEN};
use crate::error::{PsiError, Result};
use ark_bls12_381::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::CanonicalSerialize;
use sha2::{Digest as _, Sha256};

/// Hex literal both roles derive the shared scalar `s` from.
///
/// `s` is known to both parties. It is a public parameter of the protocol,
/// not a trapdoor hidden from either side.
pub const DEFAULT_SHARED_SCALAR: &str =
    "2b1c8e6f3a5d7094e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8";

const FINGERPRINT_TAG: &[u8] = b"bilinear-psi/common-params/v1";

/// Session context: generators, group order, shared scalar and `Gamma = g2^s`.
///
/// Built explicitly by each role and dropped at the end of the run.
#[derive(Debug)]
pub struct CommonParams {
    pub g1: G1Affine,
    pub g2: G2Affine,
    pub p: <Fr as PrimeField>::BigInt,
    pub s: Fr,
    pub gamma: G2Affine,
    hash_to_g1: HashToG1,
}

impl CommonParams {
    /// Derive the parameters from a hex literal for `s`.
    ///
    /// # Errors
    /// Returns `PsiError::Initialization` if the literal is not hex, reduces to
    /// zero mod p, or the hash-to-G1 map cannot be set up.
    pub fn derive(shared_scalar_hex: &str) -> Result<Self> {
        let bytes = hex::decode(shared_scalar_hex.trim()).map_err(|e| {
            PsiError::Initialization(format!("shared scalar is not valid hex: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(PsiError::Initialization(
                "shared scalar literal is empty".to_string(),
            ));
        }
        let s = Fr::from_be_bytes_mod_order(&bytes);
        if s.is_zero() {
            return Err(PsiError::Initialization(
                "shared scalar reduces to zero".to_string(),
            ));
        }

        let hash_to_g1 = HashToG1::new()?;
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        let gamma = (g2 * s).into_affine();

        tracing::debug!(order = %Fr::MODULUS, "common parameters derived");

        Ok(Self {
            g1,
            g2,
            p: Fr::MODULUS,
            s,
            gamma,
            hash_to_g1,
        })
    }

    /// Hash-to-G1 oracle bound to these parameters.
    pub fn hash_to_g1(&self, x: &Fr) -> Result<G1Affine> {
        self.hash_to_g1.hash(x)
    }

    /// SHA-256 over the compressed `g1`, `g2` and `Gamma`.
    ///
    /// Peers compare fingerprints before exchanging digests so that mismatched
    /// builds fail instead of silently reporting an empty intersection.
    pub fn fingerprint(&self) -> Result<Digest> {
        let mut bytes = FINGERPRINT_TAG.to_vec();
        (self.g1, self.g2, self.gamma)
            .serialize_compressed(&mut bytes)
            .map_err(|e| PsiError::Serialization(format!("fingerprint encoding failed: {e}")))?;
        let digest: [u8; DIGEST_LEN] = Sha256::digest(&bytes).into();
        Ok(Digest(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let b = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        assert_eq!(a.s, b.s);
        assert_eq!(a.gamma, b.gamma);
        assert_eq!(a.p, b.p);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_gamma_is_g2_to_the_s() {
        let params = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        assert_eq!(params.gamma, (params.g2 * params.s).into_affine());
        assert_eq!(params.p, Fr::MODULUS);
    }

    #[test]
    fn test_different_scalar_changes_fingerprint() {
        let a = CommonParams::derive(DEFAULT_SHARED_SCALAR).unwrap();
        let b = CommonParams::derive("01").unwrap();
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_derive_rejects_bad_literals() {
        for literal in ["", "zz", "00", "000000"] {
            assert!(
                matches!(CommonParams::derive(literal), Err(PsiError::Initialization(_))),
                "literal {literal:?} should be rejected"
            );
        }
    }
}

//! Digest utilities and group helpers over BLS12-381.
//!
//! Everything group-specific the protocol touches lives here: hashing a
//! scalar into G1, reducing a pairing result to a fixed-width digest,
//! sampling scalars and the fixed-width wire encoding of G2 points.

use crate::error::{PsiError, Result};
use ark_bls12_381::{g1, Bls12_381, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::HashToCurve;
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::AffineRepr;
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_ff::{BigInteger, PrimeField, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::Rng;
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Width in bytes of every digest on the wire.
pub const DIGEST_LEN: usize = 32;

/// Domain separation tag for hashing items into G1.
pub const HASH_TO_G1_DST: &[u8] = b"BILINEAR-PSI-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Target group element of the pairing.
pub type Gt = PairingOutput<Bls12_381>;

type G1Hasher =
    MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;

/// Fixed-width digest of a pairing result, compared as opaque bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}..)", hex::encode(&self.0[..8]))
    }
}

/// Hash-to-G1 oracle: maps a scalar to a G1 point with unknown discrete log.
pub struct HashToG1 {
    hasher: G1Hasher,
}

impl HashToG1 {
    /// Build the hasher for the protocol's domain tag.
    ///
    /// # Errors
    /// Returns `PsiError::Initialization` if the curve map rejects its parameters.
    pub fn new() -> Result<Self> {
        let hasher = G1Hasher::new(HASH_TO_G1_DST).map_err(|e| {
            PsiError::Initialization(format!("hash-to-G1 setup failed: {e:?}"))
        })?;
        Ok(Self { hasher })
    }

    /// Hash a scalar's canonical little-endian bytes into G1.
    pub fn hash(&self, x: &Fr) -> Result<G1Affine> {
        self.hasher
            .hash(&scalar_to_bytes(x))
            .map_err(|e| PsiError::Crypto(format!("hash-to-G1 failed: {e:?}")))
    }
}

impl fmt::Debug for HashToG1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashToG1").finish_non_exhaustive()
    }
}

/// Canonical little-endian encoding of a scalar.
pub fn scalar_to_bytes(x: &Fr) -> Vec<u8> {
    x.into_bigint().to_bytes_le()
}

/// Reduce a target group element to a SHA-256 digest of its canonical encoding.
pub fn hash_gt(mu: &Gt) -> Result<Digest> {
    let mut bytes = Vec::with_capacity(mu.compressed_size());
    mu.serialize_compressed(&mut bytes)
        .map_err(|e| PsiError::Serialization(format!("GT encoding failed: {e}")))?;
    Ok(Digest(Sha256::digest(&bytes).into()))
}

/// Evaluate the pairing `e(a, b)`.
pub fn pairing(a: G1Affine, b: G2Affine) -> Gt {
    Bls12_381::pairing(a, b)
}

/// Sample a scalar uniformly from `[0, p)`.
pub fn random_scalar<R: Rng + ?Sized>(rng: &mut R) -> Fr {
    Fr::rand(rng)
}

/// Sample a scalar uniformly from `[1, p)`.
pub fn random_nonzero_scalar<R: Rng + ?Sized>(rng: &mut R) -> Fr {
    loop {
        let x = Fr::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Encode an application item as a scalar: SHA-256 of the bytes reduced mod p.
///
/// # Errors
/// Returns `PsiError::EmptyInput` for an empty item.
pub fn encode_item(item: &[u8]) -> Result<Fr> {
    if item.is_empty() {
        return Err(PsiError::EmptyInput);
    }
    Ok(Fr::from_le_bytes_mod_order(&Sha256::digest(item)))
}

/// Byte width of an uncompressed G2 point on the wire.
pub fn g2_wire_len() -> usize {
    G2Affine::generator().uncompressed_size()
}

/// Serialize a G2 point to its fixed-width uncompressed encoding.
pub fn encode_g2(point: &G2Affine) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(g2_wire_len());
    point
        .serialize_uncompressed(&mut bytes)
        .map_err(|e| PsiError::Serialization(format!("G2 encoding failed: {e}")))?;
    Ok(bytes)
}

/// Deserialize a G2 point, checking it is on the curve and in the prime-order subgroup.
///
/// # Errors
/// Returns `PsiError::Serialization` for malformed bytes and
/// `PsiError::Precondition` for the identity, which no nonzero randomizer produces.
pub fn decode_g2(bytes: &[u8]) -> Result<G2Affine> {
    if bytes.len() != g2_wire_len() {
        return Err(PsiError::Serialization(format!(
            "G2 point must be {} bytes, got {}",
            g2_wire_len(),
            bytes.len()
        )));
    }
    let point = G2Affine::deserialize_uncompressed(bytes)
        .map_err(|e| PsiError::Serialization(format!("G2 decoding failed: {e}")))?;
    if AffineRepr::is_zero(&point) {
        return Err(PsiError::Precondition(
            "received randomizer point is the identity".to_string(),
        ));
    }
    Ok(point)
}

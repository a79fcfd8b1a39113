//! The curve abstraction the prover core is generic over.
//!
//! Baby-Plonk is specified over a pairing-friendly curve's scalar field and
//! `G1` group; nothing in the prover needs `G2` or the pairing itself (that
//! lives on the verifier side, out of scope here). [`Curve`] fixes the two
//! concrete instantiations the zkey/witness formats name: BN254 (`"bn128"`)
//! and BLS12-381 (`"bls12381"`).

use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// A pairing-friendly curve's scalar field and `G1` affine point type, named
/// the way the proving-key format names it.
pub trait Curve: Clone + Copy + Send + Sync + 'static {
    /// Scalar field (`Fr`).
    type Fr: PrimeField;
    /// `G1` base field (`Fq`).
    type Fq: PrimeField;
    /// `G1` affine point representation.
    type G1Affine: AffineRepr<ScalarField = Self::Fr, BaseField = Self::Fq>
        + CanonicalSerialize
        + CanonicalDeserialize
        + Send
        + Sync;

    /// The curve name as it appears in a proof's `curve` field.
    const NAME: &'static str;

    /// The scalar field modulus, canonical little-endian.
    fn fr_modulus_le_bytes() -> Vec<u8>;

    /// Builds an affine `G1` point from raw (unchecked) coordinates, as read
    /// off a proving-key section.
    fn g1_from_xy(x: Self::Fq, y: Self::Fq) -> Self::G1Affine;

    /// The additive identity of `G1`.
    fn g1_identity() -> Self::G1Affine {
        Self::G1Affine::zero()
    }
}

/// The BN254 (a.k.a. `bn128`, alt_bn128) instantiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bn254Curve;

impl Curve for Bn254Curve {
    type Fr = ark_bn254::Fr;
    type Fq = ark_bn254::Fq;
    type G1Affine = ark_bn254::G1Affine;

    const NAME: &'static str = "bn128";

    fn fr_modulus_le_bytes() -> Vec<u8> {
        <Self::Fr as PrimeField>::MODULUS.to_bytes_le()
    }

    fn g1_from_xy(x: Self::Fq, y: Self::Fq) -> Self::G1Affine {
        ark_bn254::G1Affine::new_unchecked(x, y)
    }
}

/// The BLS12-381 instantiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bls12_381Curve;

impl Curve for Bls12_381Curve {
    type Fr = ark_bls12_381::Fr;
    type Fq = ark_bls12_381::Fq;
    type G1Affine = ark_bls12_381::G1Affine;

    const NAME: &'static str = "bls12381";

    fn fr_modulus_le_bytes() -> Vec<u8> {
        <Self::Fr as PrimeField>::MODULUS.to_bytes_le()
    }

    fn g1_from_xy(x: Self::Fq, y: Self::Fq) -> Self::G1Affine {
        ark_bls12_381::G1Affine::new_unchecked(x, y)
    }
}

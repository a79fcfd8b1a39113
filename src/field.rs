//! Scalar field helpers.
//!
//! `ark_ff::PrimeField` already stores elements in Montgomery form and
//! handles conversion at the `BigInt` boundary, so this module does not
//! reimplement Montgomery reduction. What it adds is the handful of
//! batch/wire operations the prover needs repeatedly: batched inversion,
//! canonical little-endian byte encoding, and seeded random sampling for
//! blinding factors.

use ark_ff::{BigInteger, PrimeField, UniformRand};
use rand::RngCore;
use thiserror::Error;

/// Errors arising from field-level arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A batch inversion was asked to invert a zero element.
    #[error("attempted to invert a zero field element")]
    ZeroInversion,
}

/// Inverts every element of `values` in place using Montgomery's trick: one
/// field inversion plus `3n` multiplications instead of `n` inversions.
///
/// Returns [`FieldError::ZeroInversion`] without modifying `values` if any
/// entry is zero.
pub fn batch_inverse<F: PrimeField>(values: &mut [F]) -> Result<(), FieldError> {
    if values.is_empty() {
        return Ok(());
    }
    if values.iter().any(|v| v.is_zero()) {
        return Err(FieldError::ZeroInversion);
    }

    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for v in values.iter() {
        acc *= v;
        prefix.push(acc);
    }

    let mut inv = acc.inverse().ok_or(FieldError::ZeroInversion)?;
    for i in (1..values.len()).rev() {
        let next_inv = inv * prefix[i - 1];
        inv *= values[i];
        values[i] = next_inv;
    }
    values[0] = inv;
    Ok(())
}

/// Samples a uniformly random field element from `rng`.
pub fn random<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R) -> F {
    F::rand(rng)
}

/// Samples `count` uniformly random field elements from `rng`.
pub fn random_vec<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R, count: usize) -> Vec<F> {
    (0..count).map(|_| F::rand(rng)).collect()
}

/// The number of bytes needed to hold one element of `F` in canonical
/// little-endian form.
pub fn element_byte_len<F: PrimeField>() -> usize {
    ((F::MODULUS_BIT_SIZE as usize) + 7) / 8
}

/// Reduces a little-endian byte string modulo the field order. This is the
/// standard way wire bytes (zkey sections, witness entries) become field
/// elements: the byte string is always shorter than the modulus for a
/// well-formed proving key, so reduction is a no-op in practice, but callers
/// should not rely on that.
pub fn from_bytes_le<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_le_bytes_mod_order(bytes)
}

/// Encodes `f` as a fixed-width canonical little-endian byte vector,
/// zero-padded to [`element_byte_len`].
pub fn to_bytes_le<F: PrimeField>(f: &F) -> Vec<u8> {
    let mut bytes = f.into_bigint().to_bytes_le();
    bytes.resize(element_byte_len::<F>(), 0);
    bytes
}

/// Checks whether `bytes` (a little-endian, zero-padded field-width byte
/// string) encodes `F`'s modulus. Used to validate a witness file's declared
/// field prime against the curve it is being decoded for.
pub fn is_modulus<F: PrimeField>(bytes: &[u8]) -> bool {
    let mut expected = F::MODULUS.to_bytes_le();
    expected.resize(element_byte_len::<F>(), 0);
    let mut actual = bytes.to_vec();
    actual.resize(element_byte_len::<F>(), 0);
    expected == actual
}

/// Marks a batch of values as being written in the field's native
/// (Montgomery) internal representation, i.e. ready for the prover's
/// arithmetic. `ark_ff` keeps every [`PrimeField`] value in that
/// representation regardless of how it was constructed, so this is a
/// semantic no-op kept for symmetry with [`batch_from_montgomery`] at the
/// points where the wire format is relevant.
pub fn batch_to_montgomery<F: PrimeField>(values: &[F]) -> Vec<F> {
    values.to_vec()
}

/// Renders `f` as a decimal string, the convention used for public-input
/// values in a proof's human-readable encoding.
pub fn to_decimal_string<F: PrimeField>(f: &F) -> String {
    let mut digits = f.into_bigint().to_bytes_be();
    let mut result = Vec::new();
    loop {
        let mut remainder: u32 = 0;
        let mut any_nonzero = false;
        for byte in digits.iter_mut() {
            let cur = (remainder << 8) | (*byte as u32);
            *byte = (cur / 10) as u8;
            remainder = cur % 10;
            if *byte != 0 {
                any_nonzero = true;
            }
        }
        result.push(std::char::from_digit(remainder, 10).expect("single decimal digit"));
        if !any_nonzero {
            break;
        }
    }
    result.reverse();
    result.into_iter().collect()
}

/// The wire-side counterpart of [`batch_to_montgomery`]: produces the
/// canonical (non-Montgomery) values that would be written back out, e.g.
/// before re-serializing a proof. Also a no-op under `ark_ff`'s
/// representation, kept for API symmetry.
pub fn batch_from_montgomery<F: PrimeField>(values: &[F]) -> Vec<F> {
    values.to_vec()
}

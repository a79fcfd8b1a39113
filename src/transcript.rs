//! The Fiat–Shamir transcript.
//!
//! Baby-Plonk's transcript is a single running Keccak-256 state. Absorbing
//! appends bytes to that state; squeezing finalizes the current state into a
//! digest, reduces the digest modulo the scalar field order to produce the
//! challenge, and then re-seeds the state with the digest bytes so the next
//! absorb continues from a fresh hash built on top of what was just
//! squeezed. Reset drops all of that and starts over from an empty state.

use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use sha3::{Digest, Keccak256};

use crate::field;

/// A running Fiat–Shamir transcript.
pub struct Transcript {
    hasher: Keccak256,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Starts a fresh, empty transcript.
    pub fn new() -> Self {
        Self { hasher: Keccak256::new() }
    }

    /// Absorbs raw bytes.
    pub fn absorb_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Absorbs a scalar field element in canonical little-endian form.
    pub fn absorb_scalar<F: PrimeField>(&mut self, value: &F) {
        self.absorb_bytes(&field::to_bytes_le(value));
    }

    /// Absorbs a `G1` commitment as its affine `(x, y)` coordinates, each in
    /// canonical little-endian form. The point at infinity absorbs as two
    /// zero elements.
    pub fn absorb_commitment<G: AffineRepr>(&mut self, point: &G)
    where
        G::BaseField: PrimeField,
    {
        let (x, y) = point.xy().unwrap_or((G::BaseField::zero(), G::BaseField::zero()));
        self.absorb_bytes(&field::to_bytes_le(&x));
        self.absorb_bytes(&field::to_bytes_le(&y));
    }

    /// Absorbs a sequence of commitments in order.
    pub fn absorb_commitments<G: AffineRepr>(&mut self, points: &[G])
    where
        G::BaseField: PrimeField,
    {
        for p in points {
            self.absorb_commitment(p);
        }
    }

    /// Finalizes the current state into a challenge, reducing the digest
    /// modulo the scalar field order, then re-seeds the transcript with the
    /// digest bytes so subsequent absorbs build on top of it.
    pub fn squeeze_challenge<F: PrimeField>(&mut self) -> F {
        let finished = std::mem::replace(&mut self.hasher, Keccak256::new());
        let digest = finished.finalize();
        self.hasher.update(&digest);
        F::from_le_bytes_mod_order(&digest)
    }

    /// Squeezes `count` independent challenges by repeated
    /// [`Transcript::squeeze_challenge`] calls.
    pub fn squeeze_challenges<F: PrimeField>(&mut self, count: usize) -> Vec<F> {
        (0..count).map(|_| self.squeeze_challenge()).collect()
    }

    /// Discards all absorbed state and starts over.
    pub fn reset(&mut self) {
        self.hasher = Keccak256::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn same_absorbs_give_same_challenge() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();
        t1.absorb_scalar(&Fr::from(42u64));
        t2.absorb_scalar(&Fr::from(42u64));
        let c1: Fr = t1.squeeze_challenge();
        let c2: Fr = t2.squeeze_challenge();
        assert_eq!(c1, c2);
    }

    #[test]
    fn different_absorbs_give_different_challenges() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();
        t1.absorb_scalar(&Fr::from(42u64));
        t2.absorb_scalar(&Fr::from(43u64));
        let c1: Fr = t1.squeeze_challenge();
        let c2: Fr = t2.squeeze_challenge();
        assert_ne!(c1, c2);
    }

    #[test]
    fn squeeze_mutates_state_so_repeat_calls_differ() {
        let mut t = Transcript::new();
        t.absorb_scalar(&Fr::from(7u64));
        let c1: Fr = t.squeeze_challenge();
        let c2: Fr = t.squeeze_challenge();
        assert_ne!(c1, c2);
    }

    #[test]
    fn reset_forgets_prior_absorbs() {
        let mut t1 = Transcript::new();
        t1.absorb_scalar(&Fr::from(99u64));
        t1.reset();

        let t2 = Transcript::new();

        let mut t1 = t1;
        let mut t2 = t2;
        let c1: Fr = t1.squeeze_challenge();
        let c2: Fr = t2.squeeze_challenge();
        assert_eq!(c1, c2);
    }
}

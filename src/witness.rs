//! Witness-file parsing.
//!
//! A witness is the flat array of field-element assignments the circuit
//! compiler produced, one entry per signal, with index `0` always holding
//! the constant `1`. Generic container framing (the wtns format's own
//! section wrapper) is out of scope; this module reads the one section that
//! matters, the value array, plus the header fields needed to validate it.

use ark_ff::PrimeField;
use thiserror::Error;

use crate::field;

/// Errors decoding a witness.
#[derive(Debug, Error)]
pub enum WitnessError {
    /// The byte buffer was shorter than the header it claimed to have.
    #[error("witness buffer too short: got {actual} bytes, need at least {expected}")]
    Truncated {
        /// Bytes actually present.
        actual: usize,
        /// Bytes required by the declared header.
        expected: usize,
    },
    /// The witness's field-element width did not match the curve being
    /// parsed against.
    #[error("witness field element width {actual} does not match expected width {expected}")]
    FieldWidthMismatch {
        /// Width declared in the witness.
        actual: usize,
        /// Width expected for the curve in use.
        expected: usize,
    },
    /// The witness declared a different number of entries than the
    /// proving key expects.
    #[error("witness has {actual} entries, proving key expects {expected}")]
    LengthMismatch {
        /// Entries actually present.
        actual: usize,
        /// Entries the proving key's `n_vars - n_additions` requires.
        expected: usize,
    },
    /// The witness's declared field prime does not match the curve being
    /// parsed against.
    #[error("witness field prime does not match the curve in use")]
    FieldMismatch,
}

/// A decoded witness: one field element per signal, index `0` fixed to `1`.
#[derive(Clone, Debug)]
pub struct Witness<F> {
    values: Vec<F>,
}

impl<F: PrimeField> Witness<F> {
    /// Wraps an already-decoded value vector.
    pub fn new(values: Vec<F>) -> Self {
        Self { values }
    }

    /// Decodes a witness from raw wtns-style bytes: a header of `(n8: u32,
    /// q: Fr, nWitness: u32)` followed by `nWitness` little-endian field
    /// elements of width `n8`. `q` is the witness's declared field prime;
    /// it must match the curve `F` is being decoded against.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WitnessError> {
        if bytes.len() < 4 {
            return Err(WitnessError::Truncated { actual: bytes.len(), expected: 4 });
        }
        let n8 = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
        let expected_width = field::element_byte_len::<F>();
        if n8 != expected_width {
            return Err(WitnessError::FieldWidthMismatch { actual: n8, expected: expected_width });
        }

        let header_len = 4 + n8 + 4;
        if bytes.len() < header_len {
            return Err(WitnessError::Truncated { actual: bytes.len(), expected: header_len });
        }
        let q_bytes = &bytes[4..4 + n8];
        if !field::is_modulus::<F>(q_bytes) {
            return Err(WitnessError::FieldMismatch);
        }
        let n_witness = u32::from_le_bytes(bytes[4 + n8..4 + n8 + 4].try_into().unwrap()) as usize;

        let body = &bytes[header_len..];
        let expected_body_len = n_witness * n8;
        if body.len() != expected_body_len {
            return Err(WitnessError::Truncated { actual: bytes.len(), expected: header_len + expected_body_len });
        }

        let values = body.chunks_exact(n8).map(field::from_bytes_le::<F>).collect();
        Ok(Self { values })
    }

    /// The full value slice, index `0` is the constant `1`.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no entries at all (a malformed witness; a valid
    /// one always has at least the constant `1`).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validates the witness has exactly `expected_len` entries.
    pub fn check_len(&self, expected_len: usize) -> Result<(), WitnessError> {
        if self.values.len() != expected_len {
            return Err(WitnessError::LengthMismatch { actual: self.values.len(), expected: expected_len });
        }
        Ok(())
    }

    /// Resolves a witness index through the proving key's folded-in
    /// additions: indices below `direct_len` (`n_vars - n_additions`) read
    /// straight from the witness, indices within the additions table
    /// address the `i - direct_len`'th addition record, and anything
    /// beyond both ranges resolves to zero.
    pub fn resolve(&self, index: u32, direct_len: u32, additions: &[crate::zkey::Addition<F>]) -> F {
        if index < direct_len {
            self.values[index as usize]
        } else if let Some(addition) = additions.get((index - direct_len) as usize) {
            let a = self.resolve(addition.id1, direct_len, additions);
            let b = self.resolve(addition.id2, direct_len, additions);
            addition.factor1 * a + addition.factor2 * b
        } else {
            F::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{BigInteger, PrimeField as _};

    fn header(n8: u32, q: &[u8], n_witness: u32) -> Vec<u8> {
        let mut bytes = n8.to_le_bytes().to_vec();
        bytes.extend_from_slice(q);
        bytes.extend_from_slice(&n_witness.to_le_bytes());
        bytes
    }

    #[test]
    fn round_trips_values() {
        let n8 = field::element_byte_len::<Fr>() as u32;
        let mut q = Fr::MODULUS.to_bytes_le();
        q.resize(n8 as usize, 0);
        let values = vec![Fr::from(1u64), Fr::from(7u64), Fr::from(42u64)];
        let mut bytes = header(n8, &q, values.len() as u32);
        for v in &values {
            bytes.extend_from_slice(&field::to_bytes_le(v));
        }
        let witness = Witness::<Fr>::from_bytes(&bytes).unwrap();
        assert_eq!(witness.values(), values.as_slice());
    }

    #[test]
    fn rejects_wrong_field_width() {
        let mut bytes = 16u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16 + 4]);
        let result = Witness::<Fr>::from_bytes(&bytes);
        assert!(matches!(result, Err(WitnessError::FieldWidthMismatch { .. })));
    }

    #[test]
    fn rejects_wrong_field_prime() {
        let n8 = field::element_byte_len::<Fr>() as u32;
        let q = vec![0u8; n8 as usize]; // never a real modulus
        let bytes = header(n8, &q, 0);
        let result = Witness::<Fr>::from_bytes(&bytes);
        assert!(matches!(result, Err(WitnessError::FieldMismatch)));
    }

    #[test]
    fn resolves_additions_recursively() {
        let n_vars = 2u32;
        let values = vec![Fr::from(1u64), Fr::from(5u64)];
        let witness = Witness::new(values);
        let additions = vec![crate::zkey::Addition {
            id1: 0,
            id2: 1,
            factor1: Fr::from(2u64),
            factor2: Fr::from(3u64),
        }];
        // addition 0 (index n_vars + 0 = 2) = 2*w[0] + 3*w[1] = 2*1 + 3*5 = 17
        assert_eq!(witness.resolve(2, n_vars, &additions), Fr::from(17u64));
    }

    #[test]
    fn resolves_out_of_range_indices_to_zero() {
        let n_vars = 2u32;
        let values = vec![Fr::from(1u64), Fr::from(5u64)];
        let witness = Witness::new(values);
        let additions = vec![crate::zkey::Addition {
            id1: 0,
            id2: 1,
            factor1: Fr::from(2u64),
            factor2: Fr::from(3u64),
        }];
        // direct_len=2, one addition at index 2; index 3 is past both ranges.
        assert_eq!(witness.resolve(3, n_vars, &additions), Fr::from(0u64));
    }
}

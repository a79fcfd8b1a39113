//! Dense evaluation-form vectors over the `4n` coset.
//!
//! Selector, permutation, and copy-constraint columns are read out of the
//! proving key already in this form. Unlike coefficient polynomials, these
//! buffers are indexed by row with wraparound, since round-1 and round-2
//! computations reference the "next row" wrapping past the last row back to
//! the first.

use thiserror::Error;

/// Errors indexing into an [`Evaluations`] buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationsError {
    /// An unwrapped index fell outside the buffer.
    #[error("index {index} out of bounds for evaluations of length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Buffer length.
        len: usize,
    },
}

/// A flat vector of field (or group) elements sampled at every point of some
/// evaluation domain, with wraparound indexing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluations<F> {
    values: Vec<F>,
}

impl<F: Copy> Evaluations<F> {
    /// Wraps a flat value vector.
    pub fn new(values: Vec<F>) -> Self {
        Self { values }
    }

    /// Number of stored evaluations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no stored evaluations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The full underlying slice.
    pub fn as_slice(&self) -> &[F] {
        &self.values
    }

    /// Fetches `values[i]`, bounds-checked.
    pub fn get(&self, i: usize) -> Result<F, EvaluationsError> {
        self.values
            .get(i)
            .copied()
            .ok_or(EvaluationsError::OutOfBounds { index: i, len: self.values.len() })
    }

    /// Fetches `values[i mod len]`, wrapping both forward and backward
    /// (negative `i`), the way row-shifted accesses like `a'`/`b'` need.
    pub fn get_wrapped(&self, i: isize) -> F {
        let len = self.values.len() as isize;
        let idx = ((i % len) + len) % len;
        self.values[idx as usize]
    }

    /// A contiguous window `[offset, offset + len)`, used to split a
    /// concatenated `σ1‖σ2` buffer into its two halves.
    pub fn window(&self, offset: usize, len: usize) -> &[F] {
        &self.values[offset..offset + len]
    }
}

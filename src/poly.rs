//! Dense coefficient-form polynomials over the scalar field.
//!
//! These are the prover's workhorse objects: wire polynomials, the
//! permutation polynomial, the quotient and its split parts, and the
//! linearisation polynomial are all `Polynomial<F>`. Operations favor
//! explicit, in-place mutation over building new vectors, matching how the
//! prover re-uses buffers round over round.

use ark_ff::{FftField, Field};
use thiserror::Error;

use crate::domain::{Domain, DomainError};

/// Errors from polynomial arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolyError {
    /// A domain operation failed underneath a polynomial operation.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// [`Polynomial::div_by_zh`] was given a polynomial shorter than the
    /// vanishing polynomial's degree.
    #[error("polynomial of length {len} is too short to divide by Z_H of degree {n}")]
    TooShortForZh {
        /// Length of the dividend.
        len: usize,
        /// Degree of `Z_H`.
        n: usize,
    },
    /// A debug-mode remainder check found a non-zero remainder where an
    /// exact division was expected.
    #[error("division had a non-zero remainder")]
    NonZeroRemainder,
}

/// A dense polynomial, stored as coefficients from the constant term up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<F> {
    coeffs: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    /// Wraps a coefficient vector as a polynomial.
    pub fn new(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Recovers a polynomial from its evaluations over `domain` via inverse
    /// NTT.
    pub fn from_evaluations(domain: &Domain<F>, evals: &[F]) -> Result<Self, PolyError>
    where
        F: FftField,
    {
        let mut buf = evals.to_vec();
        domain.intt(&mut buf)?;
        Ok(Self::new(buf))
    }

    /// Recovers a polynomial from its evaluations over `domain`'s shifted
    /// `4n` coset via inverse coset NTT.
    pub fn from_coset_evaluations(domain: &Domain<F>, evals: &[F]) -> Result<Self, PolyError>
    where
        F: FftField,
    {
        Ok(Self::new(domain.coset_intt_4n(evals)?))
    }

    /// Read-only access to the coefficient vector.
    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    /// Consumes the polynomial, returning its coefficient vector.
    pub fn into_coeffs(self) -> Vec<F> {
        self.coeffs
    }

    /// Number of stored coefficients (not degree: trailing zero
    /// coefficients are not implicitly stripped).
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// True if there are no stored coefficients.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The highest index with a non-zero coefficient, or `0` for the zero
    /// polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    /// Drops trailing zero coefficients down to `degree() + 1` entries.
    pub fn truncate(&mut self) {
        let deg = self.degree();
        if self.coeffs.iter().any(|c| !c.is_zero()) {
            self.coeffs.truncate(deg + 1);
        } else {
            self.coeffs.clear();
        }
    }

    /// Evaluates the polynomial at `x` via Horner's method, high to low.
    pub fn evaluate(&self, x: F) -> F {
        let mut acc = F::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + *c;
        }
        acc
    }

    /// `self += scale * other` (or plain addition if `scale` is `None`),
    /// extending `self` if `other` is longer.
    pub fn add_assign_scaled(&mut self, other: &Polynomial<F>, scale: Option<F>) {
        if self.coeffs.len() < other.coeffs.len() {
            self.coeffs.resize(other.coeffs.len(), F::zero());
        }
        match scale {
            Some(s) => {
                for (a, b) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
                    *a += s * *b;
                }
            }
            None => {
                for (a, b) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
                    *a += *b;
                }
            }
        }
    }

    /// `self -= scale * other` (or plain subtraction if `scale` is `None`),
    /// extending `self` if `other` is longer.
    pub fn sub_assign_scaled(&mut self, other: &Polynomial<F>, scale: Option<F>) {
        if self.coeffs.len() < other.coeffs.len() {
            self.coeffs.resize(other.coeffs.len(), F::zero());
        }
        match scale {
            Some(s) => {
                for (a, b) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
                    *a -= s * *b;
                }
            }
            None => {
                for (a, b) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
                    *a -= *b;
                }
            }
        }
    }

    /// Scales every coefficient by `s`.
    pub fn mul_scalar(&mut self, s: F) {
        for c in self.coeffs.iter_mut() {
            *c *= s;
        }
    }

    /// Adds a scalar to the constant term.
    pub fn add_scalar(&mut self, s: F) {
        if self.coeffs.is_empty() {
            self.coeffs.push(s);
        } else {
            self.coeffs[0] += s;
        }
    }

    /// Subtracts a scalar from the constant term.
    pub fn sub_scalar(&mut self, s: F) {
        if self.coeffs.is_empty() {
            self.coeffs.push(-s);
        } else {
            self.coeffs[0] -= s;
        }
    }

    /// Returns a new polynomial `q(X) = p(factor * X)`, obtained by scaling
    /// coefficient `i` by `factor^i`. Used to evaluate a "next row" shifted
    /// version of a wire or permutation polynomial over a coset without any
    /// assumption about how that coset's root of unity relates to the
    /// original domain's root.
    pub fn scale_by_powers(&self, factor: F) -> Polynomial<F> {
        let mut fi = F::one();
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let scaled = *c * fi;
                fi *= factor;
                scaled
            })
            .collect();
        Polynomial::new(coeffs)
    }

    /// Blinds the polynomial by folding in `factors.len()` random
    /// coefficients multiplied by `Z_H(X) = X^n - 1`:
    /// `p(X) + (Σ_i factors[i]·X^i)·(X^n - 1)`.
    ///
    /// This extends the stored length to `n + factors.len()`.
    pub fn blind(&mut self, n: usize, factors: &[F]) {
        let new_len = n + factors.len();
        if self.coeffs.len() < new_len {
            self.coeffs.resize(new_len, F::zero());
        }
        for (i, b) in factors.iter().enumerate() {
            self.coeffs[n + i] += *b;
            self.coeffs[i] -= *b;
        }
    }

    /// Divides `self` by `(X - zeta)` in place via synthetic division,
    /// assuming `self(zeta) == 0`. The output keeps the same stored length
    /// with a forced-zero top coefficient.
    pub fn div_by_x_minus(&mut self, zeta: F) -> Result<(), PolyError> {
        let l = self.coeffs.len();
        if l < 2 {
            self.coeffs = vec![F::zero(); l];
            return Ok(());
        }
        let mut q = vec![F::zero(); l];
        q[l - 2] = self.coeffs[l - 1];
        for i in (0..l - 2).rev() {
            q[i] = self.coeffs[i + 1] + zeta * q[i + 1];
        }

        #[cfg(feature = "strict-checks")]
        {
            let remainder = self.coeffs[0] + zeta * q[0];
            if !remainder.is_zero() {
                return Err(PolyError::NonZeroRemainder);
            }
        }

        self.coeffs = q;
        Ok(())
    }

    /// Divides `self` by `Z_H(X) = X^n - 1` in place, assuming the division
    /// is exact. `self` must have at least `n` coefficients; the result
    /// keeps `self`'s original length (with the top `n` slots as the true
    /// quotient, zero beyond its degree).
    pub fn div_by_zh(&mut self, n: usize) -> Result<(), PolyError> {
        let len = self.coeffs.len();
        if len < n {
            return Err(PolyError::TooShortForZh { len, n });
        }
        let mut q = vec![F::zero(); len];
        for i in 0..len {
            if i < n {
                q[i] = -self.coeffs[i];
            } else {
                q[i] = q[i - n] - self.coeffs[i];
            }
        }

        #[cfg(feature = "strict-checks")]
        {
            // The dividend has `len` coefficients and `Z_H` has degree `n`,
            // so an exact quotient has degree at most `len - n - 1`: the top
            // `n` slots of `q` are an artifact of the recurrence's wraparound
            // and must be zero.
            if q[len - n..].iter().any(|c| !c.is_zero()) {
                return Err(PolyError::NonZeroRemainder);
            }
        }

        self.coeffs = q;
        Ok(())
    }

    /// Splits the polynomial into `num_parts` chunks of `deg + 1`
    /// coefficients each (the last chunk takes the remainder), blinding the
    /// seam between adjacent chunks with `blinding[j]` so that summing
    /// `part_j(X) * X^{j*(deg+1)}` reproduces the original polynomial:
    /// each non-final chunk gets an extra coefficient at position `deg + 1`
    /// equal to `blinding[j]`, and each non-first chunk has `blinding[j-1]`
    /// subtracted from its constant term.
    pub fn split(&self, num_parts: usize, deg: usize, blinding: &[F]) -> Vec<Polynomial<F>> {
        assert!(blinding.len() + 1 >= num_parts, "need num_parts - 1 blinding factors");
        let chunk_len = deg + 1;
        let mut parts = Vec::with_capacity(num_parts);

        for j in 0..num_parts {
            let start = j * chunk_len;
            let end = if j == num_parts - 1 {
                self.coeffs.len()
            } else {
                (start + chunk_len).min(self.coeffs.len())
            };

            let mut chunk: Vec<F> = if start < self.coeffs.len() {
                self.coeffs[start..end].to_vec()
            } else {
                Vec::new()
            };

            if j < num_parts - 1 {
                if chunk.len() < chunk_len {
                    chunk.resize(chunk_len, F::zero());
                }
                chunk.push(blinding[j]);
            }

            if j > 0 {
                if chunk.is_empty() {
                    chunk.push(F::zero());
                }
                chunk[0] -= blinding[j - 1];
            }

            parts.push(Polynomial::new(chunk));
        }

        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::FftField;

    fn domain(n: usize) -> Domain<Fr> {
        let omega = Fr::get_root_of_unity(n as u64).unwrap();
        Domain::new(n, omega).unwrap()
    }

    #[test]
    fn evaluate_matches_horner_by_hand() {
        let p = Polynomial::new(vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)]);
        // 1 + 2x + 3x^2 at x=5 => 1 + 10 + 75 = 86
        assert_eq!(p.evaluate(Fr::from(5u64)), Fr::from(86u64));
    }

    #[test]
    fn from_evaluations_round_trips_through_domain() {
        let d = domain(8);
        let coeffs: Vec<Fr> = (0..8u64).map(Fr::from).collect();
        let poly = Polynomial::new(coeffs.clone());
        let mut evals = coeffs;
        d.ntt(&mut evals).unwrap();
        let recovered = Polynomial::from_evaluations(&d, &evals).unwrap();
        assert_eq!(recovered, poly);
    }

    #[test]
    fn scale_by_powers_matches_direct_evaluation_at_shifted_point() {
        let p = Polynomial::new(vec![Fr::from(3u64), Fr::from(5u64), Fr::from(7u64)]);
        let factor = Fr::from(2u64);
        let x = Fr::from(9u64);
        let shifted = p.scale_by_powers(factor);
        assert_eq!(shifted.evaluate(x), p.evaluate(factor * x));
    }

    #[test]
    fn div_by_x_minus_root_is_exact() {
        // p(X) = (X - 3)(X + 1) = X^2 - 2X - 3
        let zeta = Fr::from(3u64);
        let mut p = Polynomial::new(vec![-Fr::from(3u64), -Fr::from(2u64), Fr::from(1u64)]);
        assert_eq!(p.evaluate(zeta), Fr::from(0u64));
        p.div_by_x_minus(zeta).unwrap();
        // quotient should be (X + 1) in the low two slots, top forced zero
        assert_eq!(p.coeffs()[0], Fr::from(1u64));
        assert_eq!(p.coeffs()[1], Fr::from(1u64));
        assert_eq!(p.coeffs()[2], Fr::from(0u64));
    }

    #[test]
    fn div_by_zh_matches_brute_force_division() {
        let n = 4usize;
        // (X^n - 1)(X + 2), built by direct convolution, is an exact
        // multiple of Z_H with quotient (X + 2).
        let zh = {
            let mut v = vec![Fr::from(0u64); n + 1];
            v[0] = -Fr::from(1u64);
            v[n] = Fr::from(1u64);
            v
        };
        let factor = vec![Fr::from(2u64), Fr::from(1u64)];
        let mut product = vec![Fr::from(0u64); zh.len() + factor.len() - 1];
        for (i, a) in zh.iter().enumerate() {
            for (j, b) in factor.iter().enumerate() {
                product[i + j] += *a * *b;
            }
        }
        let mut p = Polynomial::new(product);
        p.div_by_zh(n).unwrap();
        assert_eq!(p.coeffs()[0], Fr::from(2u64));
        assert_eq!(p.coeffs()[1], Fr::from(1u64));
    }

    #[test]
    fn split_reassembles_to_the_original_polynomial() {
        let deg = 2usize;
        let num_parts = 3usize;
        let coeffs: Vec<Fr> = (1..=9u64).map(Fr::from).collect();
        let p = Polynomial::new(coeffs.clone());
        let blinding = vec![Fr::from(100u64), Fr::from(200u64)];
        let parts = p.split(num_parts, deg, &blinding);

        let shift = deg + 1;
        let mut reassembled = vec![Fr::from(0u64); coeffs.len() + 2];
        for (j, part) in parts.iter().enumerate() {
            for (i, c) in part.coeffs().iter().enumerate() {
                reassembled[j * shift + i] += *c;
            }
        }
        reassembled.truncate(coeffs.len());
        assert_eq!(reassembled, coeffs);
    }
}

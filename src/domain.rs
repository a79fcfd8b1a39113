//! The size-`n` multiplicative evaluation domain and its NTT.
//!
//! Baby-Plonk circuits have a fixed, power-of-two number of rows `n`, with
//! vanishing polynomial `Z_H(X) = X^n - 1` over the subgroup generated by a
//! primitive `n`-th root of unity `ω`. Quotient evaluation additionally needs
//! a `4n`-point coset transform, since `T(X)` has degree up to roughly `4n`.

use ark_ff::{FftField, Field};
use thiserror::Error;

/// Errors constructing or using a [`Domain`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// `n` was zero or not a power of two.
    #[error("domain size {0} is not a positive power of two")]
    NotPowerOfTwo(usize),
    /// The supplied generator does not satisfy `ω^n = 1`.
    #[error("ω^n != 1: not an n-th root of unity")]
    OmegaNotNthRoot,
    /// The supplied generator is an `n`-th root of unity but not primitive.
    #[error("ω^(n/2) == 1: ω is not a primitive n-th root of unity")]
    OmegaNotPrimitive,
    /// No primitive root of the required order exists in this field.
    #[error("field has no primitive root of unity of order {0}")]
    NoRootOfUnity(usize),
    /// A buffer handed to a transform had the wrong length.
    #[error("buffer length {len} is incompatible with domain size n={n}")]
    BadLen {
        /// Length actually given.
        len: usize,
        /// Expected domain size.
        n: usize,
    },
}

/// The coset shift used for the `4n`-point quotient evaluation. Any fixed
/// non-zero element outside the size-`n` and size-`4n` subgroups works; this
/// is the conventional small generator used across PLONK implementations.
pub const COSET_SHIFT_GENERATOR: u64 = 5;

fn pow_u64<F: Field>(base: F, mut exp: u64) -> F {
    let mut result = F::one();
    let mut b = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result *= b;
        }
        b.square_in_place();
        exp >>= 1;
    }
    result
}

fn powers<F: Field>(root: F, count: usize) -> Vec<F> {
    let mut out = Vec::with_capacity(count);
    let mut acc = F::one();
    for _ in 0..count {
        out.push(acc);
        acc *= root;
    }
    out
}

/// The evaluation domain: its size, primitive root, and the derived size-`4n`
/// coset root used for quotient evaluation.
#[derive(Clone)]
pub struct Domain<F: FftField> {
    /// Number of rows (a power of two).
    pub n: usize,
    /// `log2(n)`.
    pub k: u32,
    /// Primitive `n`-th root of unity.
    pub omega: F,
    /// Primitive `4n`-th root of unity, used by [`Domain::coset_ntt_4n`].
    pub omega_4n: F,
    roots_n: Vec<F>,
    roots_4n: Vec<F>,
}

impl<F: FftField> Domain<F> {
    /// Builds a domain of size `n` from an explicit generator `omega`,
    /// validating that it is a primitive `n`-th root of unity.
    pub fn new(n: usize, omega: F) -> Result<Self, DomainError> {
        if n == 0 || !n.is_power_of_two() {
            return Err(DomainError::NotPowerOfTwo(n));
        }
        let k = n.trailing_zeros();
        if pow_u64(omega, n as u64) != F::one() {
            return Err(DomainError::OmegaNotNthRoot);
        }
        if n > 1 && pow_u64(omega, (n / 2) as u64) == F::one() {
            return Err(DomainError::OmegaNotPrimitive);
        }

        let omega_4n = F::get_root_of_unity(4 * n as u64)
            .ok_or(DomainError::NoRootOfUnity(4 * n))?;

        let roots_n = powers(omega, n);
        let roots_4n = powers(omega_4n, 4 * n);

        Ok(Self {
            n,
            k,
            omega,
            omega_4n,
            roots_n,
            roots_4n,
        })
    }

    /// The size-`4n` coset shift generator as a field element.
    pub fn coset_shift(&self) -> F {
        F::from(COSET_SHIFT_GENERATOR)
    }

    /// The table `[ω^0, ω^1, ..., ω^{n-1}]`.
    pub fn roots_of_unity(&self) -> &[F] {
        &self.roots_n
    }

    /// The table `[ω_4n^0, ω_4n^1, ..., ω_4n^{4n-1}]`.
    pub fn roots_of_unity_4n(&self) -> &[F] {
        &self.roots_4n
    }

    /// Forward NTT: evaluates a length-`n` coefficient vector at every point
    /// of the domain, in place.
    pub fn ntt(&self, a: &mut [F]) -> Result<(), DomainError> {
        if a.len() != self.n {
            return Err(DomainError::BadLen { len: a.len(), n: self.n });
        }
        ntt_in_place(a, self.omega);
        Ok(())
    }

    /// Inverse NTT: recovers the length-`n` coefficient vector from its
    /// domain evaluations, in place.
    pub fn intt(&self, a: &mut [F]) -> Result<(), DomainError> {
        if a.len() != self.n {
            return Err(DomainError::BadLen { len: a.len(), n: self.n });
        }
        intt_in_place(a, self.omega);
        Ok(())
    }

    /// Evaluates a coefficient vector of length up to `4n` over the shifted
    /// coset `g·⟨ω_4n⟩`, zero-extending short inputs. This is how the
    /// quotient polynomial's numerator is evaluated before division.
    pub fn coset_ntt_4n(&self, coeffs: &[F]) -> Result<Vec<F>, DomainError> {
        if coeffs.len() > 4 * self.n {
            return Err(DomainError::BadLen { len: coeffs.len(), n: 4 * self.n });
        }
        let mut buf = vec![F::zero(); 4 * self.n];
        let g = self.coset_shift();
        let mut gi = F::one();
        for (dst, c) in buf.iter_mut().zip(coeffs.iter()) {
            *dst = *c * gi;
            gi *= g;
        }
        ntt_in_place(&mut buf, self.omega_4n);
        Ok(buf)
    }

    /// Inverse of [`Domain::coset_ntt_4n`]: recovers coefficients from `4n`
    /// coset evaluations, undoing the shift.
    pub fn coset_intt_4n(&self, evals: &[F]) -> Result<Vec<F>, DomainError> {
        if evals.len() != 4 * self.n {
            return Err(DomainError::BadLen { len: evals.len(), n: 4 * self.n });
        }
        let mut buf = evals.to_vec();
        intt_in_place(&mut buf, self.omega_4n);
        let g_inv = self
            .coset_shift()
            .inverse()
            .expect("coset shift generator is never zero");
        let mut gi = F::one();
        for c in buf.iter_mut() {
            *c *= gi;
            gi *= g_inv;
        }
        Ok(buf)
    }
}

/// Evaluates a coefficient vector over an arbitrary power-of-two-sized
/// shifted coset `g·⟨ω_size⟩`, zero-extending short inputs.
///
/// The quotient step oversamples beyond the nominal `4n` coset: blinding
/// pushes the true numerator degree past what a `4n` transform can hold
/// without aliasing at small circuit sizes, so the prover picks a larger
/// `size` there instead of deriving a separate blinding-correction term.
pub fn coset_ntt_sized<F: FftField>(coeffs: &[F], size: usize, shift: F) -> Result<Vec<F>, DomainError> {
    if size == 0 || !size.is_power_of_two() {
        return Err(DomainError::NotPowerOfTwo(size));
    }
    if coeffs.len() > size {
        return Err(DomainError::BadLen { len: coeffs.len(), n: size });
    }
    let root = F::get_root_of_unity(size as u64).ok_or(DomainError::NoRootOfUnity(size))?;
    let mut buf = vec![F::zero(); size];
    let mut gi = F::one();
    for (dst, c) in buf.iter_mut().zip(coeffs.iter()) {
        *dst = *c * gi;
        gi *= shift;
    }
    ntt_in_place(&mut buf, root);
    Ok(buf)
}

/// Inverse of [`coset_ntt_sized`].
pub fn coset_intt_sized<F: FftField>(evals: &[F], size: usize, shift: F) -> Result<Vec<F>, DomainError> {
    if size == 0 || !size.is_power_of_two() {
        return Err(DomainError::NotPowerOfTwo(size));
    }
    if evals.len() != size {
        return Err(DomainError::BadLen { len: evals.len(), n: size });
    }
    let root = F::get_root_of_unity(size as u64).ok_or(DomainError::NoRootOfUnity(size))?;
    let mut buf = evals.to_vec();
    intt_in_place(&mut buf, root);
    let shift_inv = shift.inverse().expect("coset shift generator is never zero");
    let mut gi = F::one();
    for c in buf.iter_mut() {
        *c *= gi;
        gi *= shift_inv;
    }
    Ok(buf)
}

fn bit_reverse_permute<F: Copy>(a: &mut [F]) {
    let n = a.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }
}

/// Radix-2 Cooley-Tukey NTT in place, evaluating the coefficient vector `a`
/// (length a power of two) at every power of `root`, where `root` must be a
/// primitive `a.len()`-th root of unity.
pub fn ntt_in_place<F: Field>(a: &mut [F], root: F) {
    let n = a.len();
    if n <= 1 {
        return;
    }
    bit_reverse_permute(a);

    let mut len = 2;
    while len <= n {
        let step = pow_u64(root, (n / len) as u64);
        let half = len / 2;
        let mut start = 0;
        while start < n {
            let mut w = F::one();
            for i in 0..half {
                let u = a[start + i];
                let v = a[start + i + half] * w;
                a[start + i] = u + v;
                a[start + i + half] = u - v;
                w *= step;
            }
            start += len;
        }
        len <<= 1;
    }
}

/// Inverse of [`ntt_in_place`]: recovers coefficients from evaluations at
/// powers of `root`.
pub fn intt_in_place<F: Field>(a: &mut [F], root: F) {
    let n = a.len();
    if n <= 1 {
        return;
    }
    let root_inv = root.inverse().expect("root of unity is never zero");
    ntt_in_place(a, root_inv);
    let n_inv = F::from(n as u64).inverse().expect("n is never zero in a field of characteristic 0 or > n");
    for x in a.iter_mut() {
        *x *= n_inv;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn small_domain() -> Domain<Fr> {
        let omega = Fr::get_root_of_unity(8).unwrap();
        Domain::new(8, omega).unwrap()
    }

    #[test]
    fn ntt_then_intt_is_identity() {
        let domain = small_domain();
        let original: Vec<Fr> = (0..8u64).map(Fr::from).collect();
        let mut buf = original.clone();
        domain.ntt(&mut buf).unwrap();
        domain.intt(&mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn ntt_matches_naive_evaluation() {
        let domain = small_domain();
        let coeffs: Vec<Fr> = (1..=8u64).map(Fr::from).collect();
        let mut buf = coeffs.clone();
        domain.ntt(&mut buf).unwrap();

        for (i, &expected) in buf.iter().enumerate() {
            let x = domain.roots_of_unity()[i];
            let mut acc = Fr::from(0u64);
            let mut xp = Fr::from(1u64);
            for c in &coeffs {
                acc += *c * xp;
                xp *= x;
            }
            assert_eq!(acc, expected);
        }
    }

    #[test]
    fn rejects_non_power_of_two() {
        let omega = Fr::get_root_of_unity(8).unwrap();
        assert_eq!(Domain::new(6, omega), Err(DomainError::NotPowerOfTwo(6)));
    }

    #[test]
    fn rejects_non_root() {
        assert_eq!(Domain::new(8, Fr::from(3u64)), Err(DomainError::OmegaNotNthRoot));
    }

    #[test]
    fn coset_ntt_round_trips() {
        let domain = small_domain();
        let coeffs: Vec<Fr> = (0..32u64).map(Fr::from).collect();
        let evals = domain.coset_ntt_4n(&coeffs).unwrap();
        let back = domain.coset_intt_4n(&evals).unwrap();
        assert_eq!(back, coeffs);
    }

    #[test]
    fn sized_coset_ntt_round_trips_at_an_arbitrary_size() {
        let coeffs: Vec<Fr> = (0..10u64).map(Fr::from).collect();
        let shift = Fr::from(COSET_SHIFT_GENERATOR);
        let evals = coset_ntt_sized(&coeffs, 64, shift).unwrap();
        assert_eq!(evals.len(), 64);
        let back = coset_intt_sized(&evals, 64, shift).unwrap();
        assert_eq!(&back[..coeffs.len()], coeffs.as_slice());
    }
}

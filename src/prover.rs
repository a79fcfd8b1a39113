//! The five-round prover.
//!
//! Round 1 commits the wire polynomials `A`, `B`. Round 2 folds in the
//! permutation challenges `(β, γ)` and commits the grand-product polynomial
//! `Z`. Round 3 folds in the gate-combination challenge `α`, builds the
//! quotient `T` over an oversampled coset, and commits its two splits
//! `T_L`, `T_H`. Round 4 opens `A`, `B`, `σ1` at `ζ` and `A`, `B`, `Z` at
//! `ζω`. Round 5 builds the linearisation polynomial `R` and folds the
//! opening challenges `v`, `v'` into the two KZG witnesses.

use ark_ff::{FftField, Field};
use rand::RngCore;
use thiserror::Error;

use crate::curve::Curve;
use crate::domain::{self, Domain, DomainError};
use crate::evaluations::Evaluations;
use crate::field::{self, FieldError};
use crate::msm;
use crate::poly::{PolyError, Polynomial};
use crate::proof::Proof;
use crate::transcript::Transcript;
use crate::witness::{Witness, WitnessError};
use crate::zkey::{ColumnPoly, ProvingKey, ZkeyError};

/// How far beyond `4n` the quotient's coset evaluation is oversampled when
/// `4n` itself isn't enough room (see `build_and_split_quotient`'s
/// `use_zkey_cosets` check). Blinding pushes the combined
/// gate/permutation/boundary numerator's degree past what a literal `4n`
/// transform can hold without aliasing at small circuit sizes (the worst
/// case reaches `3n+4`, which collides with `4n` already at `n=4`).
/// Evaluating over `8n` points instead keeps every term below the
/// transform size with margin to spare, without needing a separately
/// derived blinding-correction polynomial: `Z_H` still divides the combined
/// numerator exactly on the subgroup no matter how the coset evaluation was
/// sized. At `n > 4` the worst case fits under a plain `4n` transform, so
/// the prover reads the zkey's own precomputed `4n` coset evaluations for
/// `Q1`, `Q2`, `σ1`, `σ2`, and the public-input Lagrange columns instead of
/// recomputing them.
const QUOTIENT_OVERSAMPLE: usize = 8;

/// Errors the prover can raise.
#[derive(Debug, Error)]
pub enum ProverError {
    /// A domain construction or transform failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A polynomial operation failed.
    #[error(transparent)]
    Poly(#[from] PolyError),
    /// A field operation failed (e.g. inverting zero).
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The witness did not match the proving key's shape.
    #[error(transparent)]
    Witness(#[from] WitnessError),
    /// The proving key itself failed to decode.
    #[error(transparent)]
    Zkey(#[from] ZkeyError),
    /// The powers-of-τ table in the proving key is too short for the
    /// polynomial being committed.
    #[error("proving key has {available} SRS powers, need {needed}")]
    SrsTooShort {
        /// Powers present.
        available: usize,
        /// Powers needed.
        needed: usize,
    },
    /// The permutation accumulator did not telescope back to `1`: the
    /// witness does not satisfy the circuit's copy constraints.
    #[error("permutation accumulator did not return to 1: copy constraints violated")]
    CopyConstraintViolation,
}

fn column_poly<F: Field>(column: &ColumnPoly<F>) -> Polynomial<F> {
    Polynomial::new(column.coeffs.clone())
}

fn evals_at_domain<F: FftField>(domain: &Domain<F>, column: &ColumnPoly<F>) -> Result<Vec<F>, DomainError> {
    let mut v = column.coeffs.clone();
    domain.ntt(&mut v)?;
    Ok(v)
}

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

/// The prover: a proving key plus the domain derived from it.
pub struct Prover<'a, C: Curve> {
    key: &'a ProvingKey<C>,
    domain: Domain<C::Fr>,
}

impl<'a, C: Curve> Prover<'a, C> {
    /// Builds a prover from a decoded proving key, deriving the evaluation
    /// domain from its declared size via the field's canonical root of
    /// unity.
    pub fn new(key: &'a ProvingKey<C>) -> Result<Self, ProverError> {
        let n = key.n();
        let omega = C::Fr::get_root_of_unity(n as u64).ok_or(DomainError::NoRootOfUnity(n))?;
        let domain = Domain::new(n, omega)?;
        Ok(Self { key, domain })
    }

    fn commit(&self, poly: &Polynomial<C::Fr>) -> Result<C::G1Affine, ProverError> {
        let needed = poly.len();
        if self.key.ptau.len() < needed {
            return Err(ProverError::SrsTooShort { available: self.key.ptau.len(), needed });
        }
        Ok(msm::multi_exp(&self.key.ptau[..needed], poly.coeffs()))
    }

    /// Produces a proof that `witness` satisfies the circuit described by
    /// this prover's proving key.
    pub fn prove<R: RngCore>(&self, witness: &Witness<C::Fr>, rng: &mut R) -> Result<Proof<C>, ProverError> {
        let n = self.domain.n;
        let direct_len = self.key.n_vars - self.key.n_additions;
        witness.check_len(direct_len as usize)?;

        // Preflight: index 0 of the witness (the constant `1`) never feeds
        // the protocol directly.
        let mut values = witness.values().to_vec();
        if !values.is_empty() {
            values[0] = C::Fr::zero();
        }
        let zeroed_witness = Witness::new(values);

        let n_public = self.key.n_public as usize;
        let n_constraints = self.key.n_constraints as usize;

        let mut a_vals: Vec<C::Fr> = (0..n_constraints)
            .map(|i| zeroed_witness.resolve(self.key.a_map[i], direct_len, &self.key.additions))
            .collect();
        let mut b_vals: Vec<C::Fr> = (0..n_constraints)
            .map(|i| {
                let raw = zeroed_witness.resolve(self.key.b_map[i], direct_len, &self.key.additions);
                let signed = if i % 2 == 1 { -raw } else { raw };
                signed + self.key.k_correction[i]
            })
            .collect();
        a_vals.resize(n, C::Fr::zero());
        b_vals.resize(n, C::Fr::zero());

        let mut transcript = Transcript::new();

        // ---- Round 1 ----
        let blind_a = field::random_vec::<C::Fr, _>(rng, 2);
        let blind_b = field::random_vec::<C::Fr, _>(rng, 2);

        let mut a_poly = Polynomial::from_evaluations(&self.domain, &a_vals)?;
        a_poly.blind(n, &blind_a);
        let mut b_poly = Polynomial::from_evaluations(&self.domain, &b_vals)?;
        b_poly.blind(n, &blind_b);

        let a_comm = self.commit(&a_poly)?;
        let b_comm = self.commit(&b_poly)?;

        // ---- Round 2 ----
        for public in &a_vals[..n_public] {
            transcript.absorb_scalar(public);
        }
        transcript.absorb_commitment(&a_comm);
        transcript.absorb_commitment(&b_comm);
        let beta: C::Fr = transcript.squeeze_challenge();
        transcript.reset();
        transcript.absorb_scalar(&beta);
        let gamma: C::Fr = transcript.squeeze_challenge();

        let z_vals = self.build_permutation_accumulator(&a_vals, &b_vals, beta, gamma)?;
        let blind_z = field::random_vec::<C::Fr, _>(rng, 3);
        let mut z_poly = Polynomial::from_evaluations(&self.domain, &z_vals)?;
        z_poly.blind(n, &blind_z);

        let z_comm = self.commit(&z_poly)?;

        // ---- Round 3 ----
        transcript.absorb_commitment(&z_comm);
        let alpha: C::Fr = transcript.squeeze_challenge();

        let quotient_deg = n;
        let (t_l_poly, t_h_poly) =
            self.build_and_split_quotient(&a_poly, &b_poly, &z_poly, &a_vals, beta, gamma, alpha, quotient_deg, rng)?;

        let t_l_comm = self.commit(&t_l_poly)?;
        let t_h_comm = self.commit(&t_h_poly)?;

        // ---- Round 4 ----
        transcript.absorb_commitment(&t_l_comm);
        transcript.absorb_commitment(&t_h_comm);
        let zeta: C::Fr = transcript.squeeze_challenge();
        let zeta_omega = zeta * self.domain.omega;

        let sigma1_poly = column_poly(&self.key.sigma1);

        let eval_a = a_poly.evaluate(zeta);
        let eval_b = b_poly.evaluate(zeta);
        let eval_s1 = sigma1_poly.evaluate(zeta);
        let eval_a_omega = a_poly.evaluate(zeta_omega);
        let eval_b_omega = b_poly.evaluate(zeta_omega);
        let eval_z_omega = z_poly.evaluate(zeta_omega);

        let split_shift = pow_u64(zeta, (quotient_deg + 1) as u64);
        let eval_t = t_l_poly.evaluate(zeta) + split_shift * t_h_poly.evaluate(zeta);

        // ---- Round 5 ----
        transcript.absorb_scalar(&eval_a);
        transcript.absorb_scalar(&eval_b);
        transcript.absorb_scalar(&eval_s1);
        transcript.absorb_scalar(&eval_a_omega);
        transcript.absorb_scalar(&eval_b_omega);
        transcript.absorb_scalar(&eval_z_omega);
        let v0: C::Fr = transcript.squeeze_challenge();
        let v1 = v0 * v0;
        let v2 = v1 * v0;
        let v3 = v2 * v0;
        transcript.reset();
        transcript.absorb_scalar(&v0);
        let v0p: C::Fr = transcript.squeeze_challenge();
        let v1p = v0p * v0p;

        let r_poly = self.build_linearisation(
            &z_poly, eval_a, eval_b, eval_s1, eval_a_omega, eval_z_omega, beta, gamma, alpha, zeta,
        )?;
        let eval_r = r_poly.evaluate(zeta);

        let mut w_zeta_poly = t_l_poly.clone();
        let mut t_h_scaled = t_h_poly.clone();
        t_h_scaled.mul_scalar(split_shift);
        w_zeta_poly.add_assign_scaled(&t_h_scaled, None);
        w_zeta_poly.add_assign_scaled(&r_poly, Some(v0));
        w_zeta_poly.add_assign_scaled(&a_poly, Some(v1));
        w_zeta_poly.add_assign_scaled(&b_poly, Some(v2));
        w_zeta_poly.add_assign_scaled(&sigma1_poly, Some(v3));
        let w_zeta_const = eval_t + v0 * eval_r + v1 * eval_a + v2 * eval_b + v3 * eval_s1;
        w_zeta_poly.sub_scalar(w_zeta_const);
        w_zeta_poly.div_by_x_minus(zeta)?;
        let w_zeta_comm = self.commit(&w_zeta_poly)?;

        let mut w_zeta_omega_poly = z_poly.clone();
        w_zeta_omega_poly.add_assign_scaled(&a_poly, Some(v0p));
        w_zeta_omega_poly.add_assign_scaled(&b_poly, Some(v1p));
        let w_zeta_omega_const = eval_z_omega + v0p * eval_a_omega + v1p * eval_b_omega;
        w_zeta_omega_poly.sub_scalar(w_zeta_omega_const);
        w_zeta_omega_poly.div_by_x_minus(zeta_omega)?;
        let w_zeta_omega_comm = self.commit(&w_zeta_omega_poly)?;

        Ok(Proof {
            a: a_comm,
            b: b_comm,
            z: z_comm,
            t_l: t_l_comm,
            t_h: t_h_comm,
            w_zeta: w_zeta_comm,
            w_zeta_omega: w_zeta_omega_comm,
            eval_a,
            eval_b,
            eval_s1,
            eval_a_omega,
            eval_b_omega,
            eval_z_omega,
            eval_r,
        })
    }

    /// Builds the permutation grand-product evaluations over the full
    /// cycle: `z[0] = 1`, `z[(i+1) mod n] = z[i] * Π (wire + β·id + γ) /
    /// Π (wire + β·σ + γ)`. The wraparound value at `i = n-1` must land back
    /// on `1`; otherwise the witness fails the copy constraints.
    fn build_permutation_accumulator(
        &self,
        a_vals: &[C::Fr],
        b_vals: &[C::Fr],
        beta: C::Fr,
        gamma: C::Fr,
    ) -> Result<Vec<C::Fr>, ProverError> {
        let n = self.domain.n;
        let sigma1_evals = evals_at_domain(&self.domain, &self.key.sigma1)?;
        let sigma2_evals = evals_at_domain(&self.domain, &self.key.sigma2)?;
        let roots = self.domain.roots_of_unity();
        let k1 = self.key.k1;

        let mut denominators = Vec::with_capacity(n);
        let mut numerators = Vec::with_capacity(n);
        for i in 0..n {
            let num = (a_vals[i] + beta * roots[i] + gamma) * (b_vals[i] + beta * k1 * roots[i] + gamma);
            let den = (a_vals[i] + beta * sigma1_evals[i] + gamma) * (b_vals[i] + beta * sigma2_evals[i] + gamma);
            numerators.push(num);
            denominators.push(den);
        }
        field::batch_inverse(&mut denominators)?;

        let mut z = vec![C::Fr::zero(); n];
        z[0] = C::Fr::one();
        for i in 0..n {
            let next = (i + 1) % n;
            z[next] = z[i] * numerators[i] * denominators[i];
        }
        if z[0] != C::Fr::one() {
            return Err(ProverError::CopyConstraintViolation);
        }
        Ok(z)
    }

    /// Builds the quotient polynomial over an oversampled coset and splits
    /// it into `T_L`, `T_H`, each of degree `deg`.
    #[allow(clippy::too_many_arguments)]
    fn build_and_split_quotient<R: RngCore>(
        &self,
        a_poly: &Polynomial<C::Fr>,
        b_poly: &Polynomial<C::Fr>,
        z_poly: &Polynomial<C::Fr>,
        a_vals: &[C::Fr],
        beta: C::Fr,
        gamma: C::Fr,
        alpha: C::Fr,
        deg: usize,
        rng: &mut R,
    ) -> Result<(Polynomial<C::Fr>, Polynomial<C::Fr>), ProverError> {
        let n = self.domain.n;
        // The combined numerator's worst-case degree is 3n+4 (the
        // permutation term's product of three blinded degree-(n+1..n+2)
        // factors). A plain `4n` coset only avoids aliasing once
        // `3n+4 < 4n`, i.e. `n > 4`; below that the zkey's precomputed `4n`
        // coset evaluations can't be reused and the prover falls back to
        // its own `8n`-oversampled transform instead.
        let use_zkey_cosets = n > 4;
        let oversample = if use_zkey_cosets { 4 } else { QUOTIENT_OVERSAMPLE };
        let m = oversample * n;
        let shift_steps = oversample;
        let coset_shift = self.domain.coset_shift();

        let a_coset = Evaluations::new(domain::coset_ntt_sized(a_poly.coeffs(), m, coset_shift)?);
        let b_coset = Evaluations::new(domain::coset_ntt_sized(b_poly.coeffs(), m, coset_shift)?);
        let z_coset = Evaluations::new(domain::coset_ntt_sized(z_poly.coeffs(), m, coset_shift)?);

        let (q1_coset, q2_coset, sigma1_coset, sigma2_coset) = if use_zkey_cosets {
            (
                Evaluations::new(self.key.q1.evals_4n.clone()),
                Evaluations::new(self.key.q2.evals_4n.clone()),
                Evaluations::new(self.key.sigma1.evals_4n.clone()),
                Evaluations::new(self.key.sigma2.evals_4n.clone()),
            )
        } else {
            (
                Evaluations::new(domain::coset_ntt_sized(&self.key.q1.coeffs, m, coset_shift)?),
                Evaluations::new(domain::coset_ntt_sized(&self.key.q2.coeffs, m, coset_shift)?),
                Evaluations::new(domain::coset_ntt_sized(&self.key.sigma1.coeffs, m, coset_shift)?),
                Evaluations::new(domain::coset_ntt_sized(&self.key.sigma2.coeffs, m, coset_shift)?),
            )
        };

        let mut l1_evals = vec![C::Fr::zero(); n];
        l1_evals[0] = C::Fr::one();
        let l1_poly = Polynomial::from_evaluations(&self.domain, &l1_evals)?;
        let l1_coset = Evaluations::new(domain::coset_ntt_sized(l1_poly.coeffs(), m, coset_shift)?);

        let n_public = self.key.lagrange.len();
        let lagrange_cosets: Vec<Evaluations<C::Fr>> = if use_zkey_cosets {
            self.key.lagrange.iter().map(|col| Evaluations::new(col.evals_4n.clone())).collect()
        } else {
            self.key
                .lagrange
                .iter()
                .map(|col| domain::coset_ntt_sized(&col.coeffs, m, coset_shift).map(Evaluations::new))
                .collect::<Result<_, DomainError>>()?
        };

        let root_m = C::Fr::get_root_of_unity(m as u64).ok_or(DomainError::NoRootOfUnity(m))?;

        let k1 = self.key.k1;
        let alpha_sq = alpha * alpha;
        let mut t_num = Vec::with_capacity(m);
        let mut x = coset_shift;
        for i in 0..m {
            let ip = (i + shift_steps) % m;

            let gate = if i % 2 == 0 {
                let a = a_coset.get_wrapped(i as isize);
                let b = b_coset.get_wrapped(i as isize);
                let aw = a_coset.get_wrapped(ip as isize);
                let bw = b_coset.get_wrapped(ip as isize);
                let q1 = q1_coset.get_wrapped(i as isize);
                let q1p = q1_coset.get_wrapped(ip as isize);
                let q2 = q2_coset.get_wrapped(i as isize);
                let q2p = q2_coset.get_wrapped(ip as isize);
                a * q1 + b * q2 + (a * b) * q1p + (a * aw) * q2p + bw
            } else {
                C::Fr::zero()
            };

            let a = a_coset.get_wrapped(i as isize);
            let b = b_coset.get_wrapped(i as isize);
            let z = z_coset.get_wrapped(i as isize);
            let zw = z_coset.get_wrapped(ip as isize);
            let s1 = sigma1_coset.get_wrapped(i as isize);
            let s2 = sigma2_coset.get_wrapped(i as isize);
            let perm = (a + beta * x + gamma) * (b + beta * k1 * x + gamma) * z
                - (a + beta * s1 + gamma) * (b + beta * s2 + gamma) * zw;

            let boundary = (z - C::Fr::one()) * l1_coset.get_wrapped(i as isize);

            let mut pub_correction = C::Fr::zero();
            for j in 0..n_public {
                pub_correction += lagrange_cosets[j].get_wrapped(i as isize) * a_vals[j];
            }

            t_num.push(gate + alpha * perm + alpha_sq * boundary - pub_correction);
            x *= root_m;
        }

        let mut t_poly = Polynomial::new(domain::coset_intt_sized(&t_num, m, coset_shift)?);
        t_poly.div_by_zh(n)?;
        t_poly.truncate();

        let blinding = field::random_vec::<C::Fr, _>(rng, 1);
        let parts = t_poly.split(2, deg, &blinding);
        let mut iter = parts.into_iter();
        let t_l = iter.next().expect("split always returns num_parts polynomials");
        let t_h = iter.next().expect("split always returns num_parts polynomials");
        Ok((t_l, t_h))
    }

    /// Builds the linearisation polynomial `R(X)`, matching `Z`'s (blinded)
    /// length: the gate, permutation, and boundary identity with every
    /// already-opened wire value pinned to its scalar, leaving only `Z`,
    /// `Q1`, `Q2`, `σ2` as polynomials.
    #[allow(clippy::too_many_arguments)]
    fn build_linearisation(
        &self,
        z_poly: &Polynomial<C::Fr>,
        eval_a: C::Fr,
        eval_b: C::Fr,
        eval_s1: C::Fr,
        eval_a_omega: C::Fr,
        eval_z_omega: C::Fr,
        beta: C::Fr,
        gamma: C::Fr,
        alpha: C::Fr,
        zeta: C::Fr,
    ) -> Result<Polynomial<C::Fr>, ProverError> {
        let n = self.domain.n;
        let k1 = self.key.k1;

        let zeta_n = pow_u64(zeta, n as u64);
        let denom = C::Fr::from(n as u64) * (zeta - C::Fr::one());
        let l1_zeta = if denom.is_zero() {
            C::Fr::one()
        } else {
            (zeta_n - C::Fr::one()) * denom.inverse().expect("checked non-zero above")
        };

        let alpha_sq = alpha * alpha;
        let coef_z =
            alpha * (eval_a + beta * zeta + gamma) * (eval_b + beta * k1 * zeta + gamma) + alpha_sq * l1_zeta;

        let mut r_coeffs = vec![C::Fr::zero(); z_poly.len()];
        for (i, c) in z_poly.coeffs().iter().enumerate() {
            r_coeffs[i] = coef_z * *c;
        }

        let q1_coeffs = &self.key.q1.coeffs;
        let q2_coeffs = &self.key.q2.coeffs;
        let sigma2_coeffs = &self.key.sigma2.coeffs;
        let coef_s2 = (eval_a + beta * eval_s1 + gamma) * beta * eval_z_omega * alpha;

        for i in 0..n {
            if i % 2 == 0 {
                let ip = (i + 1) % n;
                r_coeffs[i] += eval_a * q1_coeffs[i]
                    + eval_b * q2_coeffs[i]
                    + (eval_a * eval_b) * q1_coeffs[ip]
                    + (eval_a * eval_a_omega) * q2_coeffs[ip];
            }
            r_coeffs[i] -= coef_s2 * sigma2_coeffs[i];
        }

        Ok(Polynomial::new(r_coeffs))
    }
}

//! Multi-scalar multiplication over `G1`.
//!
//! The prover commits to every polynomial by MSM against the proving key's
//! powers-of-τ table. This is a textbook windowed (bucket-method) Pippenger
//! implementation: split each scalar into `c`-bit windows, accumulate points
//! into `2^c - 1` buckets per window, then combine windows high to low with
//! repeated doubling.

use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{BigInteger, PrimeField};

/// Computes `Σ_i scalars[i] * points[i]` and returns the affine result.
///
/// `points` must be at least as long as `scalars`; any extra points are
/// ignored. Returns the identity if `scalars` is empty.
pub fn multi_exp<G: AffineRepr>(points: &[G], scalars: &[G::ScalarField]) -> G {
    assert!(points.len() >= scalars.len(), "not enough points for the given scalars");
    if scalars.is_empty() {
        return G::zero();
    }

    let c = window_bits(scalars.len());
    let num_bits = G::ScalarField::MODULUS_BIT_SIZE as usize;
    let num_windows = (num_bits + c - 1) / c;
    let num_buckets = (1usize << c) - 1;

    let scalar_bits: Vec<Vec<bool>> = scalars.iter().map(|s| s.into_bigint().to_bits_le()).collect();

    let mut total = G::Group::zero();
    for w in (0..num_windows).rev() {
        for _ in 0..c {
            total = total.double();
        }

        let mut buckets = vec![G::Group::zero(); num_buckets];
        for (point, bits) in points.iter().zip(scalar_bits.iter()) {
            let value = window_value(bits, w, c);
            if value != 0 {
                buckets[value - 1] += point;
            }
        }

        // Running-sum trick: summing buckets from the top down and
        // accumulating a running total avoids a second O(2^c) pass.
        let mut running = G::Group::zero();
        let mut window_sum = G::Group::zero();
        for bucket in buckets.iter().rev() {
            running += bucket;
            window_sum += running;
        }
        total += window_sum;
    }

    total.into_affine()
}

fn window_value(bits: &[bool], window: usize, c: usize) -> usize {
    let start = window * c;
    let mut value = 0usize;
    for i in 0..c {
        let idx = start + i;
        if idx < bits.len() && bits[idx] {
            value |= 1 << i;
        }
    }
    value
}

/// Picks a window width that trades off bucket-setup cost against the
/// number of passes, following the usual `log2(n)`-ish heuristic.
fn window_bits(n: usize) -> usize {
    if n < 32 {
        3
    } else {
        (ark_std::log2(n) as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fr, G1Affine, G1Projective};
    use ark_ec::{CurveGroup, Group};
    use ark_std::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn matches_naive_accumulation() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let points: Vec<G1Affine> = (0..20)
            .map(|_| G1Projective::rand(&mut rng).into_affine())
            .collect();
        let scalars: Vec<Fr> = (0..20).map(|_| Fr::rand(&mut rng)).collect();

        let got = multi_exp(&points, &scalars);

        let mut expected = G1Projective::zero();
        for (p, s) in points.iter().zip(scalars.iter()) {
            expected += p.into_group() * s;
        }

        assert_eq!(got, expected.into_affine());
    }

    #[test]
    fn empty_scalars_give_identity() {
        let points: Vec<G1Affine> = vec![];
        let scalars: Vec<Fr> = vec![];
        assert_eq!(multi_exp(&points, &scalars), G1Affine::zero());
    }
}

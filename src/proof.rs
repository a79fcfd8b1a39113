//! The proof object.
//!
//! A proof is seven `G1` commitments and seven scalar openings, tagged with
//! the protocol name and curve so a verifier can tell at a glance whether it
//! knows how to check it.

use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::Serialize;

use crate::curve::Curve;
use crate::field;

/// The protocol tag every Baby-Plonk proof carries.
pub const PROTOCOL_NAME: &str = "baby_plonk";

/// A Baby-Plonk proof: the five-round prover's commitments and the
/// evaluation opening that lets a verifier check them.
#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<C: Curve> {
    /// Commitment to the `A` wire polynomial.
    pub a: C::G1Affine,
    /// Commitment to the `B` wire polynomial.
    pub b: C::G1Affine,
    /// Commitment to the permutation polynomial `Z`.
    pub z: C::G1Affine,
    /// Commitment to the quotient's low split, `T_L`.
    pub t_l: C::G1Affine,
    /// Commitment to the quotient's high split, `T_H`.
    pub t_h: C::G1Affine,
    /// Opening proof at `ζ`.
    pub w_zeta: C::G1Affine,
    /// Opening proof at `ζω`.
    pub w_zeta_omega: C::G1Affine,
    /// `A(ζ)`.
    pub eval_a: C::Fr,
    /// `B(ζ)`.
    pub eval_b: C::Fr,
    /// `σ1(ζ)`.
    pub eval_s1: C::Fr,
    /// `A(ζω)`.
    pub eval_a_omega: C::Fr,
    /// `B(ζω)`.
    pub eval_b_omega: C::Fr,
    /// `Z(ζω)`.
    pub eval_z_omega: C::Fr,
    /// `R(ζ)`, the linearisation polynomial's opening.
    pub eval_r: C::Fr,
}

impl<C: Curve> Proof<C> {
    /// The curve name this proof was produced over, as it should appear
    /// alongside the proof in its human-readable encoding.
    pub fn curve_name(&self) -> &'static str {
        C::NAME
    }

    /// The protocol tag, always `"baby_plonk"`.
    pub fn protocol_name(&self) -> &'static str {
        PROTOCOL_NAME
    }
}

/// Renders a circuit's public inputs as decimal strings, the convention
/// used alongside a proof for human-readable display.
pub fn public_inputs_decimal<F: ark_ff::PrimeField>(public_inputs: &[F]) -> Vec<String> {
    public_inputs.iter().map(field::to_decimal_string).collect()
}

fn point_decimal<G: AffineRepr>(point: &G) -> [String; 2]
where
    G::BaseField: ark_ff::PrimeField,
{
    let (x, y) = point.xy().unwrap_or((G::BaseField::zero(), G::BaseField::zero()));
    [field::to_decimal_string(&x), field::to_decimal_string(&y)]
}

/// The proof's external, human-readable encoding: group commitments and
/// scalar openings under the exact keys a verifier expects, tagged with the
/// protocol and curve name. This is distinct from [`Proof`]'s own
/// `ark-serialize` binary form, which is what the prover actually commits
/// to disk; `ProofJson` exists for interchange with tooling that consumes
/// proofs as JSON.
#[derive(Clone, Debug, Serialize)]
pub struct ProofJson {
    /// Commitment to `A`, as decimal `[x, y]`.
    #[serde(rename = "A")]
    pub a: [String; 2],
    /// Commitment to `B`.
    #[serde(rename = "B")]
    pub b: [String; 2],
    /// Commitment to `Z`.
    #[serde(rename = "Z")]
    pub z: [String; 2],
    /// Commitment to `T_L`.
    #[serde(rename = "TL")]
    pub t_l: [String; 2],
    /// Commitment to `T_H`.
    #[serde(rename = "TH")]
    pub t_h: [String; 2],
    /// Opening proof at `ζ`.
    #[serde(rename = "Wxi")]
    pub w_xi: [String; 2],
    /// Opening proof at `ζω`.
    #[serde(rename = "Wxiw")]
    pub w_xiw: [String; 2],
    /// `A(ζ)`.
    #[serde(rename = "a")]
    pub a_eval: String,
    /// `B(ζ)`.
    #[serde(rename = "b")]
    pub b_eval: String,
    /// `σ1(ζ)`.
    pub s1: String,
    /// `A(ζω)`.
    pub aw: String,
    /// `B(ζω)`.
    pub bw: String,
    /// `Z(ζω)`.
    pub zw: String,
    /// `R(ζ)`.
    pub r: String,
    /// Always `"baby_plonk"`.
    pub protocol: &'static str,
    /// The curve this proof was produced over.
    pub curve: &'static str,
}

impl<C: Curve> Proof<C> {
    /// Renders this proof in its keyed, human-readable form.
    pub fn to_keyed(&self) -> ProofJson {
        ProofJson {
            a: point_decimal(&self.a),
            b: point_decimal(&self.b),
            z: point_decimal(&self.z),
            t_l: point_decimal(&self.t_l),
            t_h: point_decimal(&self.t_h),
            w_xi: point_decimal(&self.w_zeta),
            w_xiw: point_decimal(&self.w_zeta_omega),
            a_eval: field::to_decimal_string(&self.eval_a),
            b_eval: field::to_decimal_string(&self.eval_b),
            s1: field::to_decimal_string(&self.eval_s1),
            aw: field::to_decimal_string(&self.eval_a_omega),
            bw: field::to_decimal_string(&self.eval_b_omega),
            zw: field::to_decimal_string(&self.eval_z_omega),
            r: field::to_decimal_string(&self.eval_r),
            protocol: self.protocol_name(),
            curve: self.curve_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Bn254Curve;
    use ark_bn254::Fr;
    use ark_ec::AffineRepr;

    #[test]
    fn tags_are_stable() {
        let proof = Proof::<Bn254Curve> {
            a: ark_bn254::G1Affine::zero(),
            b: ark_bn254::G1Affine::zero(),
            z: ark_bn254::G1Affine::zero(),
            t_l: ark_bn254::G1Affine::zero(),
            t_h: ark_bn254::G1Affine::zero(),
            w_zeta: ark_bn254::G1Affine::zero(),
            w_zeta_omega: ark_bn254::G1Affine::zero(),
            eval_a: Fr::from(0u64),
            eval_b: Fr::from(0u64),
            eval_s1: Fr::from(0u64),
            eval_a_omega: Fr::from(0u64),
            eval_b_omega: Fr::from(0u64),
            eval_z_omega: Fr::from(0u64),
            eval_r: Fr::from(0u64),
        };
        assert_eq!(proof.protocol_name(), "baby_plonk");
        assert_eq!(proof.curve_name(), "bn128");
    }

    #[test]
    fn public_inputs_render_as_decimal() {
        let inputs = vec![Fr::from(7u64), Fr::from(1000u64)];
        assert_eq!(public_inputs_decimal(&inputs), vec!["7".to_string(), "1000".to_string()]);
    }

    #[test]
    fn keyed_json_uses_the_documented_keys() {
        let proof = Proof::<Bn254Curve> {
            a: ark_bn254::G1Affine::zero(),
            b: ark_bn254::G1Affine::zero(),
            z: ark_bn254::G1Affine::zero(),
            t_l: ark_bn254::G1Affine::zero(),
            t_h: ark_bn254::G1Affine::zero(),
            w_zeta: ark_bn254::G1Affine::zero(),
            w_zeta_omega: ark_bn254::G1Affine::zero(),
            eval_a: Fr::from(3u64),
            eval_b: Fr::from(0u64),
            eval_s1: Fr::from(0u64),
            eval_a_omega: Fr::from(0u64),
            eval_b_omega: Fr::from(0u64),
            eval_z_omega: Fr::from(0u64),
            eval_r: Fr::from(0u64),
        };
        let json = serde_json::to_value(proof.to_keyed()).unwrap();
        assert_eq!(json["a"], "3");
        assert_eq!(json["protocol"], "baby_plonk");
        assert_eq!(json["curve"], "bn128");
        assert!(json.get("A").is_some());
        assert!(json.get("Wxiw").is_some());
    }
}

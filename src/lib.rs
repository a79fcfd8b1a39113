//! Baby-Plonk prover core.
//!
//! Baby-Plonk is a PLONK variant in which each circuit constraint is encoded
//! across a pair of adjacent rows (wire columns `a`, `b` plus the "primed"
//! values `a'`, `b'` taken from the following row). This crate implements the
//! prover side: it consumes a witness and a precomputed proving key (zkey)
//! and emits a succinct argument that the witness satisfies the circuit.
//!
//! The crate is organized leaf-first, mirroring the protocol's own
//! dependency order:
//!
//! - [`field`] — scalar arithmetic helpers layered on `ark_ff::PrimeField`.
//! - [`curve`] — the abstract curve interface the core consumes (BN254 and
//!   BLS12-381 concrete instances).
//! - [`domain`] — the size-`n` evaluation domain and its NTT/coset-NTT.
//! - [`poly`] — dense coefficient-form polynomials.
//! - [`evaluations`] — dense evaluation-form vectors over the `4n` coset.
//! - [`transcript`] — the Keccak-256 Fiat–Shamir transcript.
//! - [`msm`] — multi-scalar multiplication over `G1`.
//! - [`zkey`] — proving-key section parsing.
//! - [`witness`] — witness-file parsing.
//! - [`proof`] — the proof object and its wire encoding.
//! - [`prover`] — the five-round prover.
//!
//! No general-purpose polynomial commitment library, no verifier, and no
//! protocol negotiation live here: this crate's only product is a `Proof`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod curve;
pub mod domain;
pub mod evaluations;
pub mod field;
pub mod msm;
pub mod poly;
pub mod proof;
pub mod prover;
pub mod transcript;
pub mod witness;
pub mod zkey;

pub use curve::{Bls12_381Curve, Bn254Curve, Curve};
pub use field::FieldError;
pub use proof::Proof;
pub use prover::{Prover, ProverError};

//! Thin CLI wrapper around [`baby_plonk_prover::Prover`].
//!
//! This is not a general zkey/wtns tool: it expects the proving key to
//! already be split into one file per section (named by the section id
//! from [`baby_plonk_prover::zkey::section_id`], e.g. `1.bin`, `2.bin`, ...)
//! under a directory, and the witness as a single wtns-style value array.
//! Reading the real sectioned container formats is out of scope for this
//! crate.
//!
//! ```text
//! prove --curve bn128 --sections ./sections --witness witness.wtns --out proof.bin
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ark_serialize::CanonicalSerialize;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use baby_plonk_prover::curve::{Bls12_381Curve, Bn254Curve, Curve};
use baby_plonk_prover::proof::public_inputs_decimal;
use baby_plonk_prover::prover::Prover;
use baby_plonk_prover::witness::Witness;
use baby_plonk_prover::zkey::{section_id, InMemorySections, ProvingKey, SectionSource};

struct Args {
    curve: String,
    sections_dir: PathBuf,
    witness_path: PathBuf,
    out_path: PathBuf,
    seed: u64,
}

fn parse_args() -> Result<Args> {
    let mut curve = "bn128".to_string();
    let mut sections_dir = None;
    let mut witness_path = None;
    let mut out_path = PathBuf::from("proof.bin");
    let mut seed = 0u64;

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--curve" => curve = it.next().context("--curve needs a value")?,
            "--sections" => sections_dir = Some(PathBuf::from(it.next().context("--sections needs a value")?)),
            "--witness" => witness_path = Some(PathBuf::from(it.next().context("--witness needs a value")?)),
            "--out" => out_path = PathBuf::from(it.next().context("--out needs a value")?),
            "--seed" => seed = it.next().context("--seed needs a value")?.parse()?,
            other => bail!("unrecognized flag {other}"),
        }
    }

    Ok(Args {
        curve,
        sections_dir: sections_dir.context("--sections is required")?,
        witness_path: witness_path.context("--witness is required")?,
        out_path,
        seed,
    })
}

fn load_sections(dir: &std::path::Path) -> Result<InMemorySections> {
    let ids = [
        section_id::HEADER,
        section_id::ADDITIONS,
        section_id::A_MAP,
        section_id::B_MAP,
        section_id::K_CORRECTION,
        section_id::Q1,
        section_id::Q2,
        section_id::SIGMA,
        section_id::LAGRANGE,
        section_id::PTAU,
    ];
    let mut sections = InMemorySections::new();
    for id in ids {
        let path = dir.join(format!("{id}.bin"));
        let bytes = fs::read(&path).with_context(|| format!("reading section file {}", path.display()))?;
        sections.insert(id, bytes);
    }
    Ok(sections)
}

fn run<C: Curve>(sections: &InMemorySections, witness_bytes: &[u8], seed: u64) -> Result<Vec<u8>> {
    let key = ProvingKey::<C>::from_sections(sections).context("decoding proving key")?;
    let witness = Witness::<C::Fr>::from_bytes(witness_bytes).context("decoding witness")?;

    // Witness index 0 is always the constant `1`; public signals occupy the
    // next `n_public` slots.
    let public_inputs = &witness.values()[1..=key.n_public as usize];
    eprintln!("public inputs: {:?}", public_inputs_decimal(public_inputs));

    let prover = Prover::new(&key).context("building prover from proving key")?;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let proof = prover.prove(&witness, &mut rng).context("proving")?;

    let mut out = Vec::new();
    proof.serialize_compressed(&mut out).context("serializing proof")?;
    Ok(out)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let sections = load_sections(&args.sections_dir)?;
    let witness_bytes = fs::read(&args.witness_path).with_context(|| format!("reading witness {}", args.witness_path.display()))?;

    let proof_bytes = match args.curve.as_str() {
        "bn128" => run::<Bn254Curve>(&sections, &witness_bytes, args.seed)?,
        "bls12381" => run::<Bls12_381Curve>(&sections, &witness_bytes, args.seed)?,
        other => bail!("unsupported curve {other} (expected bn128 or bls12381)"),
    };

    fs::write(&args.out_path, &proof_bytes).with_context(|| format!("writing proof to {}", args.out_path.display()))?;
    eprintln!("wrote {} bytes to {}", proof_bytes.len(), args.out_path.display());
    eprintln!("proof (hex): {}", hex::encode(&proof_bytes));
    Ok(())
}

//! Proving-key (zkey) section parsing.
//!
//! The zkey file itself is a generic sectioned binary container; reading
//! that container format is an external concern this crate does not
//! implement. What belongs here is the *payload* layout of each section: a
//! [`SectionSource`] hands back raw bytes per section id, and
//! [`ProvingKey::from_sections`] decodes those bytes into the typed data the
//! prover needs.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::curve::Curve;
use crate::field;

/// Section identifiers used by this crate's in-memory container. The wire
/// container format itself is out of scope; these ids are this crate's own
/// convention for addressing the payloads described in the data model.
pub mod section_id {
    /// Curve, domain, and circuit-size metadata.
    pub const HEADER: u32 = 1;
    /// Linear combinations folded into constant wire values at setup time.
    pub const ADDITIONS: u32 = 2;
    /// Per-gate index into the `a` wire.
    pub const A_MAP: u32 = 3;
    /// Per-gate index into the `b` wire.
    pub const B_MAP: u32 = 4;
    /// Per-gate odd-row correction factor.
    pub const K_CORRECTION: u32 = 5;
    /// `Q1` selector: coefficients then `4n` coset evaluations.
    pub const Q1: u32 = 6;
    /// `Q2` selector: coefficients then `4n` coset evaluations.
    pub const Q2: u32 = 7;
    /// `σ1‖σ2` permutation columns: coefficients then `4n` coset
    /// evaluations, for each half in turn.
    pub const SIGMA: u32 = 8;
    /// Per-public-input Lagrange basis polynomial: coefficients then `4n`
    /// coset evaluations, repeated once per public input.
    pub const LAGRANGE: u32 = 9;
    /// Powers-of-τ table in `G1`.
    pub const PTAU: u32 = 10;
}

/// The `protocol_id` this crate's zkey header must declare. There is no
/// external registry for Baby-Plonk to match, so this is this crate's own
/// convention, the same way `section_id` above defines its own section ids.
pub const BABY_PLONK_PROTOCOL_ID: u32 = 2;

/// A source of raw section bytes, addressed by id. The generic container
/// reader/writer behind this trait is out of scope for this crate; tests and
/// callers that already have a parsed container supply an implementation.
pub trait SectionSource {
    /// Returns the raw bytes of section `id`, if present.
    fn section(&self, id: u32) -> Option<&[u8]>;
}

/// The simplest possible [`SectionSource`]: sections held directly in
/// memory, keyed by id.
#[derive(Default, Clone)]
pub struct InMemorySections {
    sections: BTreeMap<u32, Vec<u8>>,
}

impl InMemorySections {
    /// An empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a section's bytes.
    pub fn insert(&mut self, id: u32, bytes: Vec<u8>) -> &mut Self {
        self.sections.insert(id, bytes);
        self
    }
}

impl SectionSource for InMemorySections {
    fn section(&self, id: u32) -> Option<&[u8]> {
        self.sections.get(&id).map(|v| v.as_slice())
    }
}

/// Errors decoding a proving key from its sections.
#[derive(Debug, Error)]
pub enum ZkeyError {
    /// A required section was absent.
    #[error("missing required section {0}")]
    MissingSection(u32),
    /// A section's byte length did not match the shape implied by the
    /// header.
    #[error("section {section} has length {actual}, expected {expected}")]
    BadSectionLen {
        /// Offending section id.
        section: u32,
        /// Bytes actually present.
        actual: usize,
        /// Bytes expected from the header-derived shape.
        expected: usize,
    },
    /// The header's scalar-field modulus does not match the curve this
    /// proving key was parsed as.
    #[error("zkey scalar field modulus does not match curve {0}")]
    CurveMismatch(&'static str),
    /// The header declared a domain size that is not a power of two.
    #[error("invalid domain size 2^{0}")]
    InvalidDomainSize(u32),
    /// The header's `protocol_id` does not match this crate's expected
    /// Baby-Plonk id.
    #[error("zkey protocol id {actual} does not match expected Baby-Plonk id {expected}")]
    ProtocolMismatch {
        /// The id found in the header.
        actual: u32,
        /// The id this crate expects.
        expected: u32,
    },
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32, ZkeyError> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or(ZkeyError::BadSectionLen { section: section_id::HEADER, actual: bytes.len(), expected: offset + 4 })?;
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

/// One `(id1, id2, factor1, factor2)` linear-combination entry: the setup
/// phase folds signal additions into a synthetic wire value
/// `factor1 * w[id1] + factor2 * w[id2]`.
#[derive(Clone, Debug)]
pub struct Addition<F> {
    /// First operand's witness index.
    pub id1: u32,
    /// Second operand's witness index.
    pub id2: u32,
    /// First operand's coefficient.
    pub factor1: F,
    /// Second operand's coefficient.
    pub factor2: F,
}

/// A selector or permutation column, stored both in coefficient form and as
/// `4n` coset evaluations (both are used: coefficients for commitment and
/// linearisation, evaluations for the quotient).
#[derive(Clone, Debug)]
pub struct ColumnPoly<F> {
    /// Coefficient-form representation, length `n`.
    pub coeffs: Vec<F>,
    /// Coset-evaluation representation, length `4n`.
    pub evals_4n: Vec<F>,
}

/// The decoded proving key.
pub struct ProvingKey<C: Curve> {
    /// `log2` of the circuit's row count.
    pub domain_k: u32,
    /// The PLONK `k1` coset-shift constant separating the `a`/`b` copy sets.
    pub k1: C::Fr,
    /// Number of witness entries (including the constant `1` at index 0).
    pub n_vars: u32,
    /// Number of public inputs.
    pub n_public: u32,
    /// Number of folded-in linear additions.
    pub n_additions: u32,
    /// Number of gate rows.
    pub n_constraints: u32,
    /// Protocol/circuit format identifier, carried through unopinionated.
    pub protocol_id: u32,
    /// Linear additions to fold into the witness before gate evaluation.
    pub additions: Vec<Addition<C::Fr>>,
    /// Per-gate index into the `a` wire.
    pub a_map: Vec<u32>,
    /// Per-gate index into the `b` wire.
    pub b_map: Vec<u32>,
    /// Per-gate odd-row correction factor.
    pub k_correction: Vec<C::Fr>,
    /// Left selector.
    pub q1: ColumnPoly<C::Fr>,
    /// Right selector.
    pub q2: ColumnPoly<C::Fr>,
    /// First half of the permutation.
    pub sigma1: ColumnPoly<C::Fr>,
    /// Second half of the permutation.
    pub sigma2: ColumnPoly<C::Fr>,
    /// One Lagrange basis polynomial per public input.
    pub lagrange: Vec<ColumnPoly<C::Fr>>,
    /// Powers-of-τ table in `G1`, `ptau[i]` = `[τ^i]G1`.
    pub ptau: Vec<C::G1Affine>,
}

impl<C: Curve> ProvingKey<C> {
    /// The circuit's row count, `2^domain_k`.
    pub fn n(&self) -> usize {
        1usize << self.domain_k
    }

    /// Decodes a proving key from a [`SectionSource`], validating the header
    /// against the curve `C` this key is being parsed as.
    pub fn from_sections<S: SectionSource>(source: &S) -> Result<Self, ZkeyError> {
        let header = source.section(section_id::HEADER).ok_or(ZkeyError::MissingSection(section_id::HEADER))?;

        let n8r = read_u32_le(header, 0)? as usize;
        let mut off = 4;
        let r = header
            .get(off..off + n8r)
            .ok_or(ZkeyError::BadSectionLen { section: section_id::HEADER, actual: header.len(), expected: off + n8r })?
            .to_vec();
        off += n8r;

        if r != C::fr_modulus_le_bytes() {
            return Err(ZkeyError::CurveMismatch(C::NAME));
        }

        let n8q = read_u32_le(header, off)? as usize;
        off += 4;
        off += n8q; // base-field modulus bytes, not needed beyond validation

        let domain_k = read_u32_le(header, off)?;
        off += 4;
        if domain_k == 0 || domain_k > 40 {
            return Err(ZkeyError::InvalidDomainSize(domain_k));
        }

        let k1_bytes = header
            .get(off..off + n8r)
            .ok_or(ZkeyError::BadSectionLen { section: section_id::HEADER, actual: header.len(), expected: off + n8r })?;
        let k1 = field::from_bytes_le::<C::Fr>(k1_bytes);
        off += n8r;

        let n_vars = read_u32_le(header, off)?;
        off += 4;
        let n_public = read_u32_le(header, off)?;
        off += 4;
        let n_additions = read_u32_le(header, off)?;
        off += 4;
        let n_constraints = read_u32_le(header, off)?;
        off += 4;
        let protocol_id = read_u32_le(header, off)?;
        if protocol_id != BABY_PLONK_PROTOCOL_ID {
            return Err(ZkeyError::ProtocolMismatch { actual: protocol_id, expected: BABY_PLONK_PROTOCOL_ID });
        }

        let n = 1usize << domain_k;

        let additions = parse_additions::<C>(source, n8r, n_additions as usize)?;
        let a_map = parse_u32_array(source, section_id::A_MAP, n_constraints as usize)?;
        let b_map = parse_u32_array(source, section_id::B_MAP, n_constraints as usize)?;
        let k_correction = parse_scalar_array::<C>(source, section_id::K_CORRECTION, n8r, n_constraints as usize)?;

        let q1 = parse_column::<C>(source, section_id::Q1, n8r, n)?;
        let q2 = parse_column::<C>(source, section_id::Q2, n8r, n)?;

        let sigma_bytes = source.section(section_id::SIGMA).ok_or(ZkeyError::MissingSection(section_id::SIGMA))?;
        let expected_sigma_len = 2 * (n + 4 * n) * n8r;
        if sigma_bytes.len() != expected_sigma_len {
            return Err(ZkeyError::BadSectionLen { section: section_id::SIGMA, actual: sigma_bytes.len(), expected: expected_sigma_len });
        }
        let (sigma1, rest) = split_column::<C>(sigma_bytes, n8r, n);
        let (sigma2, _) = split_column::<C>(rest, n8r, n);

        let lagrange_bytes = source.section(section_id::LAGRANGE).ok_or(ZkeyError::MissingSection(section_id::LAGRANGE))?;
        let per_input = (n + 4 * n) * n8r;
        let expected_lagrange_len = per_input * n_public as usize;
        if lagrange_bytes.len() != expected_lagrange_len {
            return Err(ZkeyError::BadSectionLen { section: section_id::LAGRANGE, actual: lagrange_bytes.len(), expected: expected_lagrange_len });
        }
        let mut lagrange = Vec::with_capacity(n_public as usize);
        let mut remaining = lagrange_bytes;
        for _ in 0..n_public {
            let (col, rest) = split_column::<C>(remaining, n8r, n);
            lagrange.push(col);
            remaining = rest;
        }

        let ptau_bytes = source.section(section_id::PTAU).ok_or(ZkeyError::MissingSection(section_id::PTAU))?;
        let n8q_point = n8q;
        let point_len = 2 * n8q_point;
        if point_len == 0 || ptau_bytes.len() % point_len != 0 {
            return Err(ZkeyError::BadSectionLen { section: section_id::PTAU, actual: ptau_bytes.len(), expected: point_len });
        }
        let mut ptau = Vec::with_capacity(ptau_bytes.len() / point_len);
        for chunk in ptau_bytes.chunks_exact(point_len) {
            let x = field::from_bytes_le::<C::Fq>(&chunk[..n8q_point]);
            let y = field::from_bytes_le::<C::Fq>(&chunk[n8q_point..]);
            ptau.push(C::g1_from_xy(x, y));
        }

        Ok(Self {
            domain_k,
            k1,
            n_vars,
            n_public,
            n_additions,
            n_constraints,
            protocol_id,
            additions,
            a_map,
            b_map,
            k_correction,
            q1,
            q2,
            sigma1,
            sigma2,
            lagrange,
            ptau,
        })
    }
}

fn parse_u32_array<S: SectionSource>(source: &S, id: u32, count: usize) -> Result<Vec<u32>, ZkeyError> {
    let bytes = source.section(id).ok_or(ZkeyError::MissingSection(id))?;
    let expected = count * 4;
    if bytes.len() != expected {
        return Err(ZkeyError::BadSectionLen { section: id, actual: bytes.len(), expected });
    }
    Ok(bytes.chunks_exact(4).map(|c| u32::from_le_bytes(c.try_into().unwrap())).collect())
}

fn parse_scalar_array<C: Curve>(source: &dyn SectionSource, id: u32, n8r: usize, count: usize) -> Result<Vec<C::Fr>, ZkeyError> {
    let bytes = source.section(id).ok_or(ZkeyError::MissingSection(id))?;
    let expected = count * n8r;
    if bytes.len() != expected {
        return Err(ZkeyError::BadSectionLen { section: id, actual: bytes.len(), expected });
    }
    Ok(bytes.chunks_exact(n8r).map(field::from_bytes_le::<C::Fr>).collect())
}

fn parse_additions<C: Curve>(source: &dyn SectionSource, n8r: usize, count: usize) -> Result<Vec<Addition<C::Fr>>, ZkeyError> {
    let bytes = source.section(section_id::ADDITIONS).ok_or(ZkeyError::MissingSection(section_id::ADDITIONS))?;
    let record_len = 8 + 2 * n8r;
    let expected = count * record_len;
    if bytes.len() != expected {
        return Err(ZkeyError::BadSectionLen { section: section_id::ADDITIONS, actual: bytes.len(), expected });
    }
    let mut out = Vec::with_capacity(count);
    for record in bytes.chunks_exact(record_len) {
        let id1 = u32::from_le_bytes(record[0..4].try_into().unwrap());
        let id2 = u32::from_le_bytes(record[4..8].try_into().unwrap());
        let factor1 = field::from_bytes_le::<C::Fr>(&record[8..8 + n8r]);
        let factor2 = field::from_bytes_le::<C::Fr>(&record[8 + n8r..8 + 2 * n8r]);
        out.push(Addition { id1, id2, factor1, factor2 });
    }
    Ok(out)
}

fn parse_column<C: Curve>(source: &dyn SectionSource, id: u32, n8r: usize, n: usize) -> Result<ColumnPoly<C::Fr>, ZkeyError> {
    let bytes = source.section(id).ok_or(ZkeyError::MissingSection(id))?;
    let expected = (n + 4 * n) * n8r;
    if bytes.len() != expected {
        return Err(ZkeyError::BadSectionLen { section: id, actual: bytes.len(), expected });
    }
    let (col, _) = split_column::<C>(bytes, n8r, n);
    Ok(col)
}

fn split_column<C: Curve>(bytes: &[u8], n8r: usize, n: usize) -> (ColumnPoly<C::Fr>, &[u8]) {
    let coeffs_len = n * n8r;
    let evals_len = 4 * n * n8r;
    let coeffs = bytes[..coeffs_len].chunks_exact(n8r).map(field::from_bytes_le::<C::Fr>).collect();
    let evals_4n = bytes[coeffs_len..coeffs_len + evals_len].chunks_exact(n8r).map(field::from_bytes_le::<C::Fr>).collect();
    (ColumnPoly { coeffs, evals_4n }, &bytes[coeffs_len + evals_len..])
}

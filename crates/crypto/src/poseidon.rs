// Path: crates/crypto/src/poseidon.rs
//! The Kimchi-shaped Poseidon sponge over `Fp`.
//!
//! Width 3, rate 2, 55 full rounds with an `x^7` S-box. Each round applies
//! the S-box, then the MDS matrix, then adds the round constants. There is no
//! initial round-constant addition.
//!
//! The attested chain's round constants and MDS matrix are loaded from a
//! pinned table file ([`PoseidonParams::load`]) and installed once per process
//! with [`PoseidonParams::install`]. Until then [`Poseidon::kimchi`] runs over
//! a Blake2s-derived development set, which is only useful for local testing:
//! nothing it hashes can be reproduced by the attested chain.

use crate::error::CryptoError;
use crate::field::Fp;
use blake2::{Blake2s256, Digest};
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use std::path::Path;

/// Sponge state width.
pub const WIDTH: usize = 3;
/// Elements absorbed per permutation.
pub const RATE: usize = 2;
/// Number of (full) rounds.
pub const ROUNDS: usize = 55;
/// The S-box exponent.
pub const SBOX_ALPHA: u64 = 7;
/// Longest domain prefix that packs into one field element.
pub const MAX_PREFIX_LEN: usize = 31;

const DEV_RC_DOMAIN: &[u8] = b"PULSAR_DEV_POSEIDON_RC";
const DEV_MDS_DOMAIN: &[u8] = b"PULSAR_DEV_POSEIDON_MDS";

/// A sponge state.
pub type State = [Fp; WIDTH];

/// Round constants and MDS matrix of a Poseidon instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoseidonParams {
    round_constants: Vec<State>,
    mds: [State; WIDTH],
}

static DEVELOPMENT: Lazy<PoseidonParams> = Lazy::new(PoseidonParams::derive_development);
static INSTALLED: OnceCell<PoseidonParams> = OnceCell::new();

/// The on-disk table layout: decimal strings, one row of round constants per
/// round. `roundConstants` is accepted as an alias.
#[derive(Deserialize)]
struct ParamsFile {
    mds: Vec<Vec<String>>,
    #[serde(alias = "roundConstants")]
    round_constants: Vec<Vec<String>>,
}

impl PoseidonParams {
    /// Builds parameters from pinned tables: `ROUNDS` rows of `WIDTH` round
    /// constants and a `WIDTH x WIDTH` MDS matrix.
    pub fn from_tables(
        round_constants: Vec<Vec<Fp>>,
        mds: Vec<Vec<Fp>>,
    ) -> Result<Self, CryptoError> {
        if round_constants.len() != ROUNDS {
            return Err(CryptoError::InvalidParams(format!(
                "expected {} rounds of constants, got {}",
                ROUNDS,
                round_constants.len()
            )));
        }
        let round_constants = round_constants
            .into_iter()
            .map(to_state)
            .collect::<Result<Vec<_>, _>>()?;
        if mds.len() != WIDTH {
            return Err(CryptoError::InvalidParams(format!(
                "expected {} MDS rows, got {}",
                WIDTH,
                mds.len()
            )));
        }
        let mut rows = mds.into_iter().map(to_state);
        let mds = [next_row(&mut rows)?, next_row(&mut rows)?, next_row(&mut rows)?];
        if determinant(&mds).is_zero() {
            return Err(CryptoError::InvalidParams("MDS matrix is singular".into()));
        }
        Ok(Self {
            round_constants,
            mds,
        })
    }

    /// Parses a JSON table of decimal field elements.
    pub fn from_json_str(raw: &str) -> Result<Self, CryptoError> {
        let file: ParamsFile = serde_json::from_str(raw)
            .map_err(|e| CryptoError::InvalidParams(format!("poseidon table: {}", e)))?;
        Self::from_tables(decode_rows(&file.round_constants)?, decode_rows(&file.mds)?)
    }

    /// Reads a JSON table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CryptoError::InvalidParams(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Makes `params` the process-wide set behind [`Poseidon::kimchi`].
    ///
    /// Instances created earlier keep the set they were bound to. Installing
    /// the same set twice is a no-op; installing a different one fails.
    pub fn install(params: PoseidonParams) -> Result<(), CryptoError> {
        match INSTALLED.set(params) {
            Ok(()) => Ok(()),
            Err(params) if INSTALLED.get() == Some(&params) => Ok(()),
            Err(_) => Err(CryptoError::InvalidParams(
                "a different Poseidon parameter set is already installed".into(),
            )),
        }
    }

    /// Whether a pinned set has been installed.
    pub fn is_installed() -> bool {
        INSTALLED.get().is_some()
    }

    /// The installed set, or the development set if none was installed.
    pub fn active() -> &'static PoseidonParams {
        INSTALLED.get().unwrap_or_else(Self::development)
    }

    /// The Blake2s-derived development set.
    pub fn development() -> &'static PoseidonParams {
        &DEVELOPMENT
    }

    fn derive_development() -> Self {
        let round_constants = (0..ROUNDS)
            .map(|round| {
                [
                    derive_element(DEV_RC_DOMAIN, &[round as u64, 0]),
                    derive_element(DEV_RC_DOMAIN, &[round as u64, 1]),
                    derive_element(DEV_RC_DOMAIN, &[round as u64, 2]),
                ]
            })
            .collect();

        let mut attempt: u64 = 0;
        let mds = loop {
            let row = |r: u64| {
                [
                    derive_element(DEV_MDS_DOMAIN, &[attempt, r, 0]),
                    derive_element(DEV_MDS_DOMAIN, &[attempt, r, 1]),
                    derive_element(DEV_MDS_DOMAIN, &[attempt, r, 2]),
                ]
            };
            let candidate = [row(0), row(1), row(2)];
            if !determinant(&candidate).is_zero() {
                break candidate;
            }
            attempt = attempt.wrapping_add(1);
        };

        Self {
            round_constants,
            mds,
        }
    }

    /// Renders the set in the layout [`PoseidonParams::from_json_str`] reads.
    pub fn to_json_string(&self) -> String {
        let rows = |rows: &[State]| {
            rows.iter()
                .map(|row| row.iter().map(|e| e.to_string()).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        serde_json::json!({
            "mds": rows(self.mds.as_slice()),
            "round_constants": rows(&self.round_constants),
        })
        .to_string()
    }

    /// The round constants, one row per round.
    pub fn round_constants(&self) -> &[State] {
        &self.round_constants
    }

    /// The MDS matrix.
    pub fn mds(&self) -> &[State; WIDTH] {
        &self.mds
    }
}

fn to_state(row: Vec<Fp>) -> Result<State, CryptoError> {
    <[Fp; WIDTH]>::try_from(row).map_err(|row| {
        CryptoError::InvalidParams(format!("expected rows of {} elements, got {}", WIDTH, row.len()))
    })
}

fn next_row(
    rows: &mut impl Iterator<Item = Result<State, CryptoError>>,
) -> Result<State, CryptoError> {
    rows.next()
        .unwrap_or_else(|| Err(CryptoError::InvalidParams("missing MDS row".into())))
}

fn decode_rows(rows: &[Vec<String>]) -> Result<Vec<Vec<Fp>>, CryptoError> {
    rows.iter()
        .map(|row| row.iter().map(|e| Fp::from_decimal(e.trim())).collect())
        .collect()
}

fn derive_element(domain: &[u8], indices: &[u64]) -> Fp {
    let mut hasher = Blake2s256::new();
    hasher.update(domain);
    for index in indices {
        hasher.update(index.to_be_bytes());
    }
    Fp::from_bytes_be_reduce(&hasher.finalize())
}

fn determinant(m: &[State; WIDTH]) -> Fp {
    let [[a, b, c], [d, e, f], [g, h, i]] = m;
    let t1 = a * &(&(e * i) - &(f * h));
    let t2 = b * &(&(d * i) - &(f * g));
    let t3 = c * &(&(d * h) - &(e * g));
    &(&t1 - &t2) + &t3
}

/// Packs an ASCII domain prefix into one field element: the bytes, zero-padded
/// to 32, read little-endian. Prefixes longer than [`MAX_PREFIX_LEN`] bytes do
/// not fit below the modulus and are rejected.
pub fn prefix_to_field(prefix: &str) -> Result<Fp, CryptoError> {
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(CryptoError::InvalidParams(format!(
            "prefix '{}' is longer than {} bytes",
            prefix, MAX_PREFIX_LEN
        )));
    }
    let mut bytes = [0u8; 32];
    for (slot, byte) in bytes.iter_mut().zip(prefix.as_bytes()) {
        *slot = *byte;
    }
    Ok(Fp::from_bytes_le_reduce(&bytes))
}

/// A Poseidon instance bound to a parameter set.
#[derive(Clone, Copy, Debug)]
pub struct Poseidon<'p> {
    params: &'p PoseidonParams,
}

impl Poseidon<'static> {
    /// The instance over the active parameters; see [`PoseidonParams::active`].
    pub fn kimchi() -> Self {
        Self::new(PoseidonParams::active())
    }
}

impl Default for Poseidon<'static> {
    fn default() -> Self {
        Self::kimchi()
    }
}

impl<'p> Poseidon<'p> {
    /// Binds an instance to `params`.
    pub fn new(params: &'p PoseidonParams) -> Self {
        Self { params }
    }

    /// The all-zero initial state.
    pub fn initial_state() -> State {
        [Fp::zero(), Fp::zero(), Fp::zero()]
    }

    /// Applies the full permutation in place.
    pub fn permute(&self, state: &mut State) {
        let alpha = num_bigint::BigUint::from(SBOX_ALPHA);
        for rc in &self.params.round_constants {
            for slot in state.iter_mut() {
                *slot = slot.pow(&alpha);
            }
            let [m0, m1, m2] = &self.params.mds;
            let mixed = [dot(m0, state), dot(m1, state), dot(m2, state)];
            *state = [&mixed[0] + &rc[0], &mixed[1] + &rc[1], &mixed[2] + &rc[2]];
        }
    }

    /// Absorbs `input` in zero-padded blocks of `RATE`, permuting after each
    /// block. An empty input permutes once.
    pub fn update(&self, mut state: State, input: &[Fp]) -> State {
        if input.is_empty() {
            self.permute(&mut state);
            return state;
        }
        for block in input.chunks(RATE) {
            for (slot, value) in state.iter_mut().zip(block) {
                *slot = &*slot + value;
            }
            self.permute(&mut state);
        }
        state
    }

    /// `update([0; 3], input)[0]`.
    pub fn hash(&self, input: &[Fp]) -> Fp {
        let [out, _, _] = self.update(Self::initial_state(), input);
        out
    }

    /// The sponge state after absorbing the prefix as a single element.
    pub fn salt(&self, prefix: &str) -> Result<State, CryptoError> {
        Ok(self.update(Self::initial_state(), &[prefix_to_field(prefix)?]))
    }

    /// Hashes `input` starting from the prefix's salted state.
    pub fn hash_with_prefix(&self, prefix: &str, input: &[Fp]) -> Result<Fp, CryptoError> {
        let [out, _, _] = self.update(self.salt(prefix)?, input);
        Ok(out)
    }
}

fn dot(row: &State, state: &State) -> Fp {
    let [a, b, c] = row;
    let [x, y, z] = state;
    &(&(a * x) + &(b * y)) + &(c * z)
}

/// Hashes with the active parameters.
pub fn hash(input: &[Fp]) -> Fp {
    Poseidon::kimchi().hash(input)
}

/// Prefix-hashes with the active parameters.
pub fn hash_with_prefix(prefix: &str, input: &[Fp]) -> Result<Fp, CryptoError> {
    Poseidon::kimchi().hash_with_prefix(prefix, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_params_have_expected_shape() {
        let params = PoseidonParams::development();
        assert_eq!(params.round_constants().len(), ROUNDS);
        assert!(!determinant(params.mds()).is_zero());
        assert_eq!(*params, PoseidonParams::derive_development());
        // Unit tests never install a pinned set.
        assert_eq!(PoseidonParams::active(), params);
    }

    #[test]
    fn hash_is_deterministic_and_input_sensitive() {
        let a = hash(&[Fp::from_u64(1), Fp::from_u64(2), Fp::from_u64(3)]);
        let b = hash(&[Fp::from_u64(1), Fp::from_u64(2), Fp::from_u64(3)]);
        let c = hash(&[Fp::from_u64(1), Fp::from_u64(5), Fp::from_u64(3)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_input_still_permutes() {
        let empty = hash(&[]);
        assert_ne!(empty, Fp::zero());
        // A trailing zero pads into the same block as no element at all only
        // when the block is otherwise non-empty.
        assert_eq!(hash(&[Fp::from_u64(9)]), hash(&[Fp::from_u64(9), Fp::zero()]));
        assert_ne!(hash(&[Fp::zero()]), empty);
    }

    #[test]
    fn prefix_separates_domains() {
        let input = [Fp::from_u64(7)];
        let x = hash_with_prefix("MinaZkappEvent******", &input).unwrap();
        let y = hash_with_prefix("MinaZkappSeqEvents**", &input).unwrap();
        assert_ne!(x, y);
        assert_ne!(x, hash(&input));
        assert_eq!(prefix_to_field("A").unwrap(), Fp::from_u64(0x41));
        assert_eq!(prefix_to_field("AB").unwrap(), Fp::from_u64(0x4241));
    }

    #[test]
    fn overlong_prefixes_are_rejected() {
        let longest = "p".repeat(MAX_PREFIX_LEN);
        assert!(prefix_to_field(&longest).is_ok());
        assert!(prefix_to_field("MinaZkappActionStateEmptyElt").is_ok());

        let too_long = "p".repeat(MAX_PREFIX_LEN + 1);
        assert!(matches!(
            prefix_to_field(&too_long),
            Err(CryptoError::InvalidParams(_))
        ));
        // A prefix that only differs past the cut must not alias a shorter one.
        assert!(Poseidon::kimchi().salt(&format!("{}x", longest)).is_err());
        assert!(hash_with_prefix(&too_long, &[Fp::one()]).is_err());
    }

    #[test]
    fn tables_round_trip_through_json() {
        let params = PoseidonParams::development();
        let rebuilt = PoseidonParams::from_json_str(&params.to_json_string()).unwrap();
        assert_eq!(&rebuilt, params);

        // The camelCase layout of published tables parses too.
        let mut doc: serde_json::Value = serde_json::from_str(&params.to_json_string()).unwrap();
        let rc = doc["round_constants"].take();
        let camel = serde_json::json!({ "mds": doc["mds"], "roundConstants": rc });
        assert_eq!(&PoseidonParams::from_json_str(&camel.to_string()).unwrap(), params);

        assert!(PoseidonParams::from_json_str(r#"{"mds": [], "round_constants": []}"#).is_err());
        let bad = serde_json::json!({ "mds": [["x", "1", "2"]], "roundConstants": [] });
        assert!(PoseidonParams::from_json_str(&bad.to_string()).is_err());
    }

    #[test]
    fn pinned_tables_round_trip_through_from_tables() {
        let params = PoseidonParams::development();
        let rc: Vec<Vec<Fp>> = params.round_constants().iter().map(|r| r.to_vec()).collect();
        let mds: Vec<Vec<Fp>> = params.mds().iter().map(|r| r.to_vec()).collect();
        let rebuilt = PoseidonParams::from_tables(rc.clone(), mds.clone()).unwrap();
        assert_eq!(&rebuilt, params);

        assert!(PoseidonParams::from_tables(rc[..3].to_vec(), mds.clone()).is_err());
        let singular = vec![vec![Fp::one(); 3]; 3];
        assert!(PoseidonParams::from_tables(rc, singular).is_err());
    }
}

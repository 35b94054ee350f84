//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Every random decision of a run flows through one [`RngProvider`], so a
//! fixed seed reproduces the run exactly. Seeds are arbitrary-precision
//! decimal integers; they are folded into the 64-bit PCG state with BLAKE3
//! so that seeds far beyond `u64::MAX` still map to distinct streams.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::entropy::EntropySource;
use crate::error::{SynthError, SynthResult};
use crate::table::WeightedTable;

/// Domain separation prefix for seed derivation.
const SEED_DOMAIN: &[u8] = b"chipsynth/seed/v1:";

/// A non-negative integer seed of any size, stored as canonical decimal
/// digits (no sign, no leading zeros).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SeedInput", into = "String")]
pub struct Seed {
    digits: String,
}

/// Accepted serialized forms of a seed: a number, or a digit string for
/// values that do not fit in 64 bits.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedInput {
    /// Plain integer.
    Number(u64),
    /// Decimal digits of any length.
    Text(String),
}

impl Seed {
    /// Parses decimal digits. Surrounding whitespace and `_` separators are
    /// ignored; leading zeros are dropped.
    pub fn parse(text: &str) -> SynthResult<Self> {
        let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
        if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SynthError::InvalidSeed {
                text: text.to_string(),
            });
        }

        let trimmed = cleaned.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self {
            digits: digits.to_string(),
        })
    }

    /// Seed derived from the wall clock, in milliseconds since the Unix epoch.
    pub fn from_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            digits: millis.to_string(),
        }
    }

    /// Canonical decimal digits.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Returns the seed as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.digits.parse().ok()
    }

    /// 64-bit PCG seed for this value.
    pub fn stream_key(&self) -> u64 {
        derive_stream_seed(self)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self {
            digits: value.to_string(),
        }
    }
}

impl FromStr for Seed {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Seed::parse(s)
    }
}

impl TryFrom<SeedInput> for Seed {
    type Error = SynthError;

    fn try_from(input: SeedInput) -> Result<Self, Self::Error> {
        match input {
            SeedInput::Number(n) => Ok(Seed::from(n)),
            SeedInput::Text(s) => Seed::parse(&s),
        }
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.digits
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// Where the seed of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedProvenance {
    /// Supplied by the caller.
    Explicit,
    /// Taken from the wall clock because none was supplied.
    Clock,
}

impl SeedProvenance {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            SeedProvenance::Explicit => "explicit",
            SeedProvenance::Clock => "clock",
        }
    }
}

/// Derives the 64-bit PCG seed from an arbitrary-precision seed.
///
/// ```text
/// stream_seed = truncate_u64(BLAKE3(SEED_DOMAIN || decimal_digits))
/// ```
pub fn derive_stream_seed(seed: &Seed) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(seed.as_str().as_bytes());
    let hash = hasher.finalize();

    // Truncate to u64 (first 8 bytes, little-endian)
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Creates a PCG32 RNG from a seed.
pub fn create_rng(seed: &Seed) -> Pcg32 {
    Pcg32::seed_from_u64(derive_stream_seed(seed))
}

/// A point where the stream was replaced by external entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reseed {
    /// Index of the note drawn right after the reseed.
    pub note_index: usize,
    /// The 64-bit value the stream was reseeded with.
    pub stream_key: u64,
}

/// The single pseudorandom stream of a run.
///
/// All three drawing operations consume the same stream in call order, so
/// the sequence of decisions is fixed by the seed until the first reseed.
#[derive(Debug, Clone)]
pub struct RngProvider {
    seed: Seed,
    provenance: SeedProvenance,
    rng: Pcg32,
    reseeds: Vec<Reseed>,
}

impl RngProvider {
    /// Creates a provider from an explicit seed.
    pub fn new(seed: Seed) -> Self {
        Self::with_provenance(seed, SeedProvenance::Explicit)
    }

    /// Creates a provider seeded from the wall clock.
    pub fn from_clock() -> Self {
        Self::with_provenance(Seed::from_clock(), SeedProvenance::Clock)
    }

    /// Uses `seed` when given, the wall clock otherwise.
    pub fn from_optional(seed: Option<Seed>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_clock(),
        }
    }

    fn with_provenance(seed: Seed, provenance: SeedProvenance) -> Self {
        let rng = create_rng(&seed);
        Self {
            seed,
            provenance,
            rng,
            reseeds: Vec::new(),
        }
    }

    /// The seed the stream started from.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Where the seed came from.
    pub fn provenance(&self) -> SeedProvenance {
        self.provenance
    }

    /// Every reseed so far, in order.
    pub fn reseeds(&self) -> &[Reseed] {
        &self.reseeds
    }

    /// True while the stream is still fully determined by the seed.
    pub fn is_reproducible(&self) -> bool {
        self.reseeds.is_empty()
    }

    /// Index of a weighted pick from `table`.
    pub fn weighted_index<T>(&mut self, table: &WeightedTable<T>) -> usize {
        table.distribution().sample(&mut self.rng)
    }

    /// Weighted pick from `table`.
    pub fn weighted_choice<'a, T>(&mut self, table: &'a WeightedTable<T>) -> &'a T {
        let index = self.weighted_index(table);
        &table.values()[index]
    }

    /// Uniform real in `[low, high]`. Returns `low` without drawing when
    /// the range is empty or degenerate.
    pub fn uniform_range(&mut self, low: f64, high: f64) -> f64 {
        if low >= high || low.is_nan() || high.is_nan() {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Uniform pick from a discrete set; `None` when the set is empty.
    pub fn uniform_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Uniform integer step in `[-max_step, max_step]`.
    pub fn uniform_step(&mut self, max_step: usize) -> isize {
        let max = max_step as isize;
        self.rng.gen_range(-max..=max)
    }

    /// Fair coin: `-1` or `1`.
    pub fn direction(&mut self) -> isize {
        if self.rng.gen::<bool>() {
            1
        } else {
            -1
        }
    }

    /// Replaces the stream with one seeded from `bytes` and records it.
    pub fn reseed(&mut self, bytes: [u8; 8], note_index: usize) -> Reseed {
        let stream_key = u64::from_le_bytes(bytes);
        self.rng = Pcg32::seed_from_u64(stream_key);
        let reseed = Reseed {
            note_index,
            stream_key,
        };
        self.reseeds.push(reseed);
        reseed
    }

    /// Reseeds from `source` if it has bytes to give. An exhausted or
    /// failing source leaves the stream untouched.
    pub fn try_reseed<E: EntropySource + ?Sized>(
        &mut self,
        source: &mut E,
        note_index: usize,
    ) -> Option<Reseed> {
        source
            .next_entropy_bytes()
            .map(|bytes| self.reseed(bytes, note_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(&Seed::from(42));
        let mut rng2 = create_rng(&Seed::from(42));

        let values1: Vec<f32> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f32> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(&Seed::from(42));
        let mut rng2 = create_rng(&Seed::from(43));

        let values1: Vec<f32> = (0..10).map(|_| rng1.gen()).collect();
        let values2: Vec<f32> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }

    #[test]
    fn test_seed_parse_canonicalizes() {
        assert_eq!(Seed::parse("0042").unwrap().as_str(), "42");
        assert_eq!(Seed::parse("000").unwrap().as_str(), "0");
        assert_eq!(Seed::parse(" 1_000 ").unwrap().as_str(), "1000");
        assert_eq!(Seed::parse("42").unwrap(), Seed::from(42));
    }

    #[test]
    fn test_seed_parse_rejects_garbage() {
        for bad in ["", "-1", "12a", "4.2", "   "] {
            assert!(Seed::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_huge_seeds_are_distinct() {
        let a = Seed::parse("340282366920938463463374607431768211457").unwrap();
        let b = Seed::parse("340282366920938463463374607431768211458").unwrap();
        assert_eq!(a.to_u64(), None);
        assert_ne!(a.stream_key(), b.stream_key());
        assert_eq!(a.stream_key(), derive_stream_seed(&a));
    }

    #[test]
    fn test_leading_zeros_map_to_same_stream() {
        let a = Seed::parse("007").unwrap();
        let b = Seed::from(7);
        assert_eq!(a.stream_key(), b.stream_key());
    }

    #[test]
    fn test_seed_serde_accepts_number_and_string() {
        let from_number: Seed = serde_json::from_str("42").unwrap();
        let from_text: Seed = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<Seed>("\"forty-two\"").is_err());
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"42\"");
    }

    #[test]
    fn test_provider_draw_sequence_is_reproducible() {
        let table = WeightedTable::new("t", vec![(1, 1.0), (2, 2.0), (3, 3.0)]).unwrap();
        let set = [0.1, 0.2, 0.3];

        let draw = |provider: &mut RngProvider| {
            let mut out = Vec::new();
            for _ in 0..50 {
                out.push(*provider.weighted_choice(&table) as f64);
                out.push(provider.uniform_range(0.4, 0.7));
                out.push(*provider.uniform_choice(&set).unwrap());
            }
            out
        };

        let mut a = RngProvider::new(Seed::from(9));
        let mut b = RngProvider::new(Seed::from(9));
        assert_eq!(draw(&mut a), draw(&mut b));
    }

    #[test]
    fn test_weighted_choice_frequencies() {
        let table = WeightedTable::new("t", vec![("A", 9.0), ("B", 1.0)]).unwrap();
        let mut provider = RngProvider::new(Seed::from(42));

        let draws = 100_000;
        let a_count = (0..draws)
            .filter(|_| *provider.weighted_choice(&table) == "A")
            .count();
        let ratio = a_count as f64 / draws as f64;
        assert!((ratio - 0.9).abs() < 0.02, "observed {ratio}");
    }

    #[test]
    fn test_single_entry_table_is_deterministic() {
        let table = WeightedTable::new("t", vec![(440.0, 5.0)]).unwrap();
        let mut provider = RngProvider::new(Seed::from(1));
        for _ in 0..100 {
            assert_eq!(*provider.weighted_choice(&table), 440.0);
        }
    }

    #[test]
    fn test_uniform_range_bounds() {
        let mut provider = RngProvider::new(Seed::from(3));
        for _ in 0..1000 {
            let v = provider.uniform_range(0.4, 0.7);
            assert!((0.4..=0.7).contains(&v));
        }
        assert_eq!(provider.uniform_range(0.5, 0.5), 0.5);
    }

    #[test]
    fn test_uniform_choice_empty_set() {
        let mut provider = RngProvider::new(Seed::from(3));
        let empty: [f64; 0] = [];
        assert_eq!(provider.uniform_choice(&empty), None);
    }

    #[test]
    fn test_uniform_step_bounds() {
        let mut provider = RngProvider::new(Seed::from(5));
        let steps: Vec<isize> = (0..500).map(|_| provider.uniform_step(2)).collect();
        assert!(steps.iter().all(|s| (-2..=2).contains(s)));
        assert!(steps.contains(&-2) && steps.contains(&2));
        assert_eq!(provider.uniform_step(0), 0);
    }

    #[test]
    fn test_reseed_is_recorded_and_changes_stream() {
        let mut plain = RngProvider::new(Seed::from(11));
        let mut reseeded = RngProvider::new(Seed::from(11));
        assert!(reseeded.is_reproducible());

        let reseed = reseeded.reseed(*b"entropy!", 4);
        assert_eq!(reseed.note_index, 4);
        assert_eq!(reseeded.reseeds(), &[reseed]);
        assert!(!reseeded.is_reproducible());

        let a: Vec<f64> = (0..8).map(|_| plain.uniform_range(0.0, 1.0)).collect();
        let b: Vec<f64> = (0..8).map(|_| reseeded.uniform_range(0.0, 1.0)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_try_reseed_without_bytes_is_a_no_op() {
        let mut provider = RngProvider::new(Seed::from(11));
        let mut source = crate::entropy::NoEntropy;
        assert_eq!(provider.try_reseed(&mut source, 0), None);
        assert!(provider.is_reproducible());
    }

    #[test]
    fn test_clock_provenance() {
        let provider = RngProvider::from_optional(None);
        assert_eq!(provider.provenance(), SeedProvenance::Clock);
        assert!(provider.seed().to_u64().is_some());

        let provider = RngProvider::from_optional(Some(Seed::from(5)));
        assert_eq!(provider.provenance(), SeedProvenance::Explicit);
    }
}

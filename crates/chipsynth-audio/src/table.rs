//! Weighted choice tables.

use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// One candidate and its relative weight, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedEntry<T> {
    /// Candidate value.
    pub value: T,
    /// Relative likelihood. Must be positive.
    pub weight: f64,
}

impl<T> WeightedEntry<T> {
    /// Creates an entry.
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// A non-empty set of candidates, each picked with probability
/// `weight / sum(weights)`.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    values: Vec<T>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedTable<T> {
    /// Builds a table from `(value, weight)` pairs.
    ///
    /// `name` is only used in error messages.
    pub fn new(name: &str, entries: Vec<(T, f64)>) -> SynthResult<Self> {
        if entries.is_empty() {
            return Err(SynthError::EmptyTable {
                name: name.to_string(),
            });
        }
        if let Some(&(_, weight)) = entries
            .iter()
            .find(|(_, w)| !(w.is_finite() && *w > 0.0))
        {
            return Err(SynthError::InvalidWeight {
                name: name.to_string(),
                weight,
            });
        }

        let (values, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(&weights)
            .map_err(|e| SynthError::invalid_param(name, e.to_string()))?;

        Ok(Self {
            values,
            weights,
            index,
        })
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; tables are never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Candidate at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// All candidates in table order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Weight of the candidate at `index`.
    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Probability of picking the candidate at `index`.
    pub fn probability(&self, index: usize) -> Option<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weight(index).map(|w| w / total)
    }

    pub(crate) fn distribution(&self) -> &WeightedIndex<f64> {
        &self.index
    }
}

impl<T: Clone> WeightedTable<T> {
    /// Builds a table from configuration entries.
    pub fn from_entries(name: &str, entries: &[WeightedEntry<T>]) -> SynthResult<Self> {
        Self::new(
            name,
            entries
                .iter()
                .map(|e| (e.value.clone(), e.weight))
                .collect(),
        )
    }
}

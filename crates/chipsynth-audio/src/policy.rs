//! Pitch selection policies.
//!
//! A policy picks an index into a weighted table given the recent
//! selection history. Plain weighted sampling ignores the history; repeat
//! avoidance walks the table and refuses to land on either of the last two
//! picks when a neighbouring index is available.

use serde::{Deserialize, Serialize};

use crate::rng::RngProvider;
use crate::table::WeightedTable;

/// Default largest step for the repeat-avoiding random walk.
pub const DEFAULT_MAX_STEP: usize = 2;

/// The last two selected indices, most recent last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionHistory {
    recent: [Option<usize>; 2],
}

impl SelectionHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection.
    pub fn push(&mut self, index: usize) {
        self.recent = [self.recent[1], Some(index)];
    }

    /// Most recent selection.
    pub fn current(&self) -> Option<usize> {
        self.recent[1]
    }

    /// Whether `index` is one of the last two selections.
    pub fn contains(&self, index: usize) -> bool {
        self.recent.contains(&Some(index))
    }
}

/// Chooses an index into a weighted table.
pub trait SelectionPolicy {
    /// Returns an index in `0..table.len()`.
    fn select<T>(
        &self,
        table: &WeightedTable<T>,
        history: &SelectionHistory,
        rng: &mut RngProvider,
    ) -> usize;
}

/// Independent weighted draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSampling;

impl SelectionPolicy for WeightedSampling {
    fn select<T>(
        &self,
        table: &WeightedTable<T>,
        _history: &SelectionHistory,
        rng: &mut RngProvider,
    ) -> usize {
        rng.weighted_index(table)
    }
}

/// Bounded random walk that avoids the last two picks.
///
/// The first pick of a run is a weighted draw. Afterwards the candidate is
/// `current + step` with `step` uniform in `[-max_step, max_step]`, clamped
/// to the table. While the candidate is one of the last two picks it is
/// replaced by `current ± 1` (clamped). When both neighbours are themselves
/// recent picks (the walk is pinned against an edge) the closest index that
/// is not a recent pick is taken instead; tables with fewer than three
/// entries cannot avoid repeats and keep the candidate.
#[derive(Debug, Clone, Copy)]
pub struct RepeatAvoidance {
    /// Largest distance of the initial step.
    pub max_step: usize,
}

impl Default for RepeatAvoidance {
    fn default() -> Self {
        Self {
            max_step: DEFAULT_MAX_STEP,
        }
    }
}

impl RepeatAvoidance {
    fn clamp(index: isize, len: usize) -> usize {
        index.clamp(0, len as isize - 1) as usize
    }

    fn nearest_fresh(current: isize, len: usize, history: &SelectionHistory) -> Option<usize> {
        (1..len as isize).find_map(|distance| {
            [current - distance, current + distance]
                .into_iter()
                .filter(|i| (0..len as isize).contains(i))
                .map(|i| i as usize)
                .find(|i| !history.contains(*i))
        })
    }
}

impl SelectionPolicy for RepeatAvoidance {
    fn select<T>(
        &self,
        table: &WeightedTable<T>,
        history: &SelectionHistory,
        rng: &mut RngProvider,
    ) -> usize {
        let len = table.len();
        let Some(current) = history.current() else {
            return rng.weighted_index(table);
        };
        let current = current.min(len - 1) as isize;

        let mut candidate = Self::clamp(current + rng.uniform_step(self.max_step), len);
        if !history.contains(candidate) {
            return candidate;
        }

        let below = Self::clamp(current - 1, len);
        let above = Self::clamp(current + 1, len);
        if history.contains(below) && history.contains(above) {
            // Pinned against a table edge: take the closest index that is
            // not a recent pick, or keep the candidate if there is none.
            return Self::nearest_fresh(current, len, history).unwrap_or(candidate);
        }

        while history.contains(candidate) {
            candidate = Self::clamp(current + rng.direction(), len);
        }
        candidate
    }
}

/// Pitch policy as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum PitchPolicy {
    /// Independent weighted draws.
    #[default]
    Weighted,
    /// Random walk that avoids the last two pitches.
    AvoidRepeats {
        /// Largest distance of the initial step.
        #[serde(default = "default_max_step")]
        max_step: usize,
    },
}

fn default_max_step() -> usize {
    DEFAULT_MAX_STEP
}

impl PitchPolicy {
    /// Repeat avoidance with the default step.
    pub fn avoid_repeats() -> Self {
        PitchPolicy::AvoidRepeats {
            max_step: DEFAULT_MAX_STEP,
        }
    }

    /// Short label for reports.
    pub fn name(&self) -> &'static str {
        match self {
            PitchPolicy::Weighted => "weighted",
            PitchPolicy::AvoidRepeats { .. } => "avoid_repeats",
        }
    }
}

impl SelectionPolicy for PitchPolicy {
    fn select<T>(
        &self,
        table: &WeightedTable<T>,
        history: &SelectionHistory,
        rng: &mut RngProvider,
    ) -> usize {
        match *self {
            PitchPolicy::Weighted => WeightedSampling.select(table, history, rng),
            PitchPolicy::AvoidRepeats { max_step } => {
                RepeatAvoidance { max_step }.select(table, history, rng)
            }
        }
    }
}

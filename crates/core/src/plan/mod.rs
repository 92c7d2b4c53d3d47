//! Bounded, deterministic trial planning.
//!
//! A [`TrialPlan`] lazily walks the Cartesian product of per-parameter
//! candidate sets in a fixed order (first parameter varies slowest) and stops
//! at the trial cap, so planning cost is never paid for trials past the cap
//! or past the first failure.

use crate::candidates::Value;

/// Lazy iterator over argument tuples for one function.
pub struct TrialPlan {
    sets: Vec<Vec<Value>>,
    /// Odometer over `sets`; the last digit turns fastest.
    cursor: Vec<usize>,
    emitted: usize,
    max_trials: usize,
    exhausted: bool,
}

impl TrialPlan {
    /// Plan trials over `sets`, truncated at `max_trials`.
    ///
    /// A function with zero parameters yields exactly one empty trial. An
    /// empty candidate set (which callers never produce) yields no trials.
    pub fn new(sets: Vec<Vec<Value>>, max_trials: usize) -> Self {
        let exhausted = max_trials == 0 || sets.iter().any(|s| s.is_empty());
        let cursor = vec![0; sets.len()];
        TrialPlan { sets, cursor, emitted: 0, max_trials, exhausted }
    }

    fn current(&self) -> Vec<Value> {
        self.cursor.iter().zip(&self.sets).map(|(&i, set)| set[i].clone()).collect()
    }

    /// Advance the odometer; returns false once the product is exhausted.
    fn advance(&mut self) -> bool {
        for pos in (0..self.cursor.len()).rev() {
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.sets[pos].len() {
                return true;
            }
            self.cursor[pos] = 0;
        }
        false
    }
}

impl Iterator for TrialPlan {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Vec<Value>> {
        if self.exhausted || self.emitted >= self.max_trials {
            return None;
        }
        let trial = self.current();
        self.emitted += 1;
        if !self.advance() {
            self.exhausted = true;
        }
        Some(trial)
    }
}

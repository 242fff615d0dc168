//! Trail table.

use std::collections::HashMap;

use crate::model::LocationId;

/// Reinforcement an agent contributes to one directed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailDeposit {
    pub from: LocationId,
    pub to: LocationId,
    pub amount: f64,
}

/// Directed edge strengths learned across cycles.
///
/// Entries are created lazily. An edge without an entry reads as the
/// decayed baseline `fadeness^cycle`. Strengths never go below zero.
///
/// # Examples
///
/// ```
/// use u_orienteering::colony::{TrailDeposit, TrailTable};
///
/// let mut trail = TrailTable::new(0.5);
/// assert_eq!(trail.strength(0, 1), 1.0);
///
/// trail.advance([TrailDeposit { from: 0, to: 1, amount: 2.0 }]);
/// assert_eq!(trail.strength(0, 1), 3.0);
/// assert_eq!(trail.strength(1, 0), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct TrailTable {
    fadeness: f64,
    cycle: u32,
    strengths: HashMap<(LocationId, LocationId), f64>,
}

impl TrailTable {
    pub fn new(fadeness: f64) -> Self {
        Self {
            fadeness,
            cycle: 0,
            strengths: HashMap::new(),
        }
    }

    /// Clears every entry and restarts the cycle count.
    pub fn reset(&mut self) {
        self.strengths.clear();
        self.cycle = 0;
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Strength of an edge without an entry: `fadeness^cycle`.
    pub fn baseline(&self) -> f64 {
        self.fadeness.powi(self.cycle as i32)
    }

    /// Strength of `from → to`, falling back to the baseline.
    pub fn strength(&self, from: LocationId, to: LocationId) -> f64 {
        self.get(from, to).unwrap_or_else(|| self.baseline())
    }

    /// Stored strength of `from → to`, if the edge has an entry.
    pub fn get(&self, from: LocationId, to: LocationId) -> Option<f64> {
        self.strengths.get(&(from, to)).copied()
    }

    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    /// Closes a cycle: evaporates every entry, then adds the deposits.
    ///
    /// Deposits are summed per edge before they are applied, so their order
    /// does not matter. An edge first reinforced in this cycle starts from
    /// the current baseline. Each touched entry is clamped at zero once.
    pub fn advance(&mut self, deposits: impl IntoIterator<Item = TrailDeposit>) {
        let mut totals: HashMap<(LocationId, LocationId), f64> = HashMap::new();
        for deposit in deposits {
            *totals.entry((deposit.from, deposit.to)).or_insert(0.0) += deposit.amount;
        }

        let fresh = self.baseline();
        for strength in self.strengths.values_mut() {
            *strength *= self.fadeness;
        }
        for (edge, amount) in totals {
            let strength = self.strengths.entry(edge).or_insert(fresh);
            *strength = (*strength + amount).max(0.0);
        }
        self.cycle += 1;
    }
}

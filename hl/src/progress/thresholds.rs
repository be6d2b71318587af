//! Per-level experience thresholds
//!
//! The game does not publish its XP curve. The built-in table only matches
//! observed values around levels 10 to 13; estimates that cross levels
//! outside that range are rough.

use std::collections::BTreeMap;

/// Experience required to advance from a level to the next
pub trait XpThresholds: Send + Sync {
    fn xp_for_level(&self, level: i64) -> i64;

    /// Total for levels `from..to`; `None` when it does not fit in an `i64`
    ///
    /// The default walks every level, so implementations meant for wide
    /// ranges should override it.
    fn xp_between(&self, from: i64, to: i64) -> Option<i64> {
        (from..to).try_fold(0i64, |acc, level| acc.checked_add(self.xp_for_level(level)))
    }
}

/// Observed curve: 20k up to level 10, 30k at 11, then +10k per level
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicThresholds;

const FLAT_XP: i128 = 20_000;
const STEP_XP: i128 = 10_000;
/// First level on the linear part of the curve: `10_000 * (level - 8)`
const LINEAR_FROM: i64 = 11;

impl HeuristicThresholds {
    /// Closed-form sum over `from..to` in `i128`
    fn sum(from: i64, to: i64) -> Option<i128> {
        if from >= to {
            return Some(0);
        }
        let (from, to) = (i128::from(from), i128::from(to));
        let linear_from = i128::from(LINEAR_FROM);

        let flat_levels = (to.min(linear_from) - from).max(0);
        let flat = flat_levels.checked_mul(FLAT_XP)?;

        let lo = from.max(linear_from);
        let linear = if to > lo {
            // sum of (level - 8) for level in lo..to
            let (first, last, count) = (lo - 8, to - 9, to - lo);
            (first + last).checked_mul(count)?.checked_div(2)?.checked_mul(STEP_XP)?
        } else {
            0
        };
        flat.checked_add(linear)
    }
}

impl XpThresholds for HeuristicThresholds {
    fn xp_for_level(&self, level: i64) -> i64 {
        if level < LINEAR_FROM {
            20_000
        } else {
            level.saturating_sub(8).saturating_mul(10_000)
        }
    }

    fn xp_between(&self, from: i64, to: i64) -> Option<i64> {
        Self::sum(from, to).and_then(|total| i64::try_from(total).ok())
    }
}

/// Explicit per-level table, falling back to the heuristic for unlisted levels
#[derive(Debug, Clone, Default)]
pub struct TableThresholds {
    table: BTreeMap<i64, i64>,
}

impl TableThresholds {
    pub fn new(table: BTreeMap<i64, i64>) -> Self {
        Self { table }
    }
}

impl XpThresholds for TableThresholds {
    fn xp_for_level(&self, level: i64) -> i64 {
        self.table
            .get(&level)
            .copied()
            .unwrap_or_else(|| HeuristicThresholds.xp_for_level(level))
    }

    /// Heuristic total, corrected for each listed level in range
    fn xp_between(&self, from: i64, to: i64) -> Option<i64> {
        if from >= to {
            return Some(0);
        }
        let mut total = HeuristicThresholds::sum(from, to)?;
        for (&level, &xp) in self.table.range(from..to) {
            let heuristic = i128::from(HeuristicThresholds.xp_for_level(level));
            total = total.checked_add(i128::from(xp) - heuristic)?;
        }
        i64::try_from(total).ok()
    }
}

//! Days-to-level-up estimation
//!
//! Uses only the oldest and newest snapshots: no regression and no outlier
//! handling, just the average XP rate between the two endpoints.

use tracing::debug;

use super::thresholds::{HeuristicThresholds, XpThresholds};
use crate::domain::Profile;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Estimate whole days until `latest` reaches its next level
///
/// `history` may be in any order. Returns `None` when there is not enough
/// data: fewer than two snapshots, no elapsed time, or no XP gained.
pub fn estimate_days_to_level_up(latest: &Profile, history: &[Profile]) -> Option<i64> {
    estimate_with(latest, history, &HeuristicThresholds)
}

/// Same as [`estimate_days_to_level_up`] with a custom threshold curve
pub fn estimate_with(latest: &Profile, history: &[Profile], thresholds: &dyn XpThresholds) -> Option<i64> {
    debug!(entries = history.len(), "estimate_with: called");
    if history.len() < 2 {
        debug!("estimate_with: fewer than two snapshots");
        return None;
    }

    let mut sorted: Vec<&Profile> = history.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);
    let (oldest, newest) = (sorted[0], sorted[sorted.len() - 1]);

    let elapsed_days = (newest.timestamp - oldest.timestamp).num_seconds() as f64 / SECONDS_PER_DAY;
    if elapsed_days <= 0.0 {
        debug!("estimate_with: no elapsed time");
        return None;
    }

    let Some(gained) = xp_gained(oldest, newest, thresholds) else {
        debug!(oldest = oldest.level, newest = newest.level, "estimate_with: XP total out of range");
        return None;
    };
    if gained <= 0 {
        debug!(gained, "estimate_with: no XP gained");
        return None;
    }

    let xp_per_day = gained as f64 / elapsed_days;
    if xp_per_day <= 0.0 {
        return None;
    }

    let remaining = latest.next_level_experience.saturating_sub(latest.current_experience);
    if remaining <= 0 {
        return Some(0);
    }

    let days = (remaining as f64 / xp_per_day).ceil() as i64;
    debug!(gained, elapsed_days, xp_per_day, remaining, days, "estimate_with: estimated");
    Some(days)
}

/// Total XP earned between two snapshots, crossing level boundaries
///
/// `None` when the total does not fit in an `i64`.
fn xp_gained(oldest: &Profile, newest: &Profile, thresholds: &dyn XpThresholds) -> Option<i64> {
    if oldest.level == newest.level {
        return newest.current_experience.checked_sub(oldest.current_experience);
    }

    let finish_old_level = oldest.next_level_experience.checked_sub(oldest.current_experience)?;
    let between = thresholds.xp_between(oldest.level.checked_add(1)?, newest.level)?;
    finish_old_level.checked_add(between)?.checked_add(newest.current_experience)
}

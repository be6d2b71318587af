//! Regen timer parsing
//!
//! The game prints remaining regeneration time inside parentheses, e.g.
//! `(7хв до повного відновлення)` or `(1год 30хв до ...)`.

use tracing::debug;

const SECONDS: &str = "сек";
const MINUTES: &str = "хв";
const HOURS: &str = "год";

/// Convert a regen description into whole minutes
///
/// Seconds round up to one minute so a nearly-full bar never reads as zero.
/// Returns `None` when the text carries no digits or more than two numbers.
pub fn parse_time_string(text: &str) -> Option<i64> {
    debug!(%text, "parse_time_string: called");
    let runs: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect();

    let has_seconds = text.contains(SECONDS);
    let has_minutes = text.contains(MINUTES);
    let has_hours = text.contains(HOURS);

    match runs.as_slice() {
        [value] => {
            let value: i64 = value.parse().ok()?;
            if has_seconds {
                Some(if value > 0 { 1 } else { 0 })
            } else if has_minutes && !has_hours {
                Some(value)
            } else if has_hours && !has_minutes {
                Some(value * 60)
            } else {
                Some(value)
            }
        }
        [first, second] => {
            let first: i64 = first.parse().ok()?;
            let second: i64 = second.parse().ok()?;
            if has_hours && has_minutes {
                Some(first * 60 + second)
            } else {
                // minutes and leftover seconds
                Some(first + if second > 0 { 1 } else { 0 })
            }
        }
        _ => {
            debug!(runs = runs.len(), "parse_time_string: unsupported number count");
            None
        }
    }
}

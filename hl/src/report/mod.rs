//! Delta reports between consecutive snapshots

mod diff;

pub use diff::compare_profiles;

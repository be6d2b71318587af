//! HeroLog - game profile snapshot tracker
//!
//! Players paste their in-game profile text; HeroLog turns each paste into a
//! structured [`Profile`](domain::Profile), keeps a bounded per-user history,
//! reports what changed since the previous snapshot, and estimates how many
//! days remain until the next level-up.
//!
//! # Core Concepts
//!
//! - **Pure Core**: parsing, diffing and estimation are synchronous functions over values
//! - **Bounded History**: 100 snapshots per user by default, oldest evicted first
//! - **Dedup on State**: a paste identical in game state to the latest snapshot is rejected
//! - **Serialized Writes**: one actor owns the store, the store locks per user
//!
//! # Modules
//!
//! - [`parser`] - profile text to [`Profile`](domain::Profile)
//! - [`report`] - delta report between two snapshots
//! - [`progress`] - days-to-level-up estimation
//! - [`history`] - duplicate detection and bounded retention
//! - [`ingest`] - end-to-end ingestion flow
//! - [`state`] - actor owning the history store

pub mod cli;
pub mod config;
pub mod domain;
pub mod history;
pub mod ingest;
pub mod parser;
pub mod progress;
pub mod report;
pub mod state;

pub use domain::Profile;
pub use ingest::{IngestOutcome, Ingestor};
pub use parser::{ParseError, parse};
pub use progress::estimate_days_to_level_up;
pub use report::compare_profiles;

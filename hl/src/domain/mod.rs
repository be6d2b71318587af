//! Domain types for HeroLog
//!
//! The only persisted record is [`Profile`]; a user's history is a
//! `Vec<Profile>` kept by the history store.

mod profile;

pub use profile::Profile;

#[cfg(test)]
pub(crate) use profile::fixture;

//! Profile text parser
//!
//! Turns a pasted game profile into a [`Profile`](crate::domain::Profile).
//! Arbitrary chat messages flow through the same path, so a failure is an
//! ordinary outcome rather than an error worth surfacing.

mod labels;
mod regen;
mod snapshot;

pub use labels::Label;
pub use regen::parse_time_string;
pub use snapshot::parse;

use thiserror::Error;

/// Why a text did not become a profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not have the profile shape (no name/level header)
    #[error("text is not a profile")]
    NotAProfile,

    /// Shaped like a profile, but a required line is missing or unreadable
    #[error("malformed {field} line: {reason}")]
    Malformed { field: Label, reason: String },
}

impl ParseError {
    pub(crate) fn malformed(field: Label, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }
}

//! End-to-end ingestion of a pasted message
//!
//! Marker check, parse, dedup + append through the [`StateManager`], then the
//! reply text: a delta report, or a first-save confirmation.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::domain::Profile;
use crate::parser::{self, ParseError};
use crate::report::compare_profiles;
use crate::state::{StateError, StateManager, Submission};

/// Reply for a profile-looking text that failed to parse
pub const MALFORMED_MESSAGE: &str = "❌ Помилка при оновленні профілю. Перевірте формат.";

/// Reply when the snapshot equals the latest stored one
pub const DUPLICATE_WARNING: &str = "⚠️ Такий профіль вже збережено.";

/// Reply for a user's first stored snapshot
pub const FIRST_SAVE_MESSAGE: &str = "🙌 Профіль збережено!";

/// Usage help shown to players
pub const GUIDE: &str = "👁️ Як користуватись:\n\
    • Надішліть ігровий профіль, щоб зберігти.\n\
    • Надішліть профіль ще раз, щоб порівняти.";

const HEADER_MARKER: &str = "⚔️";
const ENERGY_MARKER: &str = "🔋";
const HEALTH_MARKER: &str = "❤️";

/// What happened to one incoming message
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Not a profile; nothing to say
    Ignored,
    /// Looked like a profile but could not be read
    Rejected { message: String },
    /// Same game state as the latest snapshot
    Duplicate { warning: String },
    /// Appended to the user's history
    Stored { profile: Box<Profile>, report: String },
}

impl IngestOutcome {
    /// Text to send back to the player, if any
    pub fn reply(&self) -> Option<&str> {
        match self {
            IngestOutcome::Ignored => None,
            IngestOutcome::Rejected { message } => Some(message),
            IngestOutcome::Duplicate { warning } => Some(warning),
            IngestOutcome::Stored { report, .. } => Some(report),
        }
    }
}

/// Cheap pre-check for the game's profile markers
///
/// Header sword at the start, plus the energy and health icons anywhere.
pub fn looks_like_profile(text: &str) -> bool {
    text.trim_start().starts_with(HEADER_MARKER) && text.contains(ENERGY_MARKER) && text.contains(HEALTH_MARKER)
}

/// Drives messages through parsing and storage
#[derive(Clone)]
pub struct Ingestor {
    state: StateManager,
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(state: StateManager, config: IngestConfig) -> Self {
        Self { state, config }
    }

    /// Ingest one message from `user`, received at `received_at`
    ///
    /// Only storage failures are errors; everything about the text itself is
    /// an [`IngestOutcome`].
    pub async fn ingest(&self, user: &str, raw: &str, received_at: DateTime<Utc>) -> Result<IngestOutcome, StateError> {
        debug!(%user, len = raw.len(), "ingest: called");

        let markers_present = looks_like_profile(raw);
        if self.config.require_markers && !markers_present {
            debug!(%user, "ingest: no profile markers");
            return Ok(IngestOutcome::Ignored);
        }

        let captured_at = received_at + Duration::hours(self.config.timestamp_offset_hours);
        let profile = match parser::parse(raw, captured_at) {
            Ok(profile) => profile,
            Err(ParseError::NotAProfile) => {
                debug!(%user, "ingest: not a profile");
                return Ok(IngestOutcome::Ignored);
            }
            Err(e) if self.config.require_markers => {
                warn!(%user, error = %e, "ingest: profile rejected");
                return Ok(IngestOutcome::Rejected {
                    message: MALFORMED_MESSAGE.to_string(),
                });
            }
            Err(e) => {
                info!(%user, error = %e, "ingest: malformed text ignored");
                return Ok(IngestOutcome::Ignored);
            }
        };

        match self.state.submit(user, profile.clone()).await? {
            Submission::Duplicate => {
                info!(%user, "ingest: duplicate profile");
                Ok(IngestOutcome::Duplicate {
                    warning: DUPLICATE_WARNING.to_string(),
                })
            }
            Submission::Stored { previous, evicted } => {
                info!(%user, level = profile.level, evicted, "ingest: profile stored");
                let report = match previous {
                    Some(previous) => compare_profiles(&previous, &profile),
                    None => FIRST_SAVE_MESSAGE.to_string(),
                };
                Ok(IngestOutcome::Stored {
                    profile: Box::new(profile),
                    report,
                })
            }
        }
    }
}

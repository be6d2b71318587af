//! Profile domain type
//!
//! One parsed, point-in-time record of a player's in-game stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a player's game state
///
/// Equality compares game state only: `timestamp` and both regen timers are
/// ignored, so two pastes of an unchanged profile compare equal even when
/// captured at different times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Player name, including any emoji in it
    pub name: String,

    /// Player level
    pub level: i64,

    /// Guild name and tag, if the player is in a guild
    #[serde(default)]
    pub guild: Option<String>,

    pub current_health: i64,
    pub max_health: i64,

    /// Minutes until health is full (absent when already full)
    #[serde(default)]
    pub health_regen_minutes: Option<i64>,

    pub current_energy: i64,
    pub max_energy: i64,

    /// Minutes until the next energy point (absent when already full)
    #[serde(default)]
    pub energy_regen_minutes: Option<i64>,

    /// Energy spent today
    pub energy_spent_today: i64,

    pub attack: i64,
    pub defense: i64,
    pub hero_power: i64,

    /// Experience earned within the current level
    pub current_experience: i64,

    /// Experience threshold of the current level
    pub next_level_experience: i64,

    pub gold: i64,

    /// Capture time supplied by the caller, never parsed from the text
    pub timestamp: DateTime<Utc>,
}

impl Profile {
    /// Experience still missing to reach the next level (never negative)
    pub fn xp_to_next_level(&self) -> i64 {
        self.next_level_experience.saturating_sub(self.current_experience).max(0)
    }

    /// One-line summary for listings
    pub fn summary(&self) -> String {
        format!(
            "{} Lv {} XP {}/{} 💰{}",
            self.name, self.level, self.current_experience, self.next_level_experience, self.gold
        )
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.level == other.level
            && self.guild == other.guild
            && self.current_health == other.current_health
            && self.max_health == other.max_health
            && self.current_energy == other.current_energy
            && self.max_energy == other.max_energy
            && self.energy_spent_today == other.energy_spent_today
            && self.attack == other.attack
            && self.defense == other.defense
            && self.hero_power == other.hero_power
            && self.current_experience == other.current_experience
            && self.next_level_experience == other.next_level_experience
            && self.gold == other.gold
    }
}

impl Eq for Profile {}

/// Minimal profile for unit tests: level and experience set, everything else neutral
#[cfg(test)]
pub(crate) fn fixture(level: i64, current_experience: i64, next_level_experience: i64) -> Profile {
    Profile {
        name: "Hero".to_string(),
        level,
        guild: None,
        current_health: 100,
        max_health: 100,
        health_regen_minutes: None,
        current_energy: 10,
        max_energy: 10,
        energy_regen_minutes: None,
        energy_spent_today: 0,
        attack: 50,
        defense: 40,
        hero_power: 300,
        current_experience,
        next_level_experience,
        gold: 0,
        timestamp: DateTime::<Utc>::UNIX_EPOCH,
    }
}

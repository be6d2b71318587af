//! Snapshot parsing
//!
//! Expected shape (guild line optional, remaining lines in any order):
//!
//! ```text
//! ⚔️ Hero - Рівень 5
//! 🏰 Гільдія: [TAG] Guild
//! ❤️ Здоров'я: 100/200 (7хв до повного відновлення)
//! 🔋 Енергія: 3/10
//! Витрачено енергії за день: 12
//! Атака: 50
//! Захист: 40
//! Сила героя: 300
//! Досвід: 900/1000
//! Золото: 250
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use super::labels::{Label, LabeledLines};
use super::regen::parse_time_string;
use super::ParseError;
use crate::domain::Profile;

/// Separates the player name from the level on the header line
const LEVEL_DELIMITER: &str = " - Рівень ";

const HEADER_MARKER: char = '⚔';
const VARIATION_SELECTOR: char = '\u{FE0F}';
const GUILD_MARKER: &str = "Гільдія:";
const GUILD_LABEL: &str = "Гільдія: ";
const GUILD_PREFIX: &str = "🏰 Гільдія: ";

/// Parse a pasted profile captured at `captured_at`
///
/// Never panics: the result is either a fully populated profile or a
/// [`ParseError`] saying why the text was not accepted.
pub fn parse(raw: &str, captured_at: DateTime<Utc>) -> Result<Profile, ParseError> {
    debug!(len = raw.len(), "parse: called");
    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let Some(header) = lines.first() else {
        debug!("parse: no non-empty lines");
        return Err(ParseError::NotAProfile);
    };

    let (name, level) = parse_header(header).ok_or(ParseError::NotAProfile)?;
    let guild = lines.get(1).and_then(|line| parse_guild(line));

    let labeled = LabeledLines::build(&lines);
    debug!(missing = ?labeled.missing(), "parse: labelled lines indexed");
    let line = |label: Label| {
        labeled
            .get(label)
            .ok_or_else(|| ParseError::malformed(label, "line missing"))
    };

    let (current_health, max_health, health_regen_minutes) = parse_pool(line(Label::Health)?, Label::Health)?;
    let (current_energy, max_energy, energy_regen_minutes) = parse_pool(line(Label::Energy)?, Label::Energy)?;
    let energy_spent_today = parse_lenient(line(Label::EnergySpent)?);
    let attack = parse_stat(line(Label::Attack)?, Label::Attack)?;
    let defense = parse_stat(line(Label::Defense)?, Label::Defense)?;
    let hero_power = parse_stat(line(Label::HeroPower)?, Label::HeroPower)?;
    let (current_experience, next_level_experience) = parse_experience(line(Label::Experience)?)?;
    let gold = parse_lenient(line(Label::Gold)?);

    debug!(%name, level, "parse: profile parsed");
    Ok(Profile {
        name,
        level,
        guild,
        current_health,
        max_health,
        health_regen_minutes,
        current_energy,
        max_energy,
        energy_regen_minutes,
        energy_spent_today,
        attack,
        defense,
        hero_power,
        current_experience,
        next_level_experience,
        gold,
        timestamp: captured_at,
    })
}

/// `⚔️ Name - Рівень 5` into name and level
fn parse_header(line: &str) -> Option<(String, i64)> {
    let stripped = match line.strip_prefix(HEADER_MARKER) {
        Some(rest) => rest.strip_prefix(VARIATION_SELECTOR).unwrap_or(rest).trim_start(),
        None => line,
    };
    let (name, level) = stripped.split_once(LEVEL_DELIMITER)?;
    let level = level.parse().ok()?;
    Some((name.to_string(), level))
}

/// Guild name from the line right after the header, if it is a guild line
fn parse_guild(line: &str) -> Option<String> {
    if !line.contains(GUILD_MARKER) {
        return None;
    }
    match line.split_once(GUILD_LABEL) {
        Some((_, guild)) => Some(guild.to_string()),
        None => Some(line.chars().skip(GUILD_PREFIX.chars().count()).collect()),
    }
}

/// Text following the first occurrence of the label's keyword
fn after_keyword(line: &str, label: Label) -> &str {
    line.split_once(label.keyword()).map(|(_, rest)| rest).unwrap_or("")
}

/// `current/max` pair; both sides must be integers
fn parse_pair(value: &str, label: Label) -> Result<(i64, i64), ParseError> {
    let parts: Vec<&str> = value.split('/').filter(|p| !p.is_empty()).collect();
    let [current, max] = parts.as_slice() else {
        return Err(ParseError::malformed(label, format!("expected current/max, got {:?}", value)));
    };
    let current = current
        .parse()
        .map_err(|_| ParseError::malformed(label, format!("bad current value {:?}", current)))?;
    let max = max
        .parse()
        .map_err(|_| ParseError::malformed(label, format!("bad max value {:?}", max)))?;
    Ok((current, max))
}

/// Health or energy: `current/max`, optionally followed by `(regen text)`
fn parse_pool(line: &str, label: Label) -> Result<(i64, i64, Option<i64>), ParseError> {
    let mut value = after_keyword(line, label).trim();
    let mut regen = None;

    if let Some(open) = value.find('(') {
        let paren = &value[open + 1..];
        if let Some(close) = paren.find(')') {
            regen = parse_time_string(&paren[..close]);
        }
        value = value[..open].trim();
    }

    let (current, max) = parse_pair(value, label)?;
    Ok((current, max, regen))
}

/// Combat stat: integer after the first colon
fn parse_stat(line: &str, label: Label) -> Result<i64, ParseError> {
    let value = line
        .split_once(':')
        .map(|(_, rest)| rest.trim_start())
        .unwrap_or("");
    value
        .parse()
        .map_err(|_| ParseError::malformed(label, format!("bad value {:?}", value)))
}

/// Energy spent and gold: one separator after the colon, zero when unreadable
fn parse_lenient(line: &str) -> i64 {
    let Some((_, rest)) = line.split_once(':') else {
        return 0;
    };
    let mut chars = rest.chars();
    chars.next();
    chars.as_str().trim().parse().unwrap_or(0)
}

/// `Досвід: current/next`
fn parse_experience(line: &str) -> Result<(i64, i64), ParseError> {
    parse_pair(after_keyword(line, Label::Experience).trim(), Label::Experience)
}

//! Delta report between two snapshots

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::Profile;

const NO_GUILD: &str = "No Guild";

/// Describe what changed between an older and a newer snapshot
///
/// Level and experience lines are always present; guild and the six
/// stat lines only appear when the value changed.
pub fn compare_profiles(old: &Profile, new: &Profile) -> String {
    debug!(old_level = old.level, new_level = new.level, "compare_profiles: called");
    let mut lines = vec![level_line(old, new)];
    lines.extend(experience_lines(old, new));

    if old.guild != new.guild {
        lines.push(format!(
            "🏰 Guild: {} → {}",
            old.guild.as_deref().unwrap_or(NO_GUILD),
            new.guild.as_deref().unwrap_or(NO_GUILD)
        ));
    }

    let stats: [(&str, i64, i64); 6] = [
        ("❤️ Max Health", old.max_health, new.max_health),
        ("⚡ Max Energy", old.max_energy, new.max_energy),
        ("⚔️ Attack", old.attack, new.attack),
        ("🛡️ Defense", old.defense, new.defense),
        ("💪 Power", old.hero_power, new.hero_power),
        ("💰 Gold", old.gold, new.gold),
    ];
    for (label, before, after) in stats {
        if before != after {
            lines.push(format!("{}: {} → {} ({})", label, before, after, signed(widen(after) - widen(before))));
        }
    }

    lines.join("\n")
}

fn level_line(old: &Profile, new: &Profile) -> String {
    match new.level.cmp(&old.level) {
        Ordering::Equal => format!("⚔️ Level: {} (no change)", new.level),
        Ordering::Greater => format!("⚔️ Level: {} → {} ⬆️", old.level, new.level),
        Ordering::Less => format!("⚔️ Level: {} → {} ⬇️", old.level, new.level),
    }
}

fn experience_lines(old: &Profile, new: &Profile) -> Vec<String> {
    let progress = format!("{}/{}", new.current_experience, new.next_level_experience);
    let gained_levels = widen(new.level) - widen(old.level);

    match gained_levels {
        0 => {
            let delta = widen(new.current_experience) - widen(old.current_experience);
            let change = if delta == 0 {
                "no change".to_string()
            } else {
                format!("{} XP", signed(delta))
            };
            vec![format!(
                "✨ Experience: {}/{} → {} ({})",
                old.current_experience, old.next_level_experience, progress, change
            )]
        }
        1 => {
            let finished_old_level = widen(old.next_level_experience) - widen(old.current_experience);
            let total = finished_old_level + widen(new.current_experience);
            vec![format!(
                "✨ Experience: Leveled up from {} to {}! Gained {} XP (now {} into level {}).",
                old.level, new.level, total, progress, new.level
            )]
        }
        n if n > 1 => vec![
            format!(
                "✨ Experience: Leveled up from {} to {}! (Multiple level-ups)",
                old.level, new.level
            ),
            format!("   Current XP: {} at level {}.", progress, new.level),
        ],
        _ => vec![format!(
            "✨ Experience: Level dropped from {} to {} (now {}).",
            old.level, new.level, progress
        )],
    }
}

/// Report arithmetic runs in `i128` so any pair of `i64` values fits
fn widen(value: i64) -> i128 {
    i128::from(value)
}

/// Explicit `+` for positive deltas; negatives carry their own sign
fn signed(delta: i128) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixture;

    #[test]
    fn test_identical_profiles() {
        let p = fixture(5, 900, 1000);
        let report = compare_profiles(&p, &p);

        assert_eq!(
            report,
            "⚔️ Level: 5 (no change)\n✨ Experience: 900/1000 → 900/1000 (no change)"
        );
    }

    #[test]
    fn test_same_level_xp_gain_and_loss() {
        let old = fixture(5, 900, 1000);
        let new = fixture(5, 950, 1000);
        let report = compare_profiles(&old, &new);
        assert!(report.contains("✨ Experience: 900/1000 → 950/1000 (+50 XP)"));

        let report = compare_profiles(&new, &old);
        assert!(report.contains("✨ Experience: 950/1000 → 900/1000 (-50 XP)"));
    }

    #[test]
    fn test_single_level_up_totals_xp() {
        let old = fixture(5, 900, 1000);
        let new = fixture(6, 50, 1200);
        let report = compare_profiles(&old, &new);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "⚔️ Level: 5 → 6 ⬆️");
        assert_eq!(
            lines[1],
            "✨ Experience: Leveled up from 5 to 6! Gained 150 XP (now 50/1200 into level 6)."
        );
    }

    #[test]
    fn test_multiple_level_ups() {
        let old = fixture(5, 900, 1000);
        let new = fixture(8, 10, 5000);
        let lines: Vec<String> = compare_profiles(&old, &new).lines().map(String::from).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "✨ Experience: Leveled up from 5 to 8! (Multiple level-ups)");
        assert_eq!(lines[2], "   Current XP: 10/5000 at level 8.");
    }

    #[test]
    fn test_level_drop() {
        let old = fixture(6, 50, 1200);
        let new = fixture(5, 990, 1000);
        let lines: Vec<String> = compare_profiles(&old, &new).lines().map(String::from).collect();

        assert_eq!(lines[0], "⚔️ Level: 6 → 5 ⬇️");
        assert_eq!(lines[1], "✨ Experience: Level dropped from 6 to 5 (now 990/1000).");
    }

    #[test]
    fn test_guild_change_uses_placeholder() {
        let old = fixture(5, 900, 1000);
        let mut new = old.clone();
        new.guild = Some("[OE] Eye".to_string());

        let report = compare_profiles(&old, &new);
        assert!(report.contains("🏰 Guild: No Guild → [OE] Eye"));

        let report = compare_profiles(&new, &old);
        assert!(report.contains("🏰 Guild: [OE] Eye → No Guild"));
    }

    #[test]
    fn test_stat_lines_in_fixed_order() {
        let old = fixture(5, 900, 1000);
        let mut new = old.clone();
        new.gold = 30;
        new.attack = 45;
        new.max_health = 120;
        new.hero_power = 310;
        new.guild = Some("G".to_string());

        let report = compare_profiles(&old, &new);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(
            &lines[2..],
            &[
                "🏰 Guild: No Guild → G",
                "❤️ Max Health: 100 → 120 (+20)",
                "⚔️ Attack: 50 → 45 (-5)",
                "💪 Power: 300 → 310 (+10)",
                "💰 Gold: 0 → 30 (+30)",
            ]
        );
    }

    #[test]
    fn test_current_values_do_not_produce_lines() {
        let old = fixture(5, 900, 1000);
        let mut new = old.clone();
        new.current_health = 1;
        new.current_energy = 0;
        new.energy_spent_today = 9;

        assert_eq!(compare_profiles(&old, &new).lines().count(), 2);
    }

    fn parsed(level: i64, experience: &str, gold: &str) -> Profile {
        let text = format!(
            "⚔️ Hero - Рівень {level}\n\
             ❤️ Здоров'я: 100/100\n\
             🔋 Енергія: 10/10\n\
             Витрачено енергії за день: 0\n\
             Атака: 50\n\
             Захист: 40\n\
             Сила героя: 300\n\
             Досвід: {experience}\n\
             Золото: {gold}"
        );
        crate::parser::parse(&text, chrono::DateTime::<chrono::Utc>::UNIX_EPOCH).unwrap()
    }

    #[test]
    fn test_level_up_from_max_threshold_does_not_overflow() {
        let old = parsed(5, "0/9223372036854775807", "0");
        let new = parsed(6, "5/10", "0");

        let report = compare_profiles(&old, &new);
        assert!(report.contains("Gained 9223372036854775812 XP (now 5/10 into level 6)."));
    }

    #[test]
    fn test_extreme_stat_and_xp_deltas() {
        let old = parsed(5, "-9223372036854775808/10", "-9223372036854775808");
        let new = parsed(5, "9223372036854775807/10", "9223372036854775807");

        let report = compare_profiles(&old, &new);
        assert!(report.contains("(+18446744073709551615 XP)"));
        assert!(report.contains(
            "💰 Gold: -9223372036854775808 → 9223372036854775807 (+18446744073709551615)"
        ));
    }

    #[test]
    fn test_extreme_level_jump() {
        let old = fixture(i64::MIN, 0, 10);
        let new = fixture(i64::MAX, 0, 10);
        assert!(compare_profiles(&old, &new).contains("(Multiple level-ups)"));
        assert!(compare_profiles(&new, &old).contains("Level dropped"));
    }
}

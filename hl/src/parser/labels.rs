//! Field labels and keyword line lookup

use std::collections::HashMap;
use std::fmt;

/// A labelled line of the profile text, located by keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Health,
    Energy,
    EnergySpent,
    Attack,
    Defense,
    HeroPower,
    Experience,
    Gold,
}

impl Label {
    /// Every label a complete profile carries
    pub const ALL: [Label; 8] = [
        Label::Health,
        Label::Energy,
        Label::EnergySpent,
        Label::Attack,
        Label::Defense,
        Label::HeroPower,
        Label::Experience,
        Label::Gold,
    ];

    /// Keyword searched for inside a line
    pub fn keyword(self) -> &'static str {
        match self {
            Label::Health => "Здоров'я:",
            Label::Energy => "Енергія:",
            Label::EnergySpent => "Витрачено енергії за день:",
            Label::Attack => "Атака:",
            Label::Defense => "Захист:",
            Label::HeroPower => "Сила героя:",
            Label::Experience => "Досвід:",
            Label::Gold => "Золото:",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Label::Health => "health",
            Label::Energy => "energy",
            Label::EnergySpent => "energy spent",
            Label::Attack => "attack",
            Label::Defense => "defense",
            Label::HeroPower => "hero power",
            Label::Experience => "experience",
            Label::Gold => "gold",
        };
        f.write_str(name)
    }
}

/// Map from label to the first line containing its keyword
///
/// Built in a single pass, so the order of lines in the paste does not matter.
#[derive(Debug, Default)]
pub struct LabeledLines<'a> {
    lines: HashMap<Label, &'a str>,
}

impl<'a> LabeledLines<'a> {
    pub fn build(lines: &[&'a str]) -> Self {
        let mut found = HashMap::new();
        for line in lines {
            for label in Label::ALL {
                if !found.contains_key(&label) && line.contains(label.keyword()) {
                    found.insert(label, *line);
                }
            }
        }
        Self { lines: found }
    }

    pub fn get(&self, label: Label) -> Option<&'a str> {
        self.lines.get(&label).copied()
    }

    /// Labels that were not found, in canonical order
    pub fn missing(&self) -> Vec<Label> {
        Label::ALL.into_iter().filter(|l| !self.lines.contains_key(l)).collect()
    }
}

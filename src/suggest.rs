//! Suggestion engine — maps the latest message text to follow-up chips.
//!
//! An ordered, table-driven list of (category, keyword set) pairs is tested
//! against the lowercased, tokenized text. The first category with a
//! non-empty intersection wins and returns its fixed chip set; otherwise a
//! single default set applies. Ordering and keywords are data, so the whole
//! thing is exhaustively table-testable.

use std::collections::HashSet;

use tracing::debug;

use crate::session::SuggestionChip;

/// Maximum chips a rule may return.
const MAX_CHIPS: usize = 3;

/// One (category, keywords, chips) row of the suggestion table.
pub struct SuggestionRule {
    pub category: &'static str,
    keywords: HashSet<&'static str>,
    chips: Vec<SuggestionChip>,
}

/// Ordered first-match suggestion table.
pub struct SuggestionEngine {
    rules: Vec<SuggestionRule>,
    default_chips: Vec<SuggestionChip>,
}

impl SuggestionEngine {
    /// Build the shipped suggestion table.
    pub fn with_default_rules() -> Self {
        let rules = vec![
            SuggestionRule {
                category: "symptom",
                keywords: [
                    "symptom", "headache", "pain", "nausea", "dizzy", "dizziness", "fever",
                    "rash", "fatigue", "ache", "intensity", "severe", "mild",
                ]
                .into_iter()
                .collect(),
                chips: vec![
                    SuggestionChip::new("Log a symptom", "log-symptom"),
                    SuggestionChip::new("See a doctor", "schedule-appointment"),
                    SuggestionChip::new("Log medication", "log-medication"),
                ],
            },
            SuggestionRule {
                category: "appointment",
                keywords: ["appointment", "doctor", "specialist", "visit", "consultation"]
                    .into_iter()
                    .collect(),
                chips: vec![
                    SuggestionChip::new("Schedule an appointment", "schedule-appointment"),
                    SuggestionChip::new("Log a symptom", "log-symptom"),
                ],
            },
            SuggestionRule {
                category: "medication",
                keywords: ["medication", "meds", "pill", "dose", "doses", "tablet", "taken"]
                    .into_iter()
                    .collect(),
                chips: vec![
                    SuggestionChip::new("Log medication", "log-medication"),
                    SuggestionChip::new("Schedule an appointment", "schedule-appointment"),
                ],
            },
            SuggestionRule {
                category: "diet",
                keywords: [
                    "meal", "breakfast", "lunch", "dinner", "snack", "diet", "plan", "ate",
                    "eating", "food",
                ]
                .into_iter()
                .collect(),
                chips: vec![
                    SuggestionChip::new("Log a meal", "log-meal"),
                    SuggestionChip::new("Log water", "log-water"),
                ],
            },
            SuggestionRule {
                category: "exercise",
                keywords: ["exercise", "workout", "run", "walk", "gym", "session", "effort"]
                    .into_iter()
                    .collect(),
                chips: vec![
                    SuggestionChip::new("Log exercise", "log-exercise"),
                    SuggestionChip::new("Log water", "log-water"),
                ],
            },
            SuggestionRule {
                category: "sleep",
                keywords: ["sleep", "slept", "tired", "rested", "night", "insomnia", "nap"]
                    .into_iter()
                    .collect(),
                chips: vec![
                    SuggestionChip::new("Log sleep", "log-sleep"),
                    SuggestionChip::new("Log a symptom", "log-symptom"),
                ],
            },
            SuggestionRule {
                category: "water",
                keywords: ["water", "hydrate", "hydration", "intake", "bottle", "sips"]
                    .into_iter()
                    .collect(),
                chips: vec![
                    SuggestionChip::new("Log water", "log-water"),
                    SuggestionChip::new("Log a meal", "log-meal"),
                ],
            },
        ];

        Self {
            rules,
            default_chips: vec![
                SuggestionChip::new("Log a symptom", "log-symptom"),
                SuggestionChip::new("Log a meal", "log-meal"),
                SuggestionChip::new("Log sleep", "log-sleep"),
            ],
        }
    }

    /// Empty table (always the default chips), for tests.
    pub fn empty(default_chips: Vec<SuggestionChip>) -> Self {
        Self {
            rules: Vec::new(),
            default_chips,
        }
    }

    /// Map a message text to at most three follow-up chips.
    pub fn suggest(&self, text: &str) -> Vec<SuggestionChip> {
        let tokens = tokenize(text);
        for rule in &self.rules {
            if tokens.iter().any(|t| rule.keywords.contains(t.as_str())) {
                debug!(category = rule.category, "Suggestion rule matched");
                let mut chips = rule.chips.clone();
                chips.truncate(MAX_CHIPS);
                return chips;
            }
        }
        let mut chips = self.default_chips.clone();
        chips.truncate(MAX_CHIPS);
        chips
    }
}

/// Lowercased alphanumeric tokens of a message text.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

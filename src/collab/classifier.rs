//! Keyword intent classifier — a deterministic stand-in for the hosted
//! classification service, good enough for the demo REPL and for tests.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::collab::{Classification, IntentClassifier};

/// A single intent rule with a compiled pattern.
struct IntentRule {
    regex: Regex,
    action_id: &'static str,
    confidence: f32,
}

/// Ordered first-match keyword classifier.
pub struct KeywordClassifier {
    rules: Vec<IntentRule>,
}

impl KeywordClassifier {
    /// Create a classifier with the default intent patterns.
    pub fn default_rules() -> Self {
        let rules = vec![
            IntentRule {
                regex: Regex::new(
                    r"(?i)\b(headache|nausea|pain|dizzy|dizziness|fever|rash|symptom|hurts?)\b",
                )
                .unwrap(),
                action_id: "log-symptom",
                confidence: 0.9,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(appointment|doctor|specialist|book|schedule)\b")
                    .unwrap(),
                action_id: "schedule-appointment",
                confidence: 0.85,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(medication|meds?|pill|dose|tablet)\b").unwrap(),
                action_id: "log-medication",
                confidence: 0.85,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(ate|eating|meal|breakfast|lunch|dinner|snack|diet)\b")
                    .unwrap(),
                action_id: "log-meal",
                confidence: 0.8,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(ran|run|walk(ed)?|gym|workout|exercised?|yoga)\b")
                    .unwrap(),
                action_id: "log-exercise",
                confidence: 0.8,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(slept|sleep|tired|insomnia|nap)\b").unwrap(),
                action_id: "log-sleep",
                confidence: 0.8,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(water|hydration|drank|drink)\b").unwrap(),
                action_id: "log-water",
                confidence: 0.75,
            },
        ];
        Self { rules }
    }

    /// Empty classifier (never matches), for tests.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Classification {
        for rule in &self.rules {
            if rule.regex.is_match(text) {
                debug!(action_id = rule.action_id, "Text matched intent rule");
                return Classification {
                    action_id: Some(rule.action_id.to_string()),
                    confidence: rule.confidence,
                };
            }
        }
        Classification::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn classifies_symptom_text() {
        let classifier = KeywordClassifier::default_rules();
        let result = classifier.classify("I woke up with a headache").await;
        assert_eq!(result.action_id.as_deref(), Some("log-symptom"));
        assert!(result.confidence >= 0.9);
    }

    #[tokio::test]
    async fn first_rule_wins_on_overlap() {
        let classifier = KeywordClassifier::default_rules();
        // "pain" (symptom) appears before "doctor" (appointment) in rule order
        let result = classifier.classify("pain bad enough to see a doctor").await;
        assert_eq!(result.action_id.as_deref(), Some("log-symptom"));
    }

    #[tokio::test]
    async fn unmatched_text_is_unknown() {
        let classifier = KeywordClassifier::default_rules();
        let result = classifier.classify("what's the weather like").await;
        assert!(result.action_id.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn empty_classifier_never_matches() {
        let classifier = KeywordClassifier::empty();
        let result = classifier.classify("headache").await;
        assert!(result.action_id.is_none());
    }
}

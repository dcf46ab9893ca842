//! Deterministic analysis — turns a completed answer set into a summary.
//!
//! Each flow supplies three rule tables: numeric bucketing, an urgency
//! predicate, and a recommendation lookup with a mandatory default. The
//! synthesizer itself is a pure function over those tables; the only
//! non-deterministic field in its output is the embedded timestamp.

pub mod tables;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flows::AnswerMap;

/// One numeric bucket: values `<= upper` (after earlier buckets) map to
/// `label`.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub upper: f64,
    pub label: &'static str,
}

/// Numeric → category thresholds for one step's answer.
#[derive(Debug, Clone)]
pub struct BucketTable {
    /// Step whose numeric answer is bucketed.
    pub step_id: &'static str,
    /// Caption for the summary line ("Intensity", "Sleep duration").
    pub caption: &'static str,
    /// Ordered ascending by `upper`; first match wins.
    pub thresholds: Vec<Bucket>,
    /// Label for values above every threshold.
    pub fallback: &'static str,
}

impl BucketTable {
    /// Bucket the step's answer, if it was given and is numeric.
    pub fn categorize(&self, answers: &AnswerMap) -> Option<&'static str> {
        let value = answers.number(self.step_id)?;
        Some(
            self.thresholds
                .iter()
                .find(|b| value <= b.upper)
                .map(|b| b.label)
                .unwrap_or(self.fallback),
        )
    }
}

/// Boolean predicate over the whole answer map: urgent when the numeric
/// answer at `step_id` reaches `min`, or when any answer value is a member
/// of the red-flag token set.
#[derive(Debug, Clone)]
pub struct UrgencyRule {
    pub step_id: Option<&'static str>,
    pub min: f64,
    pub red_flags: HashSet<&'static str>,
}

impl UrgencyRule {
    /// An urgency rule that never fires.
    pub fn never() -> Self {
        Self {
            step_id: None,
            min: f64::INFINITY,
            red_flags: HashSet::new(),
        }
    }

    pub fn is_urgent(&self, answers: &AnswerMap) -> bool {
        let by_threshold = self
            .step_id
            .and_then(|id| answers.number(id))
            .is_some_and(|n| n >= self.min);
        let by_flag = !self.red_flags.is_empty()
            && answers
                .all_tokens()
                .iter()
                .any(|t| self.red_flags.contains(t.as_str()));
        by_threshold || by_flag
    }
}

/// Recommendation lookup keyed by the normalized primary answer.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    /// Step whose answer selects the recommendation.
    pub key_step: &'static str,
    pub entries: HashMap<&'static str, &'static str>,
    /// Mandatory default for unmatched keys.
    pub default: &'static str,
}

impl RecommendationTable {
    /// Normalized lookup key for the primary answer: lowercased text, the
    /// first item of a list, or a number rendered as text.
    fn key(&self, answers: &AnswerMap) -> Option<String> {
        let value = answers.get(self.key_step)?;
        let key = match value.as_list() {
            Some(items) => items.first()?.clone(),
            None => value.display(),
        };
        Some(key.trim().to_lowercase())
    }

    pub fn recommend(&self, answers: &AnswerMap) -> &'static str {
        self.key(answers)
            .and_then(|k| self.entries.get(k.as_str()).copied())
            .unwrap_or(self.default)
    }
}

/// The full rule set one flow feeds the synthesizer.
#[derive(Debug, Clone)]
pub struct AnalysisRules {
    /// Summary card title.
    pub title: &'static str,
    pub bucketing: BucketTable,
    pub urgency: UrgencyRule,
    pub recommendations: RecommendationTable,
}

/// A synthesized flow summary, rendered as a card in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCard {
    pub title: String,
    pub body: String,
    pub urgent: bool,
    /// The one allowed non-deterministic field.
    pub generated_at: DateTime<Utc>,
}

impl AnalysisRules {
    /// Map a completed answer set to a summary. Pure aside from the
    /// embedded timestamp.
    pub fn synthesize(&self, answers: &AnswerMap) -> SummaryCard {
        let mut lines = Vec::new();

        if let Some(category) = self.bucketing.categorize(answers) {
            let value = answers
                .number(self.bucketing.step_id)
                .map(|n| {
                    if n.fract() == 0.0 {
                        format!("{}", n as i64)
                    } else {
                        format!("{n}")
                    }
                })
                .unwrap_or_default();
            lines.push(format!("{}: {category} ({value})", self.bucketing.caption));
        }

        lines.push(self.recommendations.recommend(answers).to_string());

        let urgent = self.urgency.is_urgent(answers);
        if urgent {
            lines.push(
                "Some of what you logged may need prompt attention — consider contacting your care provider."
                    .to_string(),
            );
        }

        SummaryCard {
            title: self.title.to_string(),
            body: lines.join("\n"),
            urgent,
            generated_at: Utc::now(),
        }
    }
}

/// Per-flow rule registry consulted on flow completion.
pub struct AnalyticsRegistry {
    rules: HashMap<&'static str, AnalysisRules>,
}

impl AnalyticsRegistry {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn register(&mut self, flow_id: &'static str, rules: AnalysisRules) {
        self.rules.insert(flow_id, rules);
    }

    pub fn rules_for(&self, flow_id: &str) -> Option<&AnalysisRules> {
        self.rules.get(flow_id)
    }
}

impl Default for AnalyticsRegistry {
    fn default() -> Self {
        tables::default_registry()
    }
}

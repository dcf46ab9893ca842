//! Answer values and the per-run answer map.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// A single collected answer. Mirrors the host UI's wire shapes: a plain
/// string, a string array (multi-select), or a number (slider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// The value as a number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a string slice, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The value as a string list, if it is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Every string token carried by this value, lowercased. Numbers yield
    /// nothing. Used by red-flag membership checks.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Number(_) => Vec::new(),
            Self::Text(s) => vec![s.to_lowercase()],
            Self::List(items) => items.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Render the value the way a user turn echoes it.
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Append-only map of step id → answer for one flow run.
///
/// Entries keep insertion order (it is also presentation order for the
/// summary) and keys are unique for the duration of the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerMap {
    entries: Vec<(String, AnswerValue)>,
}

impl AnswerMap {
    /// Create an empty answer map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an answer. Rejects duplicate keys — answers are append-only.
    pub fn insert(
        &mut self,
        step_id: impl Into<String>,
        value: AnswerValue,
    ) -> Result<(), FlowError> {
        let step_id = step_id.into();
        if self.contains(&step_id) {
            return Err(FlowError::DuplicateAnswer { step_id });
        }
        self.entries.push((step_id, value));
        Ok(())
    }

    /// Look up an answer by step id.
    pub fn get(&self, step_id: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|(id, _)| id == step_id)
            .map(|(_, v)| v)
    }

    /// Whether an answer exists for this step id.
    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == step_id)
    }

    /// Convenience: the numeric answer at `step_id`, if present.
    pub fn number(&self, step_id: &str) -> Option<f64> {
        self.get(step_id).and_then(AnswerValue::as_number)
    }

    /// Convenience: the text answer at `step_id`, if present.
    pub fn text(&self, step_id: &str) -> Option<&str> {
        self.get(step_id).and_then(AnswerValue::as_text)
    }

    /// Number of answers collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no answers have been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v))
    }

    /// All lowercased string tokens across every answer.
    pub fn all_tokens(&self) -> Vec<String> {
        self.entries.iter().flat_map(|(_, v)| v.tokens()).collect()
    }
}

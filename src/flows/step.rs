//! Step definitions — prompt, input kind, validation, skip and suspend rules.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::flows::answers::{AnswerMap, AnswerValue};

/// One selectable option of a choice-style step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Canonical value stored in the answer map.
    pub value: String,
    /// Human-readable label rendered by the host UI.
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The declared input type of a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Pick exactly one option.
    ChoiceSingle { options: Vec<ChoiceOption> },
    /// Pick any subset, confirmed with a submit button.
    ChoiceMulti { options: Vec<ChoiceOption> },
    /// Free text, non-empty after trimming.
    FreeText,
    /// Numeric value within inclusive bounds.
    Slider { min: f64, max: f64, unit: String },
    /// Named day options plus a custom ISO (`YYYY-MM-DD`) date picker.
    DateChoice { options: Vec<ChoiceOption> },
    /// Anatomical region picker.
    BodyRegion { regions: Vec<ChoiceOption> },
}

impl StepKind {
    fn option_values(&self) -> Option<&[ChoiceOption]> {
        match self {
            Self::ChoiceSingle { options }
            | Self::ChoiceMulti { options }
            | Self::DateChoice { options } => Some(options),
            Self::BodyRegion { regions } => Some(regions),
            Self::FreeText | Self::Slider { .. } => None,
        }
    }
}

/// Pure function of the accumulated answers deciding whether a step is
/// omitted. Evaluated lazily each time the step is about to become current.
#[derive(Clone)]
pub struct SkipPredicate(Arc<dyn Fn(&AnswerMap) -> bool + Send + Sync>);

impl SkipPredicate {
    pub fn new(f: impl Fn(&AnswerMap) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// True when the step should be omitted given the answers known so far.
    pub fn evaluate(&self, answers: &AnswerMap) -> bool {
        (self.0)(answers)
    }
}

impl fmt::Debug for SkipPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SkipPredicate(..)")
    }
}

/// Auxiliary confirmation card rendered while the main flow is suspended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxCard {
    pub title: String,
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

/// Mid-flow branch: when the accepted answer equals `trigger`, the flow
/// suspends and renders `card`; the card's completion merges its selections
/// under `reserved_key` before the flow proceeds.
#[derive(Debug, Clone)]
pub struct SuspendRule {
    pub trigger: AnswerValue,
    pub reserved_key: String,
    pub card: AuxCard,
}

/// One prompt of a flow template.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    /// Unique within the owning flow.
    pub id: String,
    /// Prompt text rendered as the system turn.
    pub prompt: String,
    pub kind: StepKind,
    /// When present and true against the live answers, the step is omitted.
    pub skip: Option<SkipPredicate>,
    /// When present, a matching answer suspends the flow instead of
    /// advancing it directly.
    pub suspend: Option<SuspendRule>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind,
            skip: None,
            suspend: None,
        }
    }

    /// Attach a skip predicate.
    pub fn with_skip(mut self, skip: SkipPredicate) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Attach a suspend rule.
    pub fn with_suspend(mut self, suspend: SuspendRule) -> Self {
        self.suspend = Some(suspend);
        self
    }

    /// Whether this step is omitted given the answers known so far.
    pub fn skipped_by(&self, answers: &AnswerMap) -> bool {
        self.skip.as_ref().is_some_and(|p| p.evaluate(answers))
    }

    /// Validate an incoming value against this step's declared type.
    ///
    /// Returns the normalized value to store (free text is trimmed); a
    /// rejection leaves the step re-prompting with no mutation anywhere.
    pub fn validate(&self, value: &AnswerValue) -> Result<AnswerValue, ValidationError> {
        match &self.kind {
            StepKind::FreeText => {
                let text = value.as_text().ok_or(ValidationError::WrongType {
                    step_id: self.id.clone(),
                })?;
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyText {
                        step_id: self.id.clone(),
                    });
                }
                Ok(AnswerValue::Text(trimmed.to_string()))
            }
            StepKind::Slider { min, max, .. } => {
                let n = value.as_number().ok_or(ValidationError::WrongType {
                    step_id: self.id.clone(),
                })?;
                if n < *min || n > *max || !n.is_finite() {
                    return Err(ValidationError::OutOfRange {
                        step_id: self.id.clone(),
                        min: *min,
                        max: *max,
                        value: n,
                    });
                }
                Ok(AnswerValue::Number(n))
            }
            StepKind::ChoiceSingle { options } | StepKind::BodyRegion { regions: options } => {
                let text = value.as_text().ok_or(ValidationError::WrongType {
                    step_id: self.id.clone(),
                })?;
                if !options.iter().any(|o| o.value == text) {
                    return Err(ValidationError::UnknownOption {
                        step_id: self.id.clone(),
                        value: text.to_string(),
                    });
                }
                Ok(AnswerValue::Text(text.to_string()))
            }
            StepKind::ChoiceMulti { options } => {
                let items = value.as_list().ok_or(ValidationError::WrongType {
                    step_id: self.id.clone(),
                })?;
                if items.is_empty() {
                    return Err(ValidationError::EmptySelection {
                        step_id: self.id.clone(),
                    });
                }
                for item in items {
                    if !options.iter().any(|o| &o.value == item) {
                        return Err(ValidationError::UnknownOption {
                            step_id: self.id.clone(),
                            value: item.clone(),
                        });
                    }
                }
                Ok(AnswerValue::List(items.to_vec()))
            }
            StepKind::DateChoice { options } => {
                let text = value.as_text().ok_or(ValidationError::WrongType {
                    step_id: self.id.clone(),
                })?;
                if options.iter().any(|o| o.value == text) {
                    return Ok(AnswerValue::Text(text.to_string()));
                }
                if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() {
                    return Ok(AnswerValue::Text(text.to_string()));
                }
                Err(ValidationError::InvalidDate {
                    step_id: self.id.clone(),
                    value: text.to_string(),
                })
            }
        }
    }

    /// Resolve the display label for a stored value (choice kinds fall back
    /// to the raw value when no option matches, e.g. custom dates).
    pub fn display_value(&self, value: &AnswerValue) -> String {
        match (self.kind.option_values(), value) {
            (Some(options), AnswerValue::Text(text)) => options
                .iter()
                .find(|o| &o.value == text)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| text.clone()),
            (Some(options), AnswerValue::List(items)) => items
                .iter()
                .map(|item| {
                    options
                        .iter()
                        .find(|o| &o.value == item)
                        .map(|o| o.label.clone())
                        .unwrap_or_else(|| item.clone())
                })
                .collect::<Vec<_>>()
                .join(", "),
            (_, AnswerValue::Number(_)) => match &self.kind {
                StepKind::Slider { unit, .. } if !unit.is_empty() => {
                    format!("{} {}", value.display(), unit)
                }
                _ => value.display(),
            },
            _ => value.display(),
        }
    }
}

/// Serializable projection of a step for prompt messages — what the host UI
/// needs to render the input control, without the predicate closures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepView {
    pub step_id: String,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl From<&StepDefinition> for StepView {
    fn from(step: &StepDefinition) -> Self {
        Self {
            step_id: step.id.clone(),
            prompt: step.prompt.clone(),
            kind: step.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_step() -> StepDefinition {
        StepDefinition::new(
            "meal-type",
            "Which meal is this?",
            StepKind::ChoiceSingle {
                options: vec![
                    ChoiceOption::new("breakfast", "Breakfast"),
                    ChoiceOption::new("lunch", "Lunch"),
                ],
            },
        )
    }

    #[test]
    fn free_text_trims_and_rejects_empty() {
        let step = StepDefinition::new("notes", "Anything else?", StepKind::FreeText);
        let ok = step.validate(&"  slept badly  ".into()).unwrap();
        assert_eq!(ok, AnswerValue::Text("slept badly".into()));

        assert!(matches!(
            step.validate(&"   ".into()),
            Err(ValidationError::EmptyText { .. })
        ));
        assert!(matches!(
            step.validate(&AnswerValue::Number(1.0)),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn slider_bounds_inclusive() {
        let step = StepDefinition::new(
            "intensity",
            "How intense?",
            StepKind::Slider {
                min: 0.0,
                max: 10.0,
                unit: String::new(),
            },
        );
        assert!(step.validate(&AnswerValue::Number(0.0)).is_ok());
        assert!(step.validate(&AnswerValue::Number(10.0)).is_ok());
        assert!(matches!(
            step.validate(&AnswerValue::Number(10.5)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            step.validate(&AnswerValue::Number(f64::NAN)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn choice_membership() {
        let step = choice_step();
        assert!(step.validate(&"lunch".into()).is_ok());
        assert!(matches!(
            step.validate(&"dinner".into()),
            Err(ValidationError::UnknownOption { .. })
        ));
    }

    #[test]
    fn multi_choice_all_members() {
        let step = StepDefinition::new(
            "extras",
            "Anything else going on?",
            StepKind::ChoiceMulti {
                options: vec![
                    ChoiceOption::new("fever", "Fever"),
                    ChoiceOption::new("chills", "Chills"),
                ],
            },
        );
        assert!(
            step.validate(&AnswerValue::List(vec!["fever".into(), "chills".into()]))
                .is_ok()
        );
        assert!(matches!(
            step.validate(&AnswerValue::List(vec!["fever".into(), "cough".into()])),
            Err(ValidationError::UnknownOption { .. })
        ));
        assert!(matches!(
            step.validate(&AnswerValue::List(vec![])),
            Err(ValidationError::EmptySelection { .. })
        ));
    }

    #[test]
    fn date_choice_accepts_named_option_and_iso_date() {
        let step = StepDefinition::new(
            "when",
            "When did it start?",
            StepKind::DateChoice {
                options: vec![
                    ChoiceOption::new("today", "Today"),
                    ChoiceOption::new("yesterday", "Yesterday"),
                ],
            },
        );
        assert!(step.validate(&"today".into()).is_ok());
        assert!(step.validate(&"2026-08-01".into()).is_ok());
        assert!(matches!(
            step.validate(&"last tuesday".into()),
            Err(ValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            step.validate(&"2026-13-40".into()),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn skip_predicate_sees_live_answers() {
        let step = StepDefinition::new("region", "Where does it hurt?", StepKind::FreeText)
            .with_skip(SkipPredicate::new(|answers| {
                answers.text("symptom") == Some("nausea")
            }));

        let mut answers = AnswerMap::new();
        assert!(!step.skipped_by(&answers));
        answers.insert("symptom", "nausea".into()).unwrap();
        assert!(step.skipped_by(&answers));
    }

    #[test]
    fn display_value_prefers_labels() {
        let step = choice_step();
        assert_eq!(step.display_value(&"breakfast".into()), "Breakfast");
        // Unknown value falls back to the raw string (custom dates etc.)
        assert_eq!(step.display_value(&"2026-08-01".into()), "2026-08-01");

        let slider = StepDefinition::new(
            "amount",
            "How much water?",
            StepKind::Slider {
                min: 0.0,
                max: 3000.0,
                unit: "ml".into(),
            },
        );
        assert_eq!(slider.display_value(&AnswerValue::Number(500.0)), "500 ml");
    }

    #[test]
    fn step_view_serializes_control_shape() {
        let view = StepView::from(&choice_step());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"type\":\"choice_single\""));
        assert!(json.contains("\"step_id\":\"meal-type\""));
        assert!(json.contains("Breakfast"));
    }
}

//! Medication logging flow.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{ChoiceOption, SkipPredicate, StepDefinition, StepKind};

pub const FLOW_ID: &str = "log-medication";

pub mod steps {
    pub const MEDICATION: &str = "medication";
    pub const TAKEN: &str = "taken";
    pub const DOSES: &str = "doses";
    pub const SIDE_EFFECTS: &str = "side-effects";
}

/// Build the medication-logging template.
///
/// Doses and side-effects only make sense when the medication was actually
/// taken, so both carry a skip predicate on the `taken` answer.
pub fn definition() -> FlowDefinition {
    let skipped_when_not_taken =
        || SkipPredicate::new(|answers| answers.text(steps::TAKEN) == Some("no"));

    FlowDefinition::new(
        FLOW_ID,
        "Log medication",
        vec![
            StepDefinition::new(
                steps::MEDICATION,
                "Which medication is this about?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("ibuprofen", "Ibuprofen"),
                        ChoiceOption::new("paracetamol", "Paracetamol"),
                        ChoiceOption::new("antihistamine", "Antihistamine"),
                        ChoiceOption::new("vitamin-d", "Vitamin D"),
                        ChoiceOption::new("prescribed-other", "A prescribed medication"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::TAKEN,
                "Did you take it today?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("yes", "Yes"),
                        ChoiceOption::new("no", "Not yet"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::DOSES,
                "How many doses so far today?",
                StepKind::Slider {
                    min: 1.0,
                    max: 6.0,
                    unit: String::new(),
                },
            )
            .with_skip(skipped_when_not_taken()),
            StepDefinition::new(
                steps::SIDE_EFFECTS,
                "Any side effects?",
                StepKind::ChoiceMulti {
                    options: vec![
                        ChoiceOption::new("none", "None"),
                        ChoiceOption::new("drowsiness", "Drowsiness"),
                        ChoiceOption::new("nausea", "Nausea"),
                        ChoiceOption::new("headache", "Headache"),
                        ChoiceOption::new("rash", "Rash"),
                    ],
                },
            )
            .with_skip(skipped_when_not_taken()),
        ],
    )
}

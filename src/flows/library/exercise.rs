//! Exercise logging flow.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{ChoiceOption, StepDefinition, StepKind};

pub const FLOW_ID: &str = "log-exercise";

pub mod steps {
    pub const ACTIVITY: &str = "activity";
    pub const DURATION: &str = "duration";
    pub const EFFORT: &str = "effort";
    pub const NOTES: &str = "exercise-notes";
}

pub fn definition() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_ID,
        "Log exercise",
        vec![
            StepDefinition::new(
                steps::ACTIVITY,
                "What kind of activity was it?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("walking", "Walking"),
                        ChoiceOption::new("running", "Running"),
                        ChoiceOption::new("cycling", "Cycling"),
                        ChoiceOption::new("swimming", "Swimming"),
                        ChoiceOption::new("strength", "Strength training"),
                        ChoiceOption::new("yoga", "Yoga"),
                        ChoiceOption::new("other", "Something else"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::DURATION,
                "For how long?",
                StepKind::Slider {
                    min: 5.0,
                    max: 180.0,
                    unit: "min".into(),
                },
            ),
            StepDefinition::new(
                steps::EFFORT,
                "How hard did it feel?",
                StepKind::Slider {
                    min: 1.0,
                    max: 10.0,
                    unit: String::new(),
                },
            ),
            StepDefinition::new(
                steps::NOTES,
                "Anything worth remembering about this session?",
                StepKind::FreeText,
            ),
        ],
    )
}

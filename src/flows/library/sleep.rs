//! Sleep logging flow.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{ChoiceOption, StepDefinition, StepKind};

pub const FLOW_ID: &str = "log-sleep";

pub mod steps {
    pub const NIGHT: &str = "night";
    pub const HOURS: &str = "hours";
    pub const QUALITY: &str = "quality";
    pub const INTERRUPTIONS: &str = "interruptions";
}

pub fn definition() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_ID,
        "Log sleep",
        vec![
            StepDefinition::new(
                steps::NIGHT,
                "Which night is this for?",
                StepKind::DateChoice {
                    options: vec![
                        ChoiceOption::new("last-night", "Last night"),
                        ChoiceOption::new("night-before", "The night before"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::HOURS,
                "Roughly how many hours did you sleep?",
                StepKind::Slider {
                    min: 0.0,
                    max: 14.0,
                    unit: "h".into(),
                },
            ),
            StepDefinition::new(
                steps::QUALITY,
                "How rested do you feel?",
                StepKind::Slider {
                    min: 1.0,
                    max: 10.0,
                    unit: String::new(),
                },
            ),
            StepDefinition::new(
                steps::INTERRUPTIONS,
                "Did anything disturb your sleep?",
                StepKind::ChoiceMulti {
                    options: vec![
                        ChoiceOption::new("none", "Slept through"),
                        ChoiceOption::new("bathroom", "Bathroom breaks"),
                        ChoiceOption::new("noise", "Noise"),
                        ChoiceOption::new("stress", "Racing thoughts"),
                        ChoiceOption::new("pain", "Pain or discomfort"),
                    ],
                },
            ),
        ],
    )
}

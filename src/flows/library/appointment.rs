//! Appointment scheduling flow.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{ChoiceOption, StepDefinition, StepKind};

pub const FLOW_ID: &str = "schedule-appointment";

pub mod steps {
    pub const SPECIALTY: &str = "specialty";
    pub const DATE: &str = "appointment-date";
    pub const TIME_SLOT: &str = "time-slot";
    pub const REASON: &str = "reason";
}

pub fn definition() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_ID,
        "Schedule an appointment",
        vec![
            StepDefinition::new(
                steps::SPECIALTY,
                "Who would you like to see?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("general-practice", "General practitioner"),
                        ChoiceOption::new("dermatology", "Dermatologist"),
                        ChoiceOption::new("cardiology", "Cardiologist"),
                        ChoiceOption::new("physiotherapy", "Physiotherapist"),
                        ChoiceOption::new("nutrition", "Nutritionist"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::DATE,
                "When would suit you?",
                StepKind::DateChoice {
                    options: vec![
                        ChoiceOption::new("tomorrow", "Tomorrow"),
                        ChoiceOption::new("this-week", "Later this week"),
                        ChoiceOption::new("next-week", "Next week"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::TIME_SLOT,
                "Which part of the day?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("morning", "Morning"),
                        ChoiceOption::new("afternoon", "Afternoon"),
                        ChoiceOption::new("evening", "Evening"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::REASON,
                "What's the visit about?",
                StepKind::FreeText,
            ),
        ],
    )
}

//! Water intake logging flow — intentionally a single step.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{StepDefinition, StepKind};

pub const FLOW_ID: &str = "log-water";

pub mod steps {
    pub const AMOUNT: &str = "amount";
}

pub fn definition() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_ID,
        "Log water",
        vec![StepDefinition::new(
            steps::AMOUNT,
            "How much water have you had?",
            StepKind::Slider {
                min: 0.0,
                max: 4000.0,
                unit: "ml".into(),
            },
        )],
    )
}

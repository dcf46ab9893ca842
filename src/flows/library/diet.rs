//! Diet logging flow — carries the suspend/resume branch.

use crate::flows::definition::FlowDefinition;
use crate::flows::step::{AuxCard, ChoiceOption, StepDefinition, StepKind, SuspendRule};

pub const FLOW_ID: &str = "log-meal";

pub mod steps {
    pub const MEAL_TYPE: &str = "meal-type";
    pub const PLAN_ADHERENCE: &str = "diet-plan-adherence";
    pub const FOODS: &str = "foods";
    pub const PORTION: &str = "portion";
}

/// Reserved key the auxiliary confirmation merges its selections under.
pub const PLAN_ITEMS_KEY: &str = "diet-plan-adherence.items";

/// Build the diet-logging template.
///
/// Answering "yes" to the plan-adherence step does not advance the cursor:
/// the flow suspends and an auxiliary multi-select card asks which planned
/// items were actually eaten. Only the card's completion resumes the flow.
pub fn definition() -> FlowDefinition {
    FlowDefinition::new(
        FLOW_ID,
        "Log a meal",
        vec![
            StepDefinition::new(
                steps::MEAL_TYPE,
                "Which meal is this?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("breakfast", "Breakfast"),
                        ChoiceOption::new("lunch", "Lunch"),
                        ChoiceOption::new("dinner", "Dinner"),
                        ChoiceOption::new("snack", "Snack"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::PLAN_ADHERENCE,
                "Did you follow your plan for this meal?",
                StepKind::ChoiceSingle {
                    options: vec![
                        ChoiceOption::new("yes", "Yes"),
                        ChoiceOption::new("partially", "Partially"),
                        ChoiceOption::new("no", "No"),
                    ],
                },
            )
            .with_suspend(SuspendRule {
                trigger: "yes".into(),
                reserved_key: PLAN_ITEMS_KEY.to_string(),
                card: AuxCard {
                    title: "Nice — plan followed".to_string(),
                    prompt: "Which planned items did you have?".to_string(),
                    options: vec![
                        ChoiceOption::new("protein", "Protein"),
                        ChoiceOption::new("vegetables", "Vegetables"),
                        ChoiceOption::new("whole-grains", "Whole grains"),
                        ChoiceOption::new("fruit", "Fruit"),
                        ChoiceOption::new("water-goal", "Water goal"),
                    ],
                },
            }),
            StepDefinition::new(steps::FOODS, "What did you eat?", StepKind::FreeText),
            StepDefinition::new(
                steps::PORTION,
                "How full do you feel?",
                StepKind::Slider {
                    min: 1.0,
                    max: 5.0,
                    unit: String::new(),
                },
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::answers::AnswerValue;

    #[test]
    fn adherence_step_has_suspend_rule() {
        let flow = definition();
        let step = flow.step(steps::PLAN_ADHERENCE).unwrap();
        let rule = step.suspend.as_ref().unwrap();
        assert_eq!(rule.trigger, AnswerValue::Text("yes".into()));
        assert_eq!(rule.reserved_key, PLAN_ITEMS_KEY);
        assert!(!rule.card.options.is_empty());
    }

    #[test]
    fn only_yes_triggers_suspension() {
        let flow = definition();
        let rule = flow
            .step(steps::PLAN_ADHERENCE)
            .unwrap()
            .suspend
            .clone()
            .unwrap();
        assert_eq!(rule.trigger, AnswerValue::Text("yes".into()));
        assert_ne!(rule.trigger, AnswerValue::Text("no".into()));
        assert_ne!(rule.trigger, AnswerValue::Text("partially".into()));
    }

    #[test]
    fn reserved_key_is_not_a_step_id() {
        let flow = definition();
        assert!(!flow.has_step(PLAN_ITEMS_KEY));
    }
}

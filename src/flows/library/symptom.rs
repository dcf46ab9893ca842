//! Symptom logging flow.

use crate::flows::definition::FlowDefinition;
use crate::flows::library::symptoms;
use crate::flows::step::{ChoiceOption, SkipPredicate, StepDefinition, StepKind};

pub const FLOW_ID: &str = "log-symptom";

/// Step ids referenced by rule tables and tests.
pub mod steps {
    pub const SYMPTOM: &str = "symptom";
    pub const BODY_LOCATION: &str = "body-location";
    pub const INTENSITY: &str = "intensity";
    pub const ONSET: &str = "onset";
    pub const ADDITIONAL: &str = "additional-symptoms";
    pub const NOTES: &str = "notes";
}

/// Build the symptom-logging template.
///
/// The body-location step carries the one skip predicate that depends on a
/// mid-flow answer: it is omitted when the chosen symptom's gallery entry
/// has `has_body_location = false`, and stays put while the symptom is
/// still unanswered.
pub fn definition() -> FlowDefinition {
    let symptom_options: Vec<ChoiceOption> = symptoms::GALLERY
        .iter()
        .map(|s| ChoiceOption::new(s.id, s.label))
        .collect();

    FlowDefinition::new(
        FLOW_ID,
        "Log a symptom",
        vec![
            StepDefinition::new(
                steps::SYMPTOM,
                "What symptom would you like to log?",
                StepKind::ChoiceSingle {
                    options: symptom_options,
                },
            ),
            StepDefinition::new(
                steps::BODY_LOCATION,
                "Where on your body is it?",
                StepKind::BodyRegion {
                    regions: vec![
                        ChoiceOption::new("head", "Head"),
                        ChoiceOption::new("neck", "Neck"),
                        ChoiceOption::new("chest", "Chest"),
                        ChoiceOption::new("abdomen", "Abdomen"),
                        ChoiceOption::new("upper-back", "Upper back"),
                        ChoiceOption::new("lower-back", "Lower back"),
                        ChoiceOption::new("arms", "Arms"),
                        ChoiceOption::new("legs", "Legs"),
                    ],
                },
            )
            .with_skip(SkipPredicate::new(|answers| {
                answers
                    .text(steps::SYMPTOM)
                    .is_some_and(|id| !symptoms::has_body_location(id))
            })),
            StepDefinition::new(
                steps::INTENSITY,
                "How intense is it right now?",
                StepKind::Slider {
                    min: 0.0,
                    max: 10.0,
                    unit: String::new(),
                },
            ),
            StepDefinition::new(
                steps::ONSET,
                "When did it start?",
                StepKind::DateChoice {
                    options: vec![
                        ChoiceOption::new("today", "Today"),
                        ChoiceOption::new("yesterday", "Yesterday"),
                        ChoiceOption::new("few-days-ago", "A few days ago"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::ADDITIONAL,
                "Anything else going on alongside it?",
                StepKind::ChoiceMulti {
                    options: vec![
                        ChoiceOption::new("none", "Nothing else"),
                        ChoiceOption::new("fever", "Fever"),
                        ChoiceOption::new("chills", "Chills"),
                        ChoiceOption::new("fatigue", "Fatigue"),
                        ChoiceOption::new("nausea", "Nausea"),
                        ChoiceOption::new("chest-pain", "Chest pain"),
                        ChoiceOption::new("shortness-of-breath", "Shortness of breath"),
                    ],
                },
            ),
            StepDefinition::new(
                steps::NOTES,
                "Any notes you'd like to add?",
                StepKind::FreeText,
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::answers::AnswerMap;
    use crate::flows::definition::materialize;

    #[test]
    fn body_location_included_for_headache() {
        let flow = definition();
        let mut answers = AnswerMap::new();
        answers.insert(steps::SYMPTOM, "headache".into()).unwrap();

        let ids: Vec<&str> = materialize(&flow, &answers)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert!(ids.contains(&steps::BODY_LOCATION));
    }

    #[test]
    fn body_location_omitted_for_nausea() {
        let flow = definition();
        let mut answers = AnswerMap::new();
        answers.insert(steps::SYMPTOM, "nausea".into()).unwrap();

        let ids: Vec<&str> = materialize(&flow, &answers)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert!(!ids.contains(&steps::BODY_LOCATION));
        assert_eq!(ids.first(), Some(&steps::INTENSITY));
    }

    #[test]
    fn body_location_stays_while_symptom_unanswered() {
        let flow = definition();
        let step = flow.step(steps::BODY_LOCATION).unwrap();
        assert!(!step.skipped_by(&AnswerMap::new()));
    }

    #[test]
    fn every_gallery_symptom_is_an_option() {
        let flow = definition();
        for info in symptoms::GALLERY {
            assert!(
                flow.step(steps::SYMPTOM)
                    .unwrap()
                    .validate(&info.id.into())
                    .is_ok(),
                "{} should be a valid symptom option",
                info.id
            );
        }
    }
}

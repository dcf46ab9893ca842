//! The shipped per-flow rule tables.

use std::collections::HashMap;

use crate::analysis::{
    AnalysisRules, AnalyticsRegistry, Bucket, BucketTable, RecommendationTable, UrgencyRule,
};
use crate::flows::library::{appointment, diet, exercise, medication, sleep, symptom, water};

/// Build the registry covering all seven shipped flows.
pub fn default_registry() -> AnalyticsRegistry {
    let mut registry = AnalyticsRegistry::empty();
    registry.register(symptom::FLOW_ID, symptom_rules());
    registry.register(diet::FLOW_ID, diet_rules());
    registry.register(exercise::FLOW_ID, exercise_rules());
    registry.register(sleep::FLOW_ID, sleep_rules());
    registry.register(water::FLOW_ID, water_rules());
    registry.register(medication::FLOW_ID, medication_rules());
    registry.register(appointment::FLOW_ID, appointment_rules());
    registry
}

fn symptom_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Symptom summary",
        bucketing: BucketTable {
            step_id: symptom::steps::INTENSITY,
            caption: "Intensity",
            thresholds: vec![
                Bucket { upper: 3.0, label: "mild" },
                Bucket { upper: 6.0, label: "moderate" },
                Bucket { upper: 8.0, label: "severe" },
            ],
            fallback: "very-severe",
        },
        urgency: UrgencyRule {
            step_id: Some(symptom::steps::INTENSITY),
            min: 8.0,
            red_flags: ["chest-pain", "shortness-of-breath"].into_iter().collect(),
        },
        recommendations: RecommendationTable {
            key_step: symptom::steps::SYMPTOM,
            entries: [
                (
                    "headache",
                    "Hydrate, rest your eyes, and note whether it follows screen time or missed meals.",
                ),
                (
                    "nausea",
                    "Small sips of water and bland food tend to help; note anything you ate beforehand.",
                ),
                (
                    "back-pain",
                    "Gentle movement beats bed rest for most back pain; avoid heavy lifting today.",
                ),
                (
                    "fatigue",
                    "Look at last night's sleep entry and today's water intake — both often explain it.",
                ),
                (
                    "fever",
                    "Rest, fluids, and a temperature check every few hours are the right first steps.",
                ),
            ]
            .into_iter()
            .collect(),
            default: "Logged. Watch how it develops and log again if anything changes.",
        },
    }
}

fn diet_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Meal summary",
        bucketing: BucketTable {
            step_id: diet::steps::PORTION,
            caption: "Fullness",
            thresholds: vec![
                Bucket { upper: 2.0, label: "light" },
                Bucket { upper: 4.0, label: "satisfied" },
            ],
            fallback: "overfull",
        },
        urgency: UrgencyRule::never(),
        recommendations: RecommendationTable {
            key_step: diet::steps::PLAN_ADHERENCE,
            entries: [
                ("yes", "Plan followed — keep the streak going."),
                (
                    "partially",
                    "Partly on plan still counts; tomorrow's meal is a fresh start.",
                ),
                (
                    "no",
                    "Off-plan meals happen. Logging them honestly is what makes the plan work.",
                ),
            ]
            .into_iter()
            .collect(),
            default: "Meal recorded.",
        },
    }
}

fn exercise_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Exercise summary",
        bucketing: BucketTable {
            step_id: exercise::steps::EFFORT,
            caption: "Effort",
            thresholds: vec![
                Bucket { upper: 3.0, label: "easy" },
                Bucket { upper: 6.0, label: "moderate" },
                Bucket { upper: 8.0, label: "vigorous" },
            ],
            fallback: "maximal",
        },
        urgency: UrgencyRule::never(),
        recommendations: RecommendationTable {
            key_step: exercise::steps::ACTIVITY,
            entries: [
                ("running", "Nice run — remember to stretch your calves and hydrate."),
                ("strength", "Leave this muscle group a rest day before loading it again."),
                ("yoga", "Good recovery choice; it pairs well with an earlier bedtime."),
            ]
            .into_iter()
            .collect(),
            default: "Session logged. Consistency matters more than any single workout.",
        },
    }
}

fn sleep_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Sleep summary",
        bucketing: BucketTable {
            step_id: sleep::steps::HOURS,
            caption: "Sleep duration",
            thresholds: vec![
                Bucket { upper: 5.0, label: "short" },
                Bucket { upper: 7.0, label: "borderline" },
                Bucket { upper: 9.0, label: "recommended" },
            ],
            fallback: "long",
        },
        urgency: UrgencyRule::never(),
        recommendations: RecommendationTable {
            key_step: sleep::steps::INTERRUPTIONS,
            entries: [
                ("none", "An undisturbed night — whatever you did yesterday evening, repeat it."),
                ("stress", "Racing thoughts respond well to a short wind-down routine before bed."),
                ("noise", "Earplugs or white noise are cheap experiments worth trying."),
                ("pain", "If pain keeps waking you, it's worth raising at your next appointment."),
            ]
            .into_iter()
            .collect(),
            default: "Sleep recorded.",
        },
    }
}

fn water_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Water summary",
        bucketing: BucketTable {
            step_id: water::steps::AMOUNT,
            caption: "Intake",
            thresholds: vec![
                Bucket { upper: 750.0, label: "low" },
                Bucket { upper: 1500.0, label: "getting-there" },
                Bucket { upper: 2500.0, label: "on-target" },
            ],
            fallback: "high",
        },
        urgency: UrgencyRule::never(),
        recommendations: RecommendationTable {
            key_step: water::steps::AMOUNT,
            entries: HashMap::new(),
            default: "Keep a bottle within reach — steady sips beat catching up in the evening.",
        },
    }
}

fn medication_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Medication summary",
        bucketing: BucketTable {
            step_id: medication::steps::DOSES,
            caption: "Doses today",
            thresholds: vec![
                Bucket { upper: 1.0, label: "single" },
                Bucket { upper: 3.0, label: "regular" },
            ],
            fallback: "frequent",
        },
        urgency: UrgencyRule {
            step_id: Some(medication::steps::DOSES),
            min: 5.0,
            red_flags: ["rash", "shortness-of-breath"].into_iter().collect(),
        },
        recommendations: RecommendationTable {
            key_step: medication::steps::TAKEN,
            entries: [
                ("yes", "Taken and logged — the history view keeps the full picture."),
                (
                    "no",
                    "Not taken yet. A recurring reminder at your usual time can help.",
                ),
            ]
            .into_iter()
            .collect(),
            default: "Medication entry recorded.",
        },
    }
}

fn appointment_rules() -> AnalysisRules {
    AnalysisRules {
        title: "Appointment request",
        // No numeric step in this flow; the table is inert and the summary
        // simply has no category line.
        bucketing: BucketTable {
            step_id: appointment::steps::DATE,
            caption: "Lead time",
            thresholds: vec![],
            fallback: "scheduled",
        },
        urgency: UrgencyRule::never(),
        recommendations: RecommendationTable {
            key_step: appointment::steps::SPECIALTY,
            entries: [
                (
                    "general-practice",
                    "Bring your recent symptom log — it makes the consultation faster.",
                ),
                (
                    "dermatology",
                    "Photos of how the skin changes day to day are useful to bring along.",
                ),
                (
                    "cardiology",
                    "Note anything that triggers symptoms (exertion, stress, meals) before the visit.",
                ),
                (
                    "physiotherapy",
                    "Wear comfortable clothes and note which movements hurt.",
                ),
                (
                    "nutrition",
                    "A week of meal logs gives the nutritionist the most to work with.",
                ),
            ]
            .into_iter()
            .collect(),
            default: "Request noted — you'll get a confirmation once a slot is held.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::AnswerMap;

    #[test]
    fn registry_covers_every_flow() {
        let registry = default_registry();
        for id in [
            symptom::FLOW_ID,
            diet::FLOW_ID,
            exercise::FLOW_ID,
            sleep::FLOW_ID,
            water::FLOW_ID,
            medication::FLOW_ID,
            appointment::FLOW_ID,
        ] {
            assert!(registry.rules_for(id).is_some(), "missing rules for {id}");
        }
    }

    #[test]
    fn intensity_nine_is_very_severe_and_urgent() {
        let rules = symptom_rules();
        let mut answers = AnswerMap::new();
        answers.insert(symptom::steps::INTENSITY, 9.0.into()).unwrap();

        assert_eq!(rules.bucketing.categorize(&answers), Some("very-severe"));
        assert!(rules.urgency.is_urgent(&answers));
    }

    #[test]
    fn intensity_two_is_mild_and_not_urgent() {
        let rules = symptom_rules();
        let mut answers = AnswerMap::new();
        answers.insert(symptom::steps::INTENSITY, 2.0.into()).unwrap();

        assert_eq!(rules.bucketing.categorize(&answers), Some("mild"));
        assert!(!rules.urgency.is_urgent(&answers));
    }

    #[test]
    fn red_flag_additional_symptom_is_urgent() {
        let rules = symptom_rules();
        let mut answers = AnswerMap::new();
        answers.insert(symptom::steps::INTENSITY, 3.0.into()).unwrap();
        answers
            .insert(
                symptom::steps::ADDITIONAL,
                crate::flows::AnswerValue::List(vec!["shortness-of-breath".into()]),
            )
            .unwrap();
        assert!(rules.urgency.is_urgent(&answers));
    }

    #[test]
    fn symptom_recommendation_keys_off_canonical_id() {
        let rules = symptom_rules();
        let mut answers = AnswerMap::new();
        answers.insert(symptom::steps::SYMPTOM, "headache".into()).unwrap();
        assert!(rules.recommendations.recommend(&answers).contains("Hydrate"));

        let mut other = AnswerMap::new();
        other.insert(symptom::steps::SYMPTOM, "rash".into()).unwrap();
        assert_eq!(
            rules.recommendations.recommend(&other),
            "Logged. Watch how it develops and log again if anything changes."
        );
    }

    #[test]
    fn appointment_summary_has_no_category_line() {
        let rules = appointment_rules();
        let mut answers = AnswerMap::new();
        answers
            .insert(appointment::steps::SPECIALTY, "cardiology".into())
            .unwrap();
        answers
            .insert(appointment::steps::DATE, "tomorrow".into())
            .unwrap();

        let card = rules.synthesize(&answers);
        assert!(!card.body.contains("Lead time"));
        assert!(card.body.contains("triggers"));
    }

    #[test]
    fn diet_rules_never_urgent() {
        let rules = diet_rules();
        let mut answers = AnswerMap::new();
        answers.insert(diet::steps::PORTION, 5.0.into()).unwrap();
        assert!(!rules.urgency.is_urgent(&answers));
    }
}

//! Flow templates — an ordered sequence of steps under one id.

use crate::flows::answers::AnswerMap;
use crate::flows::step::StepDefinition;

/// A named, ordered template of steps collecting one structured record.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    /// Stable identifier, also the action id that launches the flow.
    pub id: String,
    /// Short human title ("Log a symptom").
    pub title: String,
    /// The static step list. Runtime materialization never reorders it.
    pub steps: Vec<StepDefinition>,
}

impl FlowDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps,
        }
    }

    /// Find a step by id.
    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Whether `step_id` names a step of this flow.
    pub fn has_step(&self, step_id: &str) -> bool {
        self.step(step_id).is_some()
    }
}

/// Compute the concrete runtime step subsequence for a given preset/skip
/// configuration: every step whose id is not already answered and whose
/// skip predicate evaluates false against the answers known so far.
///
/// Order-preserving by construction. Skip predicates are re-evaluated
/// against the live answer map each time the runtime advances, so this is a
/// snapshot, not a frozen plan.
pub fn materialize<'a>(flow: &'a FlowDefinition, answers: &AnswerMap) -> Vec<&'a StepDefinition> {
    flow.steps
        .iter()
        .filter(|step| !answers.contains(&step.id) && !step.skipped_by(answers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::step::{SkipPredicate, StepKind};

    fn sample_flow() -> FlowDefinition {
        FlowDefinition::new(
            "sample",
            "Sample",
            vec![
                StepDefinition::new("a", "A?", StepKind::FreeText),
                StepDefinition::new("b", "B?", StepKind::FreeText).with_skip(SkipPredicate::new(
                    |answers| answers.text("a") == Some("skip-b"),
                )),
                StepDefinition::new("c", "C?", StepKind::FreeText),
            ],
        )
    }

    #[test]
    fn materialize_excludes_preset_keys() {
        let flow = sample_flow();
        let mut presets = AnswerMap::new();
        presets.insert("a", "done".into()).unwrap();

        let steps = materialize(&flow, &presets);
        let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn materialize_applies_skip_predicates() {
        let flow = sample_flow();
        let mut answers = AnswerMap::new();
        answers.insert("a", "skip-b".into()).unwrap();

        let ids: Vec<&str> = materialize(&flow, &answers)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn materialize_is_order_preserving_subsequence() {
        let flow = sample_flow();
        let full: Vec<&str> = flow.steps.iter().map(|s| s.id.as_str()).collect();
        let materialized: Vec<&str> = materialize(&flow, &AnswerMap::new())
            .iter()
            .map(|s| s.id.as_str())
            .collect();

        let mut cursor = 0;
        for id in &materialized {
            let pos = full[cursor..]
                .iter()
                .position(|f| f == id)
                .expect("materialized id must appear in static order");
            cursor += pos + 1;
        }
        assert_eq!(materialized, full);
    }

    #[test]
    fn step_lookup() {
        let flow = sample_flow();
        assert!(flow.has_step("b"));
        assert!(!flow.has_step("z"));
        assert_eq!(flow.step("c").unwrap().prompt, "C?");
    }
}

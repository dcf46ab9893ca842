//! Flow state machine — the tagged-variant aggregate behind a session's
//! "at most one active flow" rule.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::collab::UploadedFile;
use crate::flows::{AnswerMap, FlowDefinition, StepDefinition};

/// Where a session stands with respect to guided flows.
///
/// `Idle --start--> Active --answer--> Active | Suspended | Completed`;
/// `Suspended --resume--> Active | Completed`; any state `--abandon--> Idle`.
/// `Completed` is transient: it auto-clears to `Idle` once the summary has
/// been emitted.
#[derive(Debug)]
pub enum FlowState {
    Idle,
    Active(ActiveFlow),
    Suspended {
        flow: ActiveFlow,
        token: Uuid,
    },
    /// Flow finished; the summary (possibly behind a simulated processing
    /// delay) has not been appended yet.
    Completed {
        flow_id: String,
        answers: AnswerMap,
        attachments: Vec<UploadedFile>,
    },
}

impl FlowState {
    /// Short tag for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active(_) => "step_active",
            Self::Suspended { .. } => "suspended",
            Self::Completed { .. } => "completed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What `ActiveFlow::begin` found to do.
pub enum BeginOutcome {
    /// There is at least one step to ask; the cursor rests on it.
    Active(ActiveFlow),
    /// Presets and skips left nothing to ask.
    AlreadyComplete {
        answers: AnswerMap,
        attachments: Vec<UploadedFile>,
    },
}

/// A flow mid-run: definition handle, cursor into the static step list,
/// and the answers accumulated so far (presets included).
#[derive(Debug, Clone)]
pub struct ActiveFlow {
    pub flow: Arc<FlowDefinition>,
    /// Index into `flow.steps`. Always references a step whose skip
    /// predicate evaluated false at the time it became current.
    pub cursor: usize,
    pub answers: AnswerMap,
    /// Opaque attachment context handed through to completion.
    pub attachments: Vec<UploadedFile>,
}

impl ActiveFlow {
    /// Materialize a run from a template and preset answers.
    ///
    /// Presets whose key names no step of the flow, or whose value fails
    /// the step's own validation, are dropped with a warning — a bad preset
    /// must degrade to asking the question, never to a wedged flow.
    pub fn begin(
        flow: Arc<FlowDefinition>,
        presets: AnswerMap,
        attachments: Vec<UploadedFile>,
    ) -> BeginOutcome {
        let mut answers = AnswerMap::new();
        for (key, value) in presets.iter() {
            let Some(step) = flow.step(key) else {
                warn!(flow_id = %flow.id, step_id = key, "Preset names no step; dropped");
                continue;
            };
            match step.validate(value) {
                // Duplicate keys cannot happen here: presets is itself a map
                Ok(normalized) => {
                    let _ = answers.insert(key, normalized);
                }
                Err(e) => {
                    warn!(flow_id = %flow.id, step_id = key, error = %e, "Invalid preset; dropped");
                }
            }
        }

        match next_pending(&flow, &answers, 0) {
            Some(cursor) => BeginOutcome::Active(Self {
                flow,
                cursor,
                answers,
                attachments,
            }),
            None => BeginOutcome::AlreadyComplete {
                answers,
                attachments,
            },
        }
    }

    /// The step at the cursor.
    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.flow.steps.get(self.cursor)
    }

    /// Move the cursor to the next pending step, re-evaluating skip
    /// predicates against the updated answers. Returns the new current
    /// step, or `None` when the flow is finished.
    pub fn advance(&mut self) -> Option<&StepDefinition> {
        match next_pending(&self.flow, &self.answers, self.cursor + 1) {
            Some(cursor) => {
                self.cursor = cursor;
                self.current_step()
            }
            None => None,
        }
    }
}

/// Scan the static step list from `from` for the first step that is
/// neither answered nor skipped given the answers known so far.
fn next_pending(flow: &FlowDefinition, answers: &AnswerMap, from: usize) -> Option<usize> {
    flow.steps
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, step)| !answers.contains(&step.id) && !step.skipped_by(answers))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::step::{SkipPredicate, StepKind};
    use crate::flows::StepDefinition;

    fn flow() -> Arc<FlowDefinition> {
        Arc::new(FlowDefinition::new(
            "test-flow",
            "Test",
            vec![
                StepDefinition::new("first", "First?", StepKind::FreeText),
                StepDefinition::new("second", "Second?", StepKind::FreeText).with_skip(
                    SkipPredicate::new(|a| a.text("first") == Some("skip-second")),
                ),
                StepDefinition::new("third", "Third?", StepKind::FreeText),
            ],
        ))
    }

    #[test]
    fn begin_rests_on_first_pending_step() {
        let BeginOutcome::Active(run) = ActiveFlow::begin(flow(), AnswerMap::new(), vec![]) else {
            panic!("expected an active run");
        };
        assert_eq!(run.current_step().unwrap().id, "first");
    }

    #[test]
    fn begin_with_presets_skips_preset_steps() {
        let mut presets = AnswerMap::new();
        presets.insert("first", "hello".into()).unwrap();

        let BeginOutcome::Active(run) = ActiveFlow::begin(flow(), presets, vec![]) else {
            panic!("expected an active run");
        };
        assert_eq!(run.current_step().unwrap().id, "second");
        assert_eq!(run.answers.text("first"), Some("hello"));
    }

    #[test]
    fn begin_with_everything_preset_is_already_complete() {
        let mut presets = AnswerMap::new();
        presets.insert("first", "a".into()).unwrap();
        presets.insert("second", "b".into()).unwrap();
        presets.insert("third", "c".into()).unwrap();

        match ActiveFlow::begin(flow(), presets, vec![]) {
            BeginOutcome::AlreadyComplete { answers, .. } => assert_eq!(answers.len(), 3),
            BeginOutcome::Active(_) => panic!("expected AlreadyComplete"),
        }
    }

    #[test]
    fn invalid_and_unknown_presets_are_dropped() {
        let mut presets = AnswerMap::new();
        presets.insert("first", crate::flows::AnswerValue::Number(3.0)).unwrap();
        presets.insert("no-such-step", "x".into()).unwrap();

        let BeginOutcome::Active(run) = ActiveFlow::begin(flow(), presets, vec![]) else {
            panic!("expected an active run");
        };
        // The bad preset degrades to asking the question
        assert_eq!(run.current_step().unwrap().id, "first");
        assert!(run.answers.is_empty());
    }

    #[test]
    fn advance_reevaluates_skip_predicates_lazily() {
        let BeginOutcome::Active(mut run) = ActiveFlow::begin(flow(), AnswerMap::new(), vec![])
        else {
            panic!("expected an active run");
        };

        // Mid-flow answer makes the second step skippable
        run.answers.insert("first", "skip-second".into()).unwrap();
        let next = run.advance().unwrap();
        assert_eq!(next.id, "third");
    }

    #[test]
    fn advance_past_end_finishes() {
        let BeginOutcome::Active(mut run) = ActiveFlow::begin(flow(), AnswerMap::new(), vec![])
        else {
            panic!("expected an active run");
        };
        run.answers.insert("first", "a".into()).unwrap();
        run.answers.insert("second", "b".into()).unwrap();
        run.answers.insert("third", "c".into()).unwrap();
        assert!(run.advance().is_none());
    }

    #[test]
    fn state_labels() {
        assert_eq!(FlowState::Idle.label(), "idle");
        assert!(FlowState::Idle.is_idle());
    }
}

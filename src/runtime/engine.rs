//! The flow runtime — advances a session's active flow as answers arrive.
//!
//! All five entry points serialize on the session mutex; every condition
//! short of a programming error fails soft and leaves the session in a
//! valid, renderable state.

use std::sync::{Arc, Weak};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::AnalyticsRegistry;
use crate::collab::{EventSink, TrackedEvent, UploadedFile, record};
use crate::config::EngineConfig;
use crate::error::{FlowError, Result};
use crate::flows::{AnswerMap, AnswerValue, FlowCatalog, StepView};
use crate::runtime::state::{ActiveFlow, BeginOutcome, FlowState};
use crate::session::{Message, Session};
use crate::suggest::SuggestionEngine;

/// The step state machine plus everything it needs to render turns and
/// finish flows. Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct FlowRuntime {
    catalog: Arc<FlowCatalog>,
    analytics: Arc<AnalyticsRegistry>,
    suggestions: Arc<SuggestionEngine>,
    sink: Arc<dyn EventSink>,
    config: EngineConfig,
    session: Arc<Mutex<Session>>,
}

impl FlowRuntime {
    pub fn new(
        catalog: Arc<FlowCatalog>,
        analytics: Arc<AnalyticsRegistry>,
        suggestions: Arc<SuggestionEngine>,
        sink: Arc<dyn EventSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            analytics,
            suggestions,
            sink,
            config,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    /// The session this runtime drives.
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    /// The flow catalog (shared with the router).
    pub fn catalog(&self) -> Arc<FlowCatalog> {
        Arc::clone(&self.catalog)
    }

    /// The suggestion engine (shared with the router).
    pub fn suggestions(&self) -> Arc<SuggestionEngine> {
        Arc::clone(&self.suggestions)
    }

    /// Start a flow, optionally with preset answers and attachment context.
    ///
    /// An unknown flow id starts nothing; callers treat the error as a
    /// silent no-op. A flow already in progress is abandoned first.
    pub async fn start_flow(
        &self,
        flow_id: &str,
        presets: AnswerMap,
        attachments: Vec<UploadedFile>,
    ) -> Result<()> {
        let Some(flow) = self.catalog.lookup(flow_id) else {
            debug!(flow_id, "Unknown flow id; nothing started");
            return Err(FlowError::UnknownFlow {
                flow_id: flow_id.to_string(),
            }
            .into());
        };

        let mut session = self.session.lock().await;
        if !session.state.is_idle() {
            self.clear_active_flow(&mut session);
        }

        info!(flow_id = %flow.id, "Flow started");
        record(
            &self.sink,
            TrackedEvent::new(
                session.id,
                "flow_started",
                serde_json::json!({ "flow_id": &flow.id, "presets": presets.len() }),
            ),
        );

        match ActiveFlow::begin(flow, presets, attachments) {
            BeginOutcome::Active(run) => {
                let view = run.current_step().map(StepView::from);
                if let Some(view) = view {
                    session.thread.push_interactive(Message::prompt(view));
                }
                session.state = FlowState::Active(run);
            }
            BeginOutcome::AlreadyComplete {
                answers,
                attachments,
            } => {
                debug!(flow_id, "Materialized step list is empty; completing immediately");
                self.finish(&mut session, flow_id.to_string(), answers, attachments);
            }
        }
        Ok(())
    }

    /// Accept an answer for the step at the cursor.
    ///
    /// Answers for any other step are a no-op; a value that fails the
    /// step's type constraint is rejected without mutating anything and
    /// the step keeps re-prompting.
    pub async fn answer(&self, step_id: &str, value: AnswerValue) -> Result<()> {
        let mut session = self.session.lock().await;

        let FlowState::Active(run) = &session.state else {
            debug!(step_id, state = session.state.label(), "No active step; answer ignored");
            return Ok(());
        };
        let Some(step) = run.current_step() else {
            warn!(step_id, "Active flow has no current step; answer ignored");
            return Ok(());
        };
        if step.id != step_id {
            debug!(
                step_id,
                current = %step.id,
                "Answer does not target the current step; ignored"
            );
            return Ok(());
        }

        // Validation failures leave the prompt interactive and the session
        // untouched.
        let normalized = step.validate(&value)?;
        let echo = step.display_value(&normalized);
        let suspend = step
            .suspend
            .clone()
            .filter(|rule| rule.trigger == normalized);
        let answered_id = step.id.clone();

        let FlowState::Active(mut run) =
            std::mem::replace(&mut session.state, FlowState::Idle)
        else {
            unreachable!("state checked above");
        };

        session.thread.freeze_interactive();
        session.thread.push(Message::user_text(echo));
        if let Err(e) = run.answers.insert(&answered_id, normalized) {
            // Cannot happen while the cursor invariant holds
            warn!(step_id = %answered_id, error = %e, "Answer not stored");
        }
        record(
            &self.sink,
            TrackedEvent::new(
                session.id,
                "answer_recorded",
                serde_json::json!({ "flow_id": &run.flow.id, "step_id": &answered_id }),
            ),
        );

        if let Some(rule) = suspend {
            let token = Uuid::new_v4();
            info!(flow_id = %run.flow.id, step_id = %answered_id, "Flow suspended for confirmation");
            session.thread.push_interactive(Message::aux_prompt(rule.card));
            session.state = FlowState::Suspended { flow: run, token };
            return Ok(());
        }

        self.advance_or_finish(&mut session, run);
        Ok(())
    }

    /// Complete the auxiliary confirmation card of a suspended flow.
    ///
    /// Merges the selections under the suspend rule's reserved key, then
    /// proceeds exactly as a normal answer completion would. Only the
    /// card's own completion handler holds a valid token; anything else is
    /// rejected without mutation.
    pub async fn resume(&self, token: Uuid, selections: Vec<String>) -> Result<()> {
        let mut session = self.session.lock().await;

        let FlowState::Suspended { token: expected, flow } = &session.state else {
            debug!(%token, state = session.state.label(), "No suspended flow; resume ignored");
            return Err(FlowError::StaleContinuation { token }.into());
        };
        if *expected != token {
            warn!(%token, "Continuation token mismatch; resume ignored");
            return Err(FlowError::StaleContinuation { token }.into());
        }

        let Some(rule) = flow.current_step().and_then(|s| s.suspend.clone()) else {
            warn!("Suspended flow lost its suspend rule; resume ignored");
            return Err(FlowError::StaleContinuation { token }.into());
        };

        // The auxiliary card validates like a multi-select step.
        if selections.is_empty() {
            return Err(crate::error::ValidationError::EmptySelection {
                step_id: rule.reserved_key.clone(),
            }
            .into());
        }
        for item in &selections {
            if !rule.card.options.iter().any(|o| &o.value == item) {
                return Err(crate::error::ValidationError::UnknownOption {
                    step_id: rule.reserved_key.clone(),
                    value: item.clone(),
                }
                .into());
            }
        }

        let FlowState::Suspended { flow: mut run, .. } =
            std::mem::replace(&mut session.state, FlowState::Idle)
        else {
            unreachable!("state checked above");
        };

        let labels: Vec<String> = selections
            .iter()
            .map(|item| {
                rule.card
                    .options
                    .iter()
                    .find(|o| &o.value == item)
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| item.clone())
            })
            .collect();

        session.thread.freeze_interactive();
        session.thread.push(Message::user_text(labels.join(", ")));
        if let Err(e) = run
            .answers
            .insert(&rule.reserved_key, AnswerValue::List(selections))
        {
            warn!(key = %rule.reserved_key, error = %e, "Auxiliary answers not stored");
        }
        info!(flow_id = %run.flow.id, "Flow resumed");
        record(
            &self.sink,
            TrackedEvent::new(
                session.id,
                "flow_resumed",
                serde_json::json!({ "flow_id": &run.flow.id, "key": &rule.reserved_key }),
            ),
        );

        self.advance_or_finish(&mut session, run);
        Ok(())
    }

    /// Drop the active flow without emitting a summary. No partial answer
    /// map leaks into the next flow.
    pub async fn abandon(&self) {
        let mut session = self.session.lock().await;
        if session.state.is_idle() {
            return;
        }
        self.clear_active_flow(&mut session);
    }

    fn clear_active_flow(&self, session: &mut Session) {
        info!(state = session.state.label(), "Flow abandoned");
        session.thread.freeze_interactive();
        session.state = FlowState::Idle;
        session.bump_generation();
        record(
            &self.sink,
            TrackedEvent::new(session.id, "flow_abandoned", serde_json::json!({})),
        );
    }

    /// Move to the next pending step, or finish the flow.
    fn advance_or_finish(&self, session: &mut Session, mut run: ActiveFlow) {
        let view = run.advance().map(StepView::from);
        match view {
            Some(view) => {
                session.thread.push_interactive(Message::prompt(view));
                session.state = FlowState::Active(run);
            }
            None => {
                let flow_id = run.flow.id.clone();
                self.finish(session, flow_id, run.answers, run.attachments);
            }
        }
    }

    /// Park the completed answers and emit the summary, either now or
    /// after the simulated processing delay.
    fn finish(
        &self,
        session: &mut Session,
        flow_id: String,
        answers: AnswerMap,
        attachments: Vec<UploadedFile>,
    ) {
        info!(flow_id = %flow_id, answers = answers.len(), "Flow completed");
        record(
            &self.sink,
            TrackedEvent::new(
                session.id,
                "flow_completed",
                serde_json::json!({
                    "flow_id": &flow_id,
                    "answers": &answers,
                    "attachments": &attachments,
                }),
            ),
        );
        session.state = FlowState::Completed {
            flow_id,
            answers,
            attachments,
        };

        match self.config.summary_delay_ms {
            None => emit_summary(&self.analytics, &self.suggestions, self.config.max_chips, session),
            Some((lo, hi)) => {
                let delay = if hi > lo {
                    rand::thread_rng().gen_range(lo..=hi)
                } else {
                    lo
                };
                let generation = session.generation();
                let weak = Arc::downgrade(&self.session);
                let analytics = Arc::clone(&self.analytics);
                let suggestions = Arc::clone(&self.suggestions);
                let max_chips = self.config.max_chips;
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    summary_timer_fired(weak, analytics, suggestions, max_chips, generation).await;
                });
            }
        }
    }
}

/// Delayed-summary timer body. A torn-down session (dropped `Arc`) or a
/// bumped generation (flow abandoned or replaced meanwhile) turns the
/// callback into a no-op.
async fn summary_timer_fired(
    weak: Weak<Mutex<Session>>,
    analytics: Arc<AnalyticsRegistry>,
    suggestions: Arc<SuggestionEngine>,
    max_chips: usize,
    generation: u64,
) {
    let Some(session) = weak.upgrade() else {
        debug!("Summary timer fired after session teardown; dropped");
        return;
    };
    let mut session = session.lock().await;
    if session.generation() != generation {
        debug!("Summary timer fired for a cleared flow; dropped");
        return;
    }
    emit_summary(&analytics, &suggestions, max_chips, &mut session);
}

/// Turn the parked `Completed` state into a summary message and return the
/// session to idle.
fn emit_summary(
    analytics: &AnalyticsRegistry,
    suggestions: &SuggestionEngine,
    max_chips: usize,
    session: &mut Session,
) {
    if !matches!(session.state, FlowState::Completed { .. }) {
        debug!(state = session.state.label(), "No completed flow to summarize");
        return;
    }
    let FlowState::Completed { flow_id, answers, .. } =
        std::mem::replace(&mut session.state, FlowState::Idle)
    else {
        unreachable!("state checked above");
    };

    let Some(rules) = analytics.rules_for(&flow_id) else {
        warn!(flow_id = %flow_id, "No analysis rules registered; generic summary emitted");
        session.thread.push(Message::system_text("Entry recorded."));
        session.bump_generation();
        return;
    };

    let card = rules.synthesize(&answers);
    let mut chips = suggestions.suggest(&card.body);
    chips.truncate(max_chips);
    debug!(flow_id = %flow_id, urgent = card.urgent, chips = chips.len(), "Summary emitted");
    session.thread.push(Message::summary(card).with_chips(chips));
    session.bump_generation();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::NoopSink;
    use crate::flows::library::water;
    use crate::session::MessageBody;

    fn runtime(config: EngineConfig) -> FlowRuntime {
        FlowRuntime::new(
            Arc::new(FlowCatalog::with_default_flows()),
            Arc::new(AnalyticsRegistry::default()),
            Arc::new(SuggestionEngine::with_default_rules()),
            Arc::new(NoopSink),
            config,
        )
    }

    #[tokio::test]
    async fn unknown_flow_starts_nothing() {
        let rt = runtime(EngineConfig::default());
        let err = rt
            .start_flow("log-mood", AnswerMap::new(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Flow(FlowError::UnknownFlow { .. })
        ));
        let session = rt.session();
        let session = session.lock().await;
        assert!(session.state.is_idle());
        assert!(session.thread.is_empty());
    }

    #[tokio::test]
    async fn single_step_flow_runs_to_summary() {
        let rt = runtime(EngineConfig::default());
        rt.start_flow(water::FLOW_ID, AnswerMap::new(), vec![])
            .await
            .unwrap();
        rt.answer(water::steps::AMOUNT, AnswerValue::Number(1800.0))
            .await
            .unwrap();

        let session = rt.session();
        let session = session.lock().await;
        assert!(session.state.is_idle());
        let last = session.thread.last().unwrap();
        assert!(matches!(last.body, MessageBody::Summary { .. }));
        assert!(!last.chips.is_empty());
    }

    #[tokio::test]
    async fn fully_preset_flow_completes_immediately() {
        let rt = runtime(EngineConfig::default());
        let mut presets = AnswerMap::new();
        presets
            .insert(water::steps::AMOUNT, AnswerValue::Number(500.0))
            .unwrap();
        rt.start_flow(water::FLOW_ID, presets, vec![]).await.unwrap();

        let session = rt.session();
        let session = session.lock().await;
        assert!(session.state.is_idle());
        assert!(matches!(
            session.thread.last().unwrap().body,
            MessageBody::Summary { .. }
        ));
    }

    #[tokio::test]
    async fn delayed_summary_is_cancelled_by_abandon() {
        let rt = runtime(EngineConfig {
            summary_delay_ms: Some((10, 10)),
            ..EngineConfig::default()
        });
        rt.start_flow(water::FLOW_ID, AnswerMap::new(), vec![])
            .await
            .unwrap();
        rt.answer(water::steps::AMOUNT, AnswerValue::Number(1000.0))
            .await
            .unwrap();

        // Flow is parked in Completed awaiting its timer; abandoning bumps
        // the generation so the timer must no-op.
        rt.abandon().await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        let session = rt.session();
        let session = session.lock().await;
        assert!(session.state.is_idle());
        assert!(
            !session
                .thread
                .iter()
                .any(|m| matches!(m.body, MessageBody::Summary { .. })),
            "cancelled timer must not emit a summary"
        );
    }

    #[tokio::test]
    async fn delayed_summary_lands_when_undisturbed() {
        let rt = runtime(EngineConfig {
            summary_delay_ms: Some((5, 5)),
            ..EngineConfig::default()
        });
        rt.start_flow(water::FLOW_ID, AnswerMap::new(), vec![])
            .await
            .unwrap();
        rt.answer(water::steps::AMOUNT, AnswerValue::Number(1000.0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let session = rt.session();
        let session = session.lock().await;
        assert!(session.state.is_idle());
        assert!(matches!(
            session.thread.last().unwrap().body,
            MessageBody::Summary { .. }
        ));
    }
}

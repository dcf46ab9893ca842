//! Action router — top-level dispatch from an action id to a flow start or
//! a canned response.
//!
//! Three tiers, consulted in order: the flow catalog, a direct-response
//! table, and a generic fallback. Unknown ids never error. A smart-entry
//! variant seeds preset answers from a caller-chosen gallery item so the
//! matching selection step is skipped via the normal preset path.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::collab::{IntentClassifier, UploadedFile};
use crate::flows::{AnswerMap, AnswerValue};
use crate::runtime::FlowRuntime;
use crate::session::Message;

/// A gallery item chosen before the flow starts: which step it answers and
/// the item's canonical id (never its display label).
#[derive(Debug, Clone)]
pub struct GalleryTarget {
    pub step_id: String,
    pub value: String,
}

/// Context handed along with a dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Smart-entry target, if the action came from a gallery pick.
    pub target: Option<GalleryTarget>,
    /// Opaque attachment context, passed through to flow completion.
    pub attachments: Vec<UploadedFile>,
}

impl DispatchContext {
    /// Smart-entry context for a gallery pick.
    pub fn with_target(step_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: Some(GalleryTarget {
                step_id: step_id.into(),
                value: value.into(),
            }),
            attachments: Vec::new(),
        }
    }
}

/// Which tier handled a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    FlowStarted,
    DirectResponse,
    Fallback,
}

/// Three-tier action dispatcher.
pub struct ActionRouter {
    runtime: FlowRuntime,
    direct: HashMap<&'static str, &'static str>,
    fallback_text: &'static str,
    classifier: Option<Arc<dyn IntentClassifier>>,
    intent_threshold: f32,
}

impl ActionRouter {
    pub fn new(
        runtime: FlowRuntime,
        classifier: Option<Arc<dyn IntentClassifier>>,
        intent_threshold: f32,
    ) -> Self {
        Self {
            runtime,
            direct: default_direct_responses(),
            fallback_text: "Got it — tell me a bit more, or pick one of the options below.",
            classifier,
            intent_threshold,
        }
    }

    /// Resolve an action id: flow catalog, then the direct-response table,
    /// then the fallback acknowledgment. Never errors.
    pub async fn dispatch(&self, action_id: &str, context: DispatchContext) -> DispatchOutcome {
        if self.runtime.catalog().has(action_id) {
            // Starting any flow abandons whatever was mid-progress.
            self.runtime.abandon().await;

            let mut presets = AnswerMap::new();
            if let Some(target) = &context.target {
                // Duplicate keys impossible in a fresh map
                let _ = presets.insert(&target.step_id, AnswerValue::Text(target.value.clone()));
            }
            if let Err(e) = self
                .runtime
                .start_flow(action_id, presets, context.attachments)
                .await
            {
                // Lookup raced a catalog change; treat like an unknown id
                debug!(action_id, error = %e, "Flow start failed; falling back");
                self.append_fallback().await;
                return DispatchOutcome::Fallback;
            }
            return DispatchOutcome::FlowStarted;
        }

        if let Some(text) = self.direct.get(action_id) {
            info!(action_id, "Direct response");
            let session = self.runtime.session();
            let mut session = session.lock().await;
            session.thread.push(Message::system_text(*text));
            return DispatchOutcome::DirectResponse;
        }

        debug!(action_id, "Unknown action id; acknowledging");
        self.append_fallback().await;
        DispatchOutcome::Fallback
    }

    /// Classify free text and dispatch the inferred action, if the
    /// classifier is confident enough; otherwise acknowledge.
    pub async fn dispatch_text(&self, text: &str) -> DispatchOutcome {
        if let Some(classifier) = &self.classifier {
            let classification = classifier.classify(text).await;
            if classification.confidence >= self.intent_threshold
                && let Some(action_id) = classification.action_id
            {
                info!(
                    action_id = %action_id,
                    confidence = classification.confidence,
                    "Free text classified"
                );
                return self.dispatch(&action_id, DispatchContext::default()).await;
            }
            debug!(
                confidence = classification.confidence,
                "Classification below threshold; acknowledging"
            );
        }
        self.append_fallback().await;
        DispatchOutcome::Fallback
    }

    async fn append_fallback(&self) {
        let chips = {
            let suggestions = self.runtime.suggestions();
            suggestions.suggest("")
        };
        let session = self.runtime.session();
        let mut session = session.lock().await;
        session
            .thread
            .push(Message::system_text(self.fallback_text).with_chips(chips));
    }
}

/// The canned informational responses (tier two).
fn default_direct_responses() -> HashMap<&'static str, &'static str> {
    [
        (
            "help",
            "You can log symptoms, meals, exercise, sleep, water, and medication, \
             or schedule an appointment — just pick an option or describe what's going on.",
        ),
        (
            "emergency-info",
            "If this is an emergency, call your local emergency number now. \
             This app cannot help with urgent medical situations.",
        ),
        (
            "data-privacy",
            "Your entries stay in your health record and are only shared with \
             clinicians you explicitly connect.",
        ),
    ]
    .into_iter()
    .collect()
}

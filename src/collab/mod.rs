//! Collaborator contracts — persistence, intent classification, uploads.
//!
//! Everything here is implemented *outside* the core. The engine only ever
//! talks to these traits, fire-and-forget for the sink: failures are caught
//! at the call boundary and never unwind into the flow runtime.

pub mod classifier;

pub use classifier::KeywordClassifier;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::SinkError;

/// One telemetry/persistence event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub session_id: Uuid,
    /// Event kind, e.g. "flow_started", "flow_completed", "flow_abandoned".
    pub kind: String,
    pub payload: serde_json::Value,
    pub trace_id: Uuid,
}

impl TrackedEvent {
    pub fn new(session_id: Uuid, kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            session_id,
            kind: kind.into(),
            payload,
            trace_id: Uuid::new_v4(),
        }
    }
}

/// Persistence/telemetry collaborator. The engine never awaits submission
/// inside a flow transition and never consults the result.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn submit(&self, event: TrackedEvent) -> Result<(), SinkError>;
}

/// Sink that drops everything (the default).
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn submit(&self, _event: TrackedEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that records events in memory, for tests.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<TrackedEvent>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything submitted so far.
    pub async fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn submit(&self, event: TrackedEvent) -> Result<(), SinkError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Sink that always fails, for exercising the swallow-at-boundary path.
pub struct FailingSink;

#[async_trait]
impl EventSink for FailingSink {
    async fn submit(&self, _event: TrackedEvent) -> Result<(), SinkError> {
        Err(SinkError::Unavailable {
            reason: "sink offline".to_string(),
        })
    }
}

/// Fire-and-forget submission: spawn, log failures at debug, move on.
pub fn record(sink: &Arc<dyn EventSink>, event: TrackedEvent) {
    let sink = Arc::clone(sink);
    tokio::spawn(async move {
        if let Err(e) = sink.submit(event).await {
            debug!(error = %e, "Event sink submission failed (discarded)");
        }
    });
}

/// Result of classifying free text into an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub action_id: Option<String>,
    pub confidence: f32,
}

impl Classification {
    /// The "no idea" classification.
    pub fn unknown() -> Self {
        Self {
            action_id: None,
            confidence: 0.0,
        }
    }
}

/// Optional intent-classification collaborator. The router only acts on a
/// classification whose confidence crosses the configured threshold.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Classification;
}

/// An uploaded attachment. Opaque to the core: passed through into a
/// flow's completion payload, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_records() {
        let sink = MemorySink::new();
        let session_id = Uuid::new_v4();
        sink.submit(TrackedEvent::new(
            session_id,
            "flow_started",
            serde_json::json!({"flow_id": "log-water"}),
        ))
        .await
        .unwrap();

        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "flow_started");
        assert_eq!(events[0].session_id, session_id);
    }

    #[tokio::test]
    async fn record_swallows_failures() {
        let sink: Arc<dyn EventSink> = Arc::new(FailingSink);
        record(
            &sink,
            TrackedEvent::new(Uuid::new_v4(), "flow_started", serde_json::json!({})),
        );
        // Nothing to assert beyond "does not panic / propagate": give the
        // spawned task a moment to run its error path.
        tokio::task::yield_now().await;
    }

    #[test]
    fn uploaded_file_wire_shape() {
        let file = UploadedFile {
            url: "https://cdn.example/scan.pdf".into(),
            name: "scan.pdf".into(),
            mime: "application/pdf".into(),
            size: 12_345,
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"type\":\"application/pdf\""));
        let parsed: UploadedFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, file);
    }
}

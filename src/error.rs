//! Error types for the companion core.

use uuid::Uuid;

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Event sink error: {0}")]
    Sink(#[from] SinkError),
}

/// A rejected answer. The active step stays interactive and re-prompts;
/// nothing in the session is mutated.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Step {step_id} expects free text, got an empty value")]
    EmptyText { step_id: String },

    #[error("Step {step_id} expects a number between {min} and {max}, got {value}")]
    OutOfRange {
        step_id: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Step {step_id} has no option '{value}'")]
    UnknownOption { step_id: String, value: String },

    #[error("Step {step_id} expects at least one selection")]
    EmptySelection { step_id: String },

    #[error("Step {step_id} expects a named option or an ISO date, got '{value}'")]
    InvalidDate { step_id: String, value: String },

    #[error("Step {step_id} got a value of the wrong type")]
    WrongType { step_id: String },
}

/// Flow lifecycle errors. Most conditions in the runtime fail soft (no-op
/// with a log line); these cover the few cases callers may want to observe.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unknown flow: {flow_id}")]
    UnknownFlow { flow_id: String },

    #[error("Duplicate answer for step {step_id}")]
    DuplicateAnswer { step_id: String },

    #[error("No suspended flow matches continuation {token}")]
    StaleContinuation { token: Uuid },
}

/// Errors from the persistence/telemetry collaborator. Always swallowed at
/// the fire-and-forget boundary, never retried by the core.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Submit failed: {reason}")]
    SubmitFailed { reason: String },

    #[error("Sink unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;

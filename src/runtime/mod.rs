//! Flow runtime: the state machine and the engine that drives it.

pub mod engine;
pub mod state;

pub use engine::FlowRuntime;
pub use state::{ActiveFlow, BeginOutcome, FlowState};

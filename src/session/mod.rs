//! Session model — the transcript plus at most one active flow.

pub mod message;
pub mod thread;

pub use message::{Message, MessageBody, Origin, SuggestionChip};
pub use thread::MessageThread;

use uuid::Uuid;

use crate::runtime::state::FlowState;

/// One user session: an append-only message log and at most one active
/// flow. Mutated only by discrete, serialized interaction events.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub thread: MessageThread,
    pub state: FlowState,
    /// Bumped whenever the flow state is cleared. Delayed tasks capture the
    /// value at spawn time and no-op on mismatch, so a timer can never
    /// write into a session whose flow has moved on.
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            thread: MessageThread::new(),
            state: FlowState::Idle,
            generation: 0,
        }
    }

    /// Current run generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate outstanding delayed work (flow cleared or torn down).
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

//! Configuration types.

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Simulated processing delay before a summary card appears, as an
    /// inclusive (min, max) range in milliseconds. `None` emits the summary
    /// synchronously (the default for tests and headless use).
    pub summary_delay_ms: Option<(u64, u64)>,
    /// Minimum classifier confidence before a free-text intent is acted on.
    pub intent_threshold: f32,
    /// Maximum number of suggestion chips attached to any message.
    pub max_chips: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            summary_delay_ms: None,
            intent_threshold: 0.6,
            max_chips: 3,
        }
    }
}

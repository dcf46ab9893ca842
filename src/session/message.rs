//! Message data model — the turns a session transcript is made of.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::SummaryCard;
use crate::flows::{AuxCard, StepView};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    System,
}

/// A follow-up action chip attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionChip {
    /// Label shown on the chip.
    pub label: String,
    /// Action id dispatched when the chip is tapped.
    pub action_id: String,
}

impl SuggestionChip {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action_id: action_id.into(),
        }
    }
}

/// What a message carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text turn.
    Text { text: String },
    /// An interactive step prompt (choice, slider, date, region picker).
    Prompt { step: StepView },
    /// The auxiliary confirmation card of a suspended flow.
    AuxPrompt { card: AuxCard },
    /// A completed flow's summary card.
    Summary { card: SummaryCard },
}

/// One turn in the session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub body: MessageBody,
    /// At most one message in a session is interactive at any time; earlier
    /// ones are frozen once answered.
    pub interactive: bool,
    /// Follow-up chips, attached to summary and fallback turns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chips: Vec<SuggestionChip>,
}

impl Message {
    fn new(origin: Origin, body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            timestamp: Utc::now(),
            body,
            interactive: false,
            chips: Vec::new(),
        }
    }

    /// A frozen system text turn.
    pub fn system_text(text: impl Into<String>) -> Self {
        Self::new(Origin::System, MessageBody::Text { text: text.into() })
    }

    /// A frozen user turn echoing an accepted answer.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Origin::User, MessageBody::Text { text: text.into() })
    }

    /// An interactive step prompt.
    pub fn prompt(step: StepView) -> Self {
        let mut msg = Self::new(Origin::System, MessageBody::Prompt { step });
        msg.interactive = true;
        msg
    }

    /// The interactive auxiliary confirmation card.
    pub fn aux_prompt(card: AuxCard) -> Self {
        let mut msg = Self::new(Origin::System, MessageBody::AuxPrompt { card });
        msg.interactive = true;
        msg
    }

    /// A frozen summary card.
    pub fn summary(card: SummaryCard) -> Self {
        Self::new(Origin::System, MessageBody::Summary { card })
    }

    /// Attach suggestion chips.
    pub fn with_chips(mut self, chips: Vec<SuggestionChip>) -> Self {
        self.chips = chips;
        self
    }

    /// The plain text of this turn, if it has one.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            _ => None,
        }
    }
}

//! Care Companion — guided flow orchestration core.
//!
//! Drives multi-step, conditionally-branching data-collection dialogs
//! (symptom, diet, exercise, sleep, water, and medication logging, plus
//! appointment scheduling) rendered as turns in a chat transcript.

pub mod analysis;
pub mod collab;
pub mod config;
pub mod error;
pub mod flows;
pub mod router;
pub mod runtime;
pub mod session;
pub mod suggest;

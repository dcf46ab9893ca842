//! Flow data model: steps, templates, answers, and the catalog.

pub mod answers;
pub mod catalog;
pub mod definition;
pub mod library;
pub mod step;

pub use answers::{AnswerMap, AnswerValue};
pub use catalog::FlowCatalog;
pub use definition::{FlowDefinition, materialize};
pub use step::{AuxCard, ChoiceOption, SkipPredicate, StepDefinition, StepKind, StepView, SuspendRule};

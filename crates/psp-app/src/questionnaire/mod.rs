//! Questionnaire controllers
//!
//! Organized into submodules:
//! - `catalog`: Declarative question tables and visibility rules
//! - `form`: Intake form answers, drafts and submission
//! - `tabs`: Tab menu of the questionnaire landing pages

pub mod catalog;
pub mod form;
pub mod tabs;

#[cfg(test)]
mod tests;

pub use catalog::{QuestionCatalog, QuestionKind, QuestionSpec, VisibilityRule};
pub use form::{DraftSaveOutcome, IntakeForm, IntakePopup, LoadedDraft, QuestionSlot};
pub use tabs::{Assessment, QuestionnaireTabs};

//! # psp-core - Core Domain Types
//!
//! Foundation crate for the PSP portal controllers. Provides domain types,
//! the error taxonomy and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`QuestionId`], [`Answer`], [`DraftRecord`], [`QuestionRecord`] - Questionnaire state
//! - [`UploadedFile`], [`PersistedAttachment`] - Case attachments
//! - [`CaseRecord`], [`CaseType`], [`CaseStatus`] - Support cases
//! - [`CurrentUser`], [`PatientStatus`], [`NotificationTask`] - Account data
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use psp_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout the portal crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use types::{
    Answer, AssessmentCounts, AttachmentKind, CaseRecord, CaseRequest, CaseStatus, CaseType,
    CurrentUser, DraftRecord, Enrollee, EnrollmentDates, LinkedAccount, NotificationTask,
    PatientStatus, PersistedAttachment, PrescriptionRequest, QuestionId, QuestionRecord,
    ResponseSubmission, UploadedFile, UserProfile,
};

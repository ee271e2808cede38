//! Service layer for the portal controllers
//!
//! This module defines the seams between controllers and the outside world:
//! - `ports` - Page redirection and the session error slot
//! - `remote` - Async traits for the remote data boundary
//!
//! Controllers receive these as generic parameters, so hosts can provide
//! real browser/network implementations while tests use in-memory fakes.

pub mod ports;
pub mod remote;

pub use ports::{ErrorReportingPort, NavigationPort, PageHost};
pub use remote::{
    AccountService, AssessmentService, CaseService, LocalAccountService, LocalAssessmentService,
    LocalCaseService, LocalNotificationService, NotificationService,
};

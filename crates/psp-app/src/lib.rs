//! psp-app - Page controllers for the PSP portal
//!
//! Form controllers, the attachment validator and site routing for the portal
//! pages. Controllers are plain structs driven by user events; every side
//! effect goes through the service traits and ports in [`services`].

pub mod cases;
pub mod config;
pub mod dashboard;
pub mod navigation;
pub mod profile;
pub mod questionnaire;
pub mod routing;
pub mod services;
pub mod upload;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export primary types
pub use cases::{CaseForm, CaseKind, PrescriptionForm};
pub use config::{load_settings, Settings};
pub use dashboard::DashboardNotifications;
pub use navigation::{MenuSection, NavigationBar};
pub use profile::{CaregiverProfileMenu, NotificationSettingsLink, PrescriptionLanding};
pub use questionnaire::{IntakeForm, QuestionCatalog, QuestionnaireTabs};
pub use routing::{RouteResolver, SiteBase, SiteVariant};
pub use services::{ErrorReportingPort, NavigationPort, PageHost};
pub use upload::{SelectedFile, UploadList};

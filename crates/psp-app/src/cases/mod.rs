//! Support case controllers
//!
//! - `form`: Medical enquiry, adverse event and platform support intake
//! - `prescription`: Prescription update requests

pub mod form;
pub mod prescription;


pub use form::{CaseFieldErrors, CaseForm, CaseKind, CasePopup};
pub use prescription::{CancelOutcome, PrescriptionFieldErrors, PrescriptionForm};

//! Prescription update form

use psp_core::prelude::*;
use psp_core::{PatientStatus, PrescriptionRequest};

use crate::config::UploadSettings;
use crate::services::{
    ErrorReportingPort, LocalAccountService, LocalCaseService, NavigationPort, PageHost,
};
use crate::upload::{RemovedAttachment, SelectedFile, UploadList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrescriptionFieldErrors {
    pub physical_copy_missing: bool,
    pub e_prescription_missing: bool,
    pub pharmacy_missing: bool,
    pub upload_missing: bool,
}

impl PrescriptionFieldErrors {
    pub fn any(&self) -> bool {
        self.physical_copy_missing
            || self.e_prescription_missing
            || self.pharmacy_missing
            || self.upload_missing
    }
}

/// What [`PrescriptionForm::cancel`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The form was untouched, the user left for their dashboard
    LeftPage,
    /// The form was reset in place
    Reset,
}

#[derive(Debug)]
pub struct PrescriptionForm {
    physical_copy: Option<bool>,
    e_prescription: Option<bool>,
    pharmacy: String,
    comments: String,
    uploads: UploadList,
    errors: PrescriptionFieldErrors,
    patient_status: PatientStatus,
    show_confirmation: bool,
}

impl PrescriptionForm {
    pub fn new(upload: UploadSettings) -> Self {
        Self {
            physical_copy: None,
            e_prescription: None,
            pharmacy: String::new(),
            comments: String::new(),
            uploads: UploadList::new(upload),
            errors: PrescriptionFieldErrors::default(),
            patient_status: PatientStatus::default(),
            show_confirmation: false,
        }
    }

    pub fn physical_copy(&self) -> Option<bool> {
        self.physical_copy
    }

    pub fn e_prescription(&self) -> Option<bool> {
        self.e_prescription
    }

    /// The e-prescription question is only asked without a physical copy
    pub fn asks_e_prescription(&self) -> bool {
        self.physical_copy == Some(false)
    }

    pub fn errors(&self) -> PrescriptionFieldErrors {
        self.errors
    }

    pub fn uploads(&self) -> &UploadList {
        &self.uploads
    }

    pub fn is_confirmation_shown(&self) -> bool {
        self.show_confirmation
    }

    /// Look up the patient status used to route a cancel
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAccountService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.patient_status = host.report(service.patient_status().await)?;
        Ok(())
    }

    pub fn set_physical_copy(&mut self, has_copy: bool) {
        self.physical_copy = Some(has_copy);
        self.errors.physical_copy_missing = false;
        if has_copy {
            self.e_prescription = None;
            self.errors.e_prescription_missing = false;
            self.errors.pharmacy_missing = false;
        } else {
            self.errors.upload_missing = false;
        }
    }

    pub fn set_e_prescription(&mut self, electronic: bool) {
        self.e_prescription = Some(electronic);
        self.errors.e_prescription_missing = false;
        if !electronic {
            self.errors.pharmacy_missing = false;
        }
    }

    pub fn set_pharmacy(&mut self, name: &str) {
        self.pharmacy = name.to_string();
        if !self.pharmacy.trim().is_empty() {
            self.errors.pharmacy_missing = false;
        }
    }

    pub fn set_comments(&mut self, comments: &str) {
        self.comments = comments.to_string();
    }

    pub async fn add_files(&mut self, selection: Vec<SelectedFile>) -> Result<usize> {
        let added = self.uploads.add_files(selection).await?;
        self.errors.upload_missing = false;
        Ok(added)
    }

    pub async fn remove_file<S: LocalCaseService>(
        &mut self,
        index: usize,
        service: &S,
    ) -> Result<RemovedAttachment> {
        self.uploads.remove_file(index, None, service).await
    }

    pub fn validate(&mut self) -> Result<()> {
        self.errors = PrescriptionFieldErrors {
            physical_copy_missing: self.physical_copy.is_none(),
            e_prescription_missing: self.asks_e_prescription() && self.e_prescription.is_none(),
            pharmacy_missing: self.asks_e_prescription()
                && self.e_prescription == Some(true)
                && self.pharmacy.trim().is_empty(),
            upload_missing: self.physical_copy == Some(true) && self.uploads.is_empty(),
        };

        if self.errors.any() {
            Err(Error::validation("Prescription update has invalid fields"))
        } else {
            Ok(())
        }
    }

    /// Create the prescription case and attach the uploads
    pub async fn submit<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<String>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.validate()?;

        let request = PrescriptionRequest {
            physical_copy: self.physical_copy == Some(true),
            e_prescription: self.e_prescription,
            prescription_sent_to: self.pharmacy.trim().to_string(),
            additional_comments: self.comments.clone(),
        };
        let case_id = host.report(service.create_prescription_case(request).await)?;

        let files = self.uploads.take_pending();
        if !files.is_empty() {
            host.report(service.save_files_to_case(&case_id, files).await)?;
        }

        info!("Created prescription update case {}", case_id);
        self.reset();
        self.show_confirmation = true;
        Ok(case_id)
    }

    pub fn close_confirmation(&mut self) {
        self.show_confirmation = false;
    }

    pub fn is_untouched(&self) -> bool {
        self.physical_copy.is_none()
            && self.pharmacy.is_empty()
            && self.comments.is_empty()
            && self.uploads.is_empty()
    }

    /// Leave an untouched form for the patient's dashboard, otherwise reset it
    pub fn cancel<N, E>(&mut self, host: &PageHost<N, E>) -> CancelOutcome
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        if !self.is_untouched() {
            self.reset();
            return CancelOutcome::Reset;
        }

        match self.patient_status {
            PatientStatus::Chronic => host.redirect(&host.pages().dashboard),
            PatientStatus::Acute => host.redirect(&host.pages().acute_dashboard),
            PatientStatus::Unassigned => host.redirect_to(&host.site().base_url),
        }
        CancelOutcome::LeftPage
    }

    fn reset(&mut self) {
        self.physical_copy = None;
        self.e_prescription = None;
        self.pharmacy.clear();
        self.comments.clear();
        self.uploads.clear();
        self.errors = PrescriptionFieldErrors::default();
    }
}

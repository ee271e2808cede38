//! Support case intake forms
//!
//! One controller serves the medical enquiry, adverse event and platform
//! support pages. Each page edits at most one open case of its kind: an
//! existing draft is pre-filled on activation and updated on save, otherwise
//! a new case is created.

use psp_core::prelude::*;
use psp_core::{CaseRecord, CaseRequest, CaseStatus, CaseType};

use crate::config::{FormSettings, PageSettings, UploadSettings};
use crate::services::{ErrorReportingPort, LocalCaseService, NavigationPort, PageHost};
use crate::upload::{RemovedAttachment, SelectedFile, UploadList};

/// Case intake pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    MedicalEnquiry,
    AdverseEvent,
    PlatformSupport,
}

impl CaseKind {
    pub fn case_type(&self) -> CaseType {
        match self {
            CaseKind::MedicalEnquiry => CaseType::MedicalInformationEnquiry,
            CaseKind::AdverseEvent => CaseType::AdverseEventReport,
            CaseKind::PlatformSupport => CaseType::PlatformSupport,
        }
    }

    /// Sub-types offered on the page; empty when none is asked for
    pub fn sub_types(&self) -> &'static [&'static str] {
        match self {
            CaseKind::MedicalEnquiry => &["Product", "Treatment"],
            CaseKind::AdverseEvent => &["Suspected", "Unexpected", "Other"],
            CaseKind::PlatformSupport => &[],
        }
    }

    pub fn requires_sub_type(&self) -> bool {
        !self.sub_types().is_empty()
    }

    pub fn page<'a>(&self, pages: &'a PageSettings) -> &'a str {
        match self {
            CaseKind::MedicalEnquiry => &pages.medical_enquiry,
            CaseKind::AdverseEvent => &pages.adverse_event,
            CaseKind::PlatformSupport => &pages.platform_support,
        }
    }
}

/// Inline error flags shown next to the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaseFieldErrors {
    pub sub_type_missing: bool,
    pub description_missing: bool,
    pub description_too_long: bool,
}

impl CaseFieldErrors {
    pub fn any(&self) -> bool {
        self.sub_type_missing || self.description_missing || self.description_too_long
    }
}

/// Confirmation shown after a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePopup {
    Submitted,
    DraftSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    Submit,
    Draft,
}

#[derive(Debug)]
pub struct CaseForm {
    kind: CaseKind,
    description_max_chars: usize,
    account_id: Option<String>,
    case_id: Option<String>,
    status: CaseStatus,
    sub_type: Option<String>,
    description: String,
    read_only: bool,
    errors: CaseFieldErrors,
    uploads: UploadList,
    popup: Option<CasePopup>,
    draft_button_disabled: bool,
}

impl CaseForm {
    pub fn new(kind: CaseKind, forms: FormSettings, upload: UploadSettings) -> Self {
        Self {
            kind,
            description_max_chars: forms.description_max_chars,
            account_id: None,
            case_id: None,
            status: CaseStatus::Draft,
            sub_type: None,
            description: String::new(),
            read_only: false,
            errors: CaseFieldErrors::default(),
            uploads: UploadList::new(upload),
            popup: None,
            draft_button_disabled: false,
        }
    }

    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    pub fn case_id(&self) -> Option<&str> {
        self.case_id.as_deref()
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn errors(&self) -> CaseFieldErrors {
        self.errors
    }

    pub fn uploads(&self) -> &UploadList {
        &self.uploads
    }

    pub fn popup(&self) -> Option<CasePopup> {
        self.popup
    }

    pub fn is_draft_button_disabled(&self) -> bool {
        self.draft_button_disabled
    }

    // ─────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────

    /// Load the enrollee account, the open case of this kind and its
    /// attachments
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let enrollee = host.report(service.enrollee().await)?;
        let account_id = match enrollee.account_id {
            Some(id) => id,
            None => {
                let err = Error::remote("enrollee", "No patient account found for the current user");
                host.fail(&err);
                return Err(err);
            }
        };

        self.account_id = Some(account_id);
        self.load_open_case(service, host).await
    }

    /// Pre-fill the open case of this kind and its stored attachments
    async fn load_open_case<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let account_id = self
            .account_id
            .clone()
            .ok_or_else(|| Error::validation("No patient account loaded for this case"))?;
        let cases = host.report(
            service
                .draft_cases(&account_id, self.kind.case_type())
                .await,
        )?;

        let Some(case) = cases.into_iter().next() else {
            debug!("No open {} case to pre-fill", self.kind.case_type());
            return Ok(());
        };
        let case_id = case.id.clone();
        self.prefill(case);

        let attachments = host.report(service.saved_attachments(&case_id).await)?;
        self.uploads.load_persisted(attachments);
        Ok(())
    }

    /// Copy an existing case into the form
    pub fn prefill(&mut self, case: CaseRecord) {
        self.case_id = Some(case.id);
        self.sub_type = case.sub_type.filter(|s| !s.is_empty());
        self.description = case.description;
        self.status = case.status;
        self.read_only = case.status.is_read_only();
        if self.read_only {
            info!("Case is waiting for more information, fields are read-only");
        }
    }

    // ─────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────

    pub fn select_sub_type(&mut self, value: &str) -> Result<()> {
        self.ensure_editable()?;
        if !self.kind.sub_types().contains(&value) {
            return Err(Error::validation(format!(
                "{:?} is not a sub-type of {}",
                value,
                self.kind.case_type()
            )));
        }
        self.sub_type = Some(value.to_string());
        self.errors.sub_type_missing = false;
        Ok(())
    }

    pub fn set_description(&mut self, text: &str) -> Result<()> {
        self.ensure_editable()?;
        self.description = text.to_string();
        self.errors.description_missing = false;
        self.errors.description_too_long = self.description_too_long();
        Ok(())
    }

    pub async fn add_files(&mut self, selection: Vec<SelectedFile>) -> Result<usize> {
        self.uploads.add_files(selection).await
    }

    pub async fn remove_file<S: LocalCaseService>(
        &mut self,
        index: usize,
        service: &S,
    ) -> Result<RemovedAttachment> {
        self.uploads
            .remove_file(index, self.case_id.as_deref(), service)
            .await
    }

    /// Recompute the inline error flags
    pub fn validate(&mut self) -> Result<()> {
        let description_missing = self.description.trim().is_empty();
        self.errors = CaseFieldErrors {
            sub_type_missing: self.kind.requires_sub_type() && self.sub_type.is_none(),
            description_missing,
            description_too_long: !description_missing && self.description_too_long(),
        };

        if self.errors.any() {
            Err(Error::validation(format!(
                "{} form has invalid fields",
                self.kind.case_type()
            )))
        } else {
            Ok(())
        }
    }

    // ─────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────

    /// Create or update the case, then attach pending uploads
    pub async fn submit<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<String>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.save(service, host, SaveMode::Submit).await
    }

    /// Create or update the draft, then attach pending uploads.
    ///
    /// The draft button stays disabled until the confirmation is closed.
    pub async fn save_draft<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<String>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        if self.draft_button_disabled {
            return Err(Error::validation("Draft save already in progress"));
        }
        self.save(service, host, SaveMode::Draft).await
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
        self.draft_button_disabled = false;
    }

    /// Return to the support centre
    pub fn back<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().support);
    }

    async fn save<S, N, E>(
        &mut self,
        service: &S,
        host: &PageHost<N, E>,
        mode: SaveMode,
    ) -> Result<String>
    where
        S: LocalCaseService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.validate()?;
        let request = self.request()?;

        if mode == SaveMode::Draft {
            self.draft_button_disabled = true;
        }

        let result = match (mode, self.case_id.as_deref()) {
            (SaveMode::Submit, None) => service.create_case(request).await,
            (SaveMode::Submit, Some(id)) => service.update_case(id, request).await,
            (SaveMode::Draft, None) => service.create_draft(request).await,
            (SaveMode::Draft, Some(id)) => service.update_draft(id, request).await,
        };
        let case_id = match host.report(result) {
            Ok(id) => id,
            Err(e) => {
                self.draft_button_disabled = false;
                return Err(e);
            }
        };
        self.case_id = Some(case_id.clone());

        // Pending files stay queued until the attach call succeeds
        let files = self.uploads.pending_files();
        if !files.is_empty() {
            debug!("Attaching {} files to case {}", files.len(), case_id);
            if let Err(e) = host.report(service.save_files_to_case(&case_id, files).await) {
                self.draft_button_disabled = false;
                return Err(e);
            }
        }

        info!("Saved {} case {} ({:?})", self.kind.case_type(), case_id, mode);
        self.clear();
        match mode {
            SaveMode::Submit => {
                self.case_id = None;
                self.popup = Some(CasePopup::Submitted);
            }
            SaveMode::Draft => {
                self.popup = Some(CasePopup::DraftSaved);
                self.load_open_case(service, host).await?;
            }
        }
        Ok(case_id)
    }

    fn request(&self) -> Result<CaseRequest> {
        let account_id = self
            .account_id
            .clone()
            .ok_or_else(|| Error::validation("No patient account loaded for this case"))?;
        Ok(CaseRequest {
            account_id,
            case_type: self.kind.case_type(),
            sub_type: self.sub_type.clone(),
            description: self.description.clone(),
        })
    }

    fn clear(&mut self) {
        self.sub_type = None;
        self.description.clear();
        self.errors = CaseFieldErrors::default();
        self.read_only = false;
        self.status = CaseStatus::Draft;
        self.uploads.clear();
    }

    fn description_too_long(&self) -> bool {
        self.description.chars().count() > self.description_max_chars
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnlyCase)
        } else {
            Ok(())
        }
    }
}

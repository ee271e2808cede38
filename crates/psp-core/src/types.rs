//! Domain types shared by every portal controller
//!
//! Remote records use the camelCase field names of the data boundary; view
//! models built from them live in `psp-app`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Questionnaire
// ─────────────────────────────────────────────────────────────────────────────

/// Position of a question within its questionnaire (1-based, matches the
/// remote `responseOrder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// One user response to one question
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer {
    pub value: String,
    pub version_id: String,
}

impl Answer {
    pub fn new(value: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            version_id: version_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A previously saved response fetched when the questionnaire loads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub id: String,
    pub response_order: u32,
    pub response_value: String,
    pub question_version_id: String,
}

/// Question metadata, delivered in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub question_text: String,
    pub active_version_id: String,
}

/// Payload forwarded to the remote submission boundary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSubmission {
    pub version_ids: Vec<String>,
    pub responses: Vec<String>,
    pub is_final: bool,
}

impl ResponseSubmission {
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Completed assessment counts in remote order: WPAI, PSS, DLQI, QSQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentCounts {
    pub wpai: u32,
    pub pss: u32,
    pub dlqi: u32,
    pub qsq: u32,
}

impl AssessmentCounts {
    pub fn from_slice(counts: &[u32]) -> Self {
        let at = |i: usize| counts.get(i).copied().unwrap_or(0);
        Self {
            wpai: at(0),
            pss: at(1),
            dlqi: at(2),
            qsq: at(3),
        }
    }

    pub fn any_completed(&self) -> bool {
        self.wpai != 0 || self.pss != 0 || self.dlqi != 0 || self.qsq != 0
    }
}

/// Target dates for the qualitative questionnaires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDates {
    pub target_two_months_date: Option<NaiveDate>,
    pub target_fourteen_weeks_date: Option<NaiveDate>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Uploads
// ─────────────────────────────────────────────────────────────────────────────

/// A file accepted by the upload validator, ready to be saved to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Base64 payload without the `data:` prefix
    pub file_data: String,
    pub file_name: String,
    /// Raw size of the selected file, never the encoded length
    #[serde(skip)]
    pub size_bytes: u64,
}

/// Rendering hint for an attachment already stored on a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttachmentKind {
    #[default]
    Image,
    Pdf,
}

impl AttachmentKind {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.eq_ignore_ascii_case("application/pdf") {
            AttachmentKind::Pdf
        } else {
            AttachmentKind::Image
        }
    }
}

/// A file already persisted against a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAttachment {
    pub id: String,
    pub url: String,
    pub size_bytes: u64,
    #[serde(rename = "type", default)]
    pub kind: AttachmentKind,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cases
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of support case raised from the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "Medical Information Enquiry")]
    MedicalInformationEnquiry,
    #[serde(rename = "Report an Adverse Events")]
    AdverseEventReport,
    #[serde(rename = "PSP Platform Support")]
    PlatformSupport,
    #[serde(rename = "Update Rx")]
    PrescriptionUpdate,
}

impl CaseType {
    pub fn label(&self) -> &'static str {
        match self {
            CaseType::MedicalInformationEnquiry => "Medical Information Enquiry",
            CaseType::AdverseEventReport => "Report an Adverse Events",
            CaseType::PlatformSupport => "PSP Platform Support",
            CaseType::PrescriptionUpdate => "Update Rx",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status reported for a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    Draft,
    Submitted,
    #[serde(rename = "Need More Info", alias = "Need more info")]
    NeedMoreInfo,
    #[serde(other)]
    Other,
}

impl CaseStatus {
    /// Cases waiting on the support team do not accept field edits
    pub fn is_read_only(&self) -> bool {
        matches!(self, CaseStatus::NeedMoreInfo)
    }
}

/// A case as returned by the data boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub attached_file_ids: Vec<String>,
}

/// Fields sent when creating or updating a case or case draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRequest {
    pub account_id: String,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    pub sub_type: Option<String>,
    pub description: String,
}

/// Prescription update case payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRequest {
    pub physical_copy: bool,
    pub e_prescription: Option<bool>,
    pub prescription_sent_to: String,
    pub additional_comments: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Treatment status of the logged-in patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatientStatus {
    Chronic,
    Acute,
    #[default]
    Unassigned,
}

/// Profile the logged-in user signed in with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserProfile {
    Patient,
    Caregiver,
    SystemAdministrator,
    BrandedDev,
    #[serde(other)]
    Unknown,
}

impl UserProfile {
    /// Profiles that see the full portal menu
    pub fn has_portal_menu(&self) -> bool {
        matches!(
            self,
            UserProfile::Patient | UserProfile::Caregiver | UserProfile::SystemAdministrator
        )
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: UserProfile,
    /// Caregivers act on behalf of a linked patient
    #[serde(default)]
    pub is_caregiver: bool,
}

impl CurrentUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Patient account linked to the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Enrollment record resolved for the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollee {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Raw action notification as returned by the message centre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTask {
    pub id: String,
    pub subject: String,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notification_type: String,
}

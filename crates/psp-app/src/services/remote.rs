//! Remote data boundary
//!
//! Every remote call is a named operation that resolves with a typed payload
//! or fails with [`psp_core::Error::RemoteService`]. Controllers run on a
//! single-threaded event loop, so they are written against the `Local*`
//! traits; `Send` variants are generated for hosts that need them.

use psp_core::{
    AssessmentCounts, CaseRequest, CaseRecord, CaseType, CurrentUser, DraftRecord, Enrollee,
    EnrollmentDates, LinkedAccount, NotificationTask, PatientStatus, PersistedAttachment,
    PrescriptionRequest, QuestionRecord, ResponseSubmission, Result, UploadedFile,
};

/// Questionnaire data and submissions
#[trait_variant::make(AssessmentService: Send)]
pub trait LocalAssessmentService {
    /// Active questions of a questionnaire, in display order
    async fn fetch_questions(&self, questionnaire: &str) -> Result<Vec<QuestionRecord>>;

    /// Saved draft responses of a questionnaire
    async fn fetch_draft_responses(&self, questionnaire: &str) -> Result<Vec<DraftRecord>>;

    /// Save responses as a draft or final submission
    async fn submit_responses(&self, submission: ResponseSubmission) -> Result<()>;

    /// Delete one saved draft response
    async fn delete_draft_response(&self, record_id: &str) -> Result<()>;

    /// Completed assessment counts for the current user
    async fn assessment_counts(&self) -> Result<AssessmentCounts>;

    /// Qualitative questionnaire target dates
    async fn enrollment_dates(&self) -> Result<EnrollmentDates>;

    /// Status of the latest qualitative assessment, if one exists
    async fn qualitative_status(&self) -> Result<Option<String>>;
}

/// Support cases and their attachments
#[trait_variant::make(CaseService: Send)]
pub trait LocalCaseService {
    /// Enrollment record of the current user
    async fn enrollee(&self) -> Result<Enrollee>;

    /// Open cases of a type for an account, newest first
    async fn draft_cases(&self, account_id: &str, case_type: CaseType) -> Result<Vec<CaseRecord>>;

    /// Create a submitted case, returning its id
    async fn create_case(&self, request: CaseRequest) -> Result<String>;

    /// Submit an existing case, returning its id
    async fn update_case(&self, case_id: &str, request: CaseRequest) -> Result<String>;

    /// Create a draft case, returning its id
    async fn create_draft(&self, request: CaseRequest) -> Result<String>;

    /// Update an existing draft case, returning its id
    async fn update_draft(&self, case_id: &str, request: CaseRequest) -> Result<String>;

    /// Attach encoded uploads to a case
    async fn save_files_to_case(&self, case_id: &str, files: Vec<UploadedFile>) -> Result<()>;

    /// Attachments already stored on a case
    async fn saved_attachments(&self, case_id: &str) -> Result<Vec<PersistedAttachment>>;

    /// Delete one stored attachment
    async fn delete_attachment(&self, case_id: &str, attachment_id: &str) -> Result<()>;

    /// Create a prescription update case, returning its id
    async fn create_prescription_case(&self, request: PrescriptionRequest) -> Result<String>;
}

/// Current user and linked accounts
#[trait_variant::make(AccountService: Send)]
pub trait LocalAccountService {
    async fn current_user(&self) -> Result<CurrentUser>;

    async fn patient_status(&self) -> Result<PatientStatus>;

    /// Patient accounts selected for the current user (the patient itself, or
    /// the patient a caregiver is acting for)
    async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>>;

    /// Active patients of a caregiver
    async fn caregiver_patients(&self) -> Result<Vec<LinkedAccount>>;

    /// Whether the user has picked a community username
    async fn has_community_username(&self) -> Result<bool>;
}

/// Action notifications
#[trait_variant::make(NotificationService: Send)]
pub trait LocalNotificationService {
    async fn action_notifications(&self) -> Result<Vec<NotificationTask>>;

    async fn mark_task_completed(&self, task_id: &str) -> Result<()>;

    /// Close completed questionnaire tasks, returning how many remain open
    async fn mark_question_tasks_completed(&self) -> Result<u32>;
}

//! Test utilities for portal controllers
//!
//! Provides an in-memory remote service, recording ports and record builders.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use psp_core::prelude::*;
use psp_core::{
    AssessmentCounts, AttachmentKind, CaseRecord, CaseRequest, CaseType, CurrentUser,
    DraftRecord, Enrollee, EnrollmentDates, LinkedAccount, NotificationTask, PatientStatus,
    PersistedAttachment, PrescriptionRequest, QuestionRecord, ResponseSubmission, UploadedFile,
    UserProfile,
};

use crate::config::{PageSettings, SiteSettings};
use crate::routing::{RouteResolver, SiteBase};
use crate::services::{
    ErrorReportingPort, LocalAccountService, LocalAssessmentService, LocalCaseService,
    LocalNotificationService, NavigationPort, PageHost,
};

// ─────────────────────────────────────────────────────────────────────────────
// Ports
// ─────────────────────────────────────────────────────────────────────────────

/// Navigation port that records every target
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited.borrow().last().cloned()
    }
}

impl NavigationPort for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visited.borrow_mut().push(url.to_string());
    }
}

/// Session error slot that records every message
#[derive(Debug, Default)]
pub struct RecordingErrorSlot {
    messages: RefCell<Vec<String>>,
}

impl RecordingErrorSlot {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl ErrorReportingPort for RecordingErrorSlot {
    fn record_error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

pub fn branded_site() -> SiteBase {
    RouteResolver::new(SiteSettings::default()).branded()
}

pub fn unassigned_site() -> SiteBase {
    RouteResolver::new(SiteSettings::default()).unassigned()
}

/// Host over borrowed recording ports with default page slugs
pub fn test_host<'a>(
    navigator: &'a RecordingNavigator,
    errors: &'a RecordingErrorSlot,
    site: SiteBase,
) -> PageHost<&'a RecordingNavigator, &'a RecordingErrorSlot> {
    PageHost::new(navigator, errors, site, PageSettings::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Record builders
// ─────────────────────────────────────────────────────────────────────────────

/// Question records `q1..qN` with active versions `v1..vN`
pub fn question_records(count: u32) -> Vec<QuestionRecord> {
    (1..=count)
        .map(|n| QuestionRecord {
            id: format!("q{}", n),
            question_text: format!("Question {}", n),
            active_version_id: format!("v{}", n),
        })
        .collect()
}

/// Draft record `d<order>` answering question `order` with version `v<order>`
pub fn draft_record(order: u32, value: &str) -> DraftRecord {
    DraftRecord {
        id: format!("d{}", order),
        response_order: order,
        response_value: value.to_string(),
        question_version_id: format!("v{}", order),
    }
}

pub fn test_user(profile: UserProfile) -> CurrentUser {
    CurrentUser {
        id: "user-1".to_string(),
        first_name: "Alex".to_string(),
        last_name: "Morgan".to_string(),
        profile,
        is_caregiver: profile == UserProfile::Caregiver,
    }
}

pub fn test_task(id: &str, subject: &str, created: DateTime<Utc>) -> NotificationTask {
    NotificationTask {
        id: id.to_string(),
        subject: subject.to_string(),
        created_date: created,
        category: String::new(),
        notification_type: String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote service
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory implementation of every remote service trait.
///
/// Each call is appended to a log as `operation[:arg...]`. Operations listed
/// with [`FakePortalService::fail_on`] fail with [`Error::RemoteService`].
/// Files saved to a case show up in later `saved_attachments` calls.
#[derive(Debug, Default)]
pub struct FakePortalService {
    calls: RefCell<Vec<String>>,
    failures: RefCell<HashMap<String, String>>,

    questions: Vec<QuestionRecord>,
    drafts: Vec<DraftRecord>,
    submissions: RefCell<Vec<ResponseSubmission>>,
    counts: AssessmentCounts,
    dates: EnrollmentDates,
    qualitative_status: Option<String>,

    enrollee: Option<Enrollee>,
    cases: Vec<CaseRecord>,
    attachments: RefCell<Vec<PersistedAttachment>>,
    case_requests: RefCell<Vec<CaseRequest>>,
    saved_files: RefCell<Vec<(String, Vec<UploadedFile>)>>,
    prescriptions: RefCell<Vec<PrescriptionRequest>>,

    user: Option<CurrentUser>,
    patient_status: PatientStatus,
    linked_accounts: Vec<LinkedAccount>,
    caregiver_patients: Vec<LinkedAccount>,
    community_username: bool,

    notifications: Vec<NotificationTask>,
    open_question_tasks: u32,
}

impl FakePortalService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(mut self, questions: Vec<QuestionRecord>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_drafts(mut self, drafts: Vec<DraftRecord>) -> Self {
        self.drafts = drafts;
        self
    }

    pub fn with_counts(mut self, counts: AssessmentCounts) -> Self {
        self.counts = counts;
        self
    }

    pub fn with_dates(mut self, dates: EnrollmentDates) -> Self {
        self.dates = dates;
        self
    }

    pub fn with_qualitative_status(mut self, status: &str) -> Self {
        self.qualitative_status = Some(status.to_string());
        self
    }

    pub fn with_enrollee(mut self, enrollee: Enrollee) -> Self {
        self.enrollee = Some(enrollee);
        self
    }

    pub fn with_cases(mut self, cases: Vec<CaseRecord>) -> Self {
        self.cases = cases;
        self
    }

    pub fn with_attachments(self, attachments: Vec<PersistedAttachment>) -> Self {
        *self.attachments.borrow_mut() = attachments;
        self
    }

    pub fn with_user(mut self, user: CurrentUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_patient_status(mut self, status: PatientStatus) -> Self {
        self.patient_status = status;
        self
    }

    pub fn with_linked_accounts(mut self, accounts: Vec<LinkedAccount>) -> Self {
        self.linked_accounts = accounts;
        self
    }

    pub fn with_caregiver_patients(mut self, patients: Vec<LinkedAccount>) -> Self {
        self.caregiver_patients = patients;
        self
    }

    pub fn with_community_username(mut self, has_username: bool) -> Self {
        self.community_username = has_username;
        self
    }

    pub fn with_notifications(mut self, tasks: Vec<NotificationTask>) -> Self {
        self.notifications = tasks;
        self
    }

    pub fn with_open_question_tasks(mut self, open: u32) -> Self {
        self.open_question_tasks = open;
        self
    }

    /// Make `operation` fail with `message` from now on
    pub fn fail_on(&self, operation: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert(operation.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn submissions(&self) -> Vec<ResponseSubmission> {
        self.submissions.borrow().clone()
    }

    pub fn case_requests(&self) -> Vec<CaseRequest> {
        self.case_requests.borrow().clone()
    }

    pub fn saved_files(&self) -> Vec<(String, Vec<UploadedFile>)> {
        self.saved_files.borrow().clone()
    }

    pub fn prescriptions(&self) -> Vec<PrescriptionRequest> {
        self.prescriptions.borrow().clone()
    }

    fn call(&self, operation: &str, entry: String) -> Result<()> {
        self.calls.borrow_mut().push(entry);
        match self.failures.borrow().get(operation) {
            Some(message) => Err(Error::remote(operation, message.clone())),
            None => Ok(()),
        }
    }
}

impl LocalAssessmentService for FakePortalService {
    async fn fetch_questions(&self, questionnaire: &str) -> Result<Vec<QuestionRecord>> {
        self.call("fetch_questions", format!("fetch_questions:{}", questionnaire))?;
        Ok(self.questions.clone())
    }

    async fn fetch_draft_responses(&self, questionnaire: &str) -> Result<Vec<DraftRecord>> {
        self.call(
            "fetch_draft_responses",
            format!("fetch_draft_responses:{}", questionnaire),
        )?;
        Ok(self.drafts.clone())
    }

    async fn submit_responses(&self, submission: ResponseSubmission) -> Result<()> {
        let mode = if submission.is_final { "final" } else { "draft" };
        self.call(
            "submit_responses",
            format!("submit_responses:{}:{}", mode, submission.len()),
        )?;
        self.submissions.borrow_mut().push(submission);
        Ok(())
    }

    async fn delete_draft_response(&self, record_id: &str) -> Result<()> {
        self.call(
            "delete_draft_response",
            format!("delete_draft_response:{}", record_id),
        )
    }

    async fn assessment_counts(&self) -> Result<AssessmentCounts> {
        self.call("assessment_counts", "assessment_counts".to_string())?;
        Ok(self.counts)
    }

    async fn enrollment_dates(&self) -> Result<EnrollmentDates> {
        self.call("enrollment_dates", "enrollment_dates".to_string())?;
        Ok(self.dates)
    }

    async fn qualitative_status(&self) -> Result<Option<String>> {
        self.call("qualitative_status", "qualitative_status".to_string())?;
        Ok(self.qualitative_status.clone())
    }
}

impl LocalCaseService for FakePortalService {
    async fn enrollee(&self) -> Result<Enrollee> {
        self.call("enrollee", "enrollee".to_string())?;
        Ok(self.enrollee.clone().unwrap_or_else(|| Enrollee {
            id: "enrollee-1".to_string(),
            account_id: Some("account-1".to_string()),
        }))
    }

    async fn draft_cases(&self, account_id: &str, case_type: CaseType) -> Result<Vec<CaseRecord>> {
        self.call(
            "draft_cases",
            format!("draft_cases:{}:{}", account_id, case_type),
        )?;
        Ok(self
            .cases
            .iter()
            .filter(|c| c.case_type == case_type)
            .cloned()
            .collect())
    }

    async fn create_case(&self, request: CaseRequest) -> Result<String> {
        self.call("create_case", format!("create_case:{}", request.case_type))?;
        self.case_requests.borrow_mut().push(request);
        Ok("case-new".to_string())
    }

    async fn update_case(&self, case_id: &str, request: CaseRequest) -> Result<String> {
        self.call("update_case", format!("update_case:{}", case_id))?;
        self.case_requests.borrow_mut().push(request);
        Ok(case_id.to_string())
    }

    async fn create_draft(&self, request: CaseRequest) -> Result<String> {
        self.call("create_draft", format!("create_draft:{}", request.case_type))?;
        self.case_requests.borrow_mut().push(request);
        Ok("draft-new".to_string())
    }

    async fn update_draft(&self, case_id: &str, request: CaseRequest) -> Result<String> {
        self.call("update_draft", format!("update_draft:{}", case_id))?;
        self.case_requests.borrow_mut().push(request);
        Ok(case_id.to_string())
    }

    async fn save_files_to_case(&self, case_id: &str, files: Vec<UploadedFile>) -> Result<()> {
        self.call(
            "save_files_to_case",
            format!("save_files_to_case:{}:{}", case_id, files.len()),
        )?;
        {
            let mut attachments = self.attachments.borrow_mut();
            for file in &files {
                let id = format!("saved-{}", attachments.len() + 1);
                attachments.push(PersistedAttachment {
                    url: format!("/files/{}/{}", case_id, file.file_name),
                    id,
                    size_bytes: file.size_bytes,
                    kind: if file.file_name.to_ascii_lowercase().ends_with(".pdf") {
                        AttachmentKind::Pdf
                    } else {
                        AttachmentKind::Image
                    },
                });
            }
        }
        self.saved_files
            .borrow_mut()
            .push((case_id.to_string(), files));
        Ok(())
    }

    async fn saved_attachments(&self, case_id: &str) -> Result<Vec<PersistedAttachment>> {
        self.call(
            "saved_attachments",
            format!("saved_attachments:{}", case_id),
        )?;
        Ok(self.attachments.borrow().clone())
    }

    async fn delete_attachment(&self, case_id: &str, attachment_id: &str) -> Result<()> {
        self.call(
            "delete_attachment",
            format!("delete_attachment:{}:{}", case_id, attachment_id),
        )?;
        self.attachments.borrow_mut().retain(|a| a.id != attachment_id);
        Ok(())
    }

    async fn create_prescription_case(&self, request: PrescriptionRequest) -> Result<String> {
        self.call(
            "create_prescription_case",
            "create_prescription_case".to_string(),
        )?;
        self.prescriptions.borrow_mut().push(request);
        Ok("rx-new".to_string())
    }
}

impl LocalAccountService for FakePortalService {
    async fn current_user(&self) -> Result<CurrentUser> {
        self.call("current_user", "current_user".to_string())?;
        Ok(self
            .user
            .clone()
            .unwrap_or_else(|| test_user(UserProfile::Patient)))
    }

    async fn patient_status(&self) -> Result<PatientStatus> {
        self.call("patient_status", "patient_status".to_string())?;
        Ok(self.patient_status)
    }

    async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>> {
        self.call("linked_accounts", "linked_accounts".to_string())?;
        Ok(self.linked_accounts.clone())
    }

    async fn caregiver_patients(&self) -> Result<Vec<LinkedAccount>> {
        self.call("caregiver_patients", "caregiver_patients".to_string())?;
        Ok(self.caregiver_patients.clone())
    }

    async fn has_community_username(&self) -> Result<bool> {
        self.call(
            "has_community_username",
            "has_community_username".to_string(),
        )?;
        Ok(self.community_username)
    }
}

impl LocalNotificationService for FakePortalService {
    async fn action_notifications(&self) -> Result<Vec<NotificationTask>> {
        self.call("action_notifications", "action_notifications".to_string())?;
        Ok(self.notifications.clone())
    }

    async fn mark_task_completed(&self, task_id: &str) -> Result<()> {
        self.call(
            "mark_task_completed",
            format!("mark_task_completed:{}", task_id),
        )
    }

    async fn mark_question_tasks_completed(&self) -> Result<u32> {
        self.call(
            "mark_question_tasks_completed",
            "mark_question_tasks_completed".to_string(),
        )?;
        Ok(self.open_question_tasks)
    }
}

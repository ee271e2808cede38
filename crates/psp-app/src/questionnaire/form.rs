//! Intake questionnaire controller
//!
//! Holds the in-session answers of one questionnaire on top of the draft
//! loaded from the remote boundary. Answers are append-only per question: the
//! latest entry is the current answer. A question edited in this session
//! always wins over its loaded draft value.

use std::collections::{BTreeMap, BTreeSet};

use psp_core::prelude::*;
use psp_core::{Answer, DraftRecord, QuestionId, QuestionRecord, ResponseSubmission};

use super::catalog::{QuestionCatalog, QuestionKind, QuestionSpec, MULTI_CHOICE_SEPARATOR};
use crate::services::{ErrorReportingPort, LocalAssessmentService, NavigationPort, PageHost};

/// Question metadata bound to a catalog slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSlot {
    pub record_id: String,
    pub text: String,
    pub version_id: String,
}

/// A saved response and the remote record holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDraft {
    pub record_id: String,
    pub answer: Answer,
    pub selected: Vec<String>,
}

/// Popup shown after the user asks to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakePopup {
    /// Required answers are missing
    Incomplete,
    /// Everything required is answered, waiting for confirmation
    ConfirmSubmit,
}

/// Result of a draft save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSaveOutcome {
    /// Nothing was answered, the user was sent back to the outstanding list
    NothingToSave,
    /// Responses were saved and the confirmation popup is open
    Saved { responses: usize },
}

#[derive(Debug, Clone, Default)]
struct AnswerLog {
    entries: Vec<Answer>,
    selected: Vec<String>,
}

impl AnswerLog {
    fn push(&mut self, answer: Answer) {
        self.entries.push(answer);
    }

    fn current(&self) -> Option<&Answer> {
        self.entries.last()
    }
}

/// In-session state of a questionnaire
#[derive(Debug, Clone)]
pub struct IntakeForm {
    catalog: QuestionCatalog,
    min_answered: usize,
    slots: BTreeMap<QuestionId, QuestionSlot>,
    answers: BTreeMap<QuestionId, AnswerLog>,
    drafts: BTreeMap<QuestionId, LoadedDraft>,
    popup: Option<IntakePopup>,
    draft_saved: bool,
}

impl IntakeForm {
    pub fn new(catalog: QuestionCatalog, min_answered: usize) -> Self {
        Self {
            catalog,
            min_answered,
            slots: BTreeMap::new(),
            answers: BTreeMap::new(),
            drafts: BTreeMap::new(),
            popup: None,
            draft_saved: false,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn slot(&self, id: QuestionId) -> Option<&QuestionSlot> {
        self.slots.get(&id)
    }

    pub fn draft(&self, id: QuestionId) -> Option<&LoadedDraft> {
        self.drafts.get(&id)
    }

    pub fn popup(&self) -> Option<IntakePopup> {
        self.popup
    }

    pub fn is_draft_saved(&self) -> bool {
        self.draft_saved
    }

    // ─────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────

    /// Bind question records to catalog slots by position
    pub fn load_questions(&mut self, records: Vec<QuestionRecord>) {
        self.slots.clear();
        for (index, record) in records.into_iter().enumerate() {
            let id = QuestionId(index as u32 + 1);
            if self.catalog.get(id).is_none() {
                warn!("Ignoring question record {} beyond the catalog", record.id);
                continue;
            }
            self.slots.insert(
                id,
                QuestionSlot {
                    record_id: record.id,
                    text: record.question_text,
                    version_id: record.active_version_id,
                },
            );
        }
        debug!("Loaded {} questions for {}", self.slots.len(), self.catalog.name());
    }

    /// Pre-populate answers from saved draft records.
    ///
    /// Single-choice values must match an option exactly. Multi-choice values
    /// select every option they contain. When a question has several records,
    /// the last one wins.
    pub fn load_draft(&mut self, records: Vec<DraftRecord>) {
        self.drafts.clear();
        for record in records {
            let id = QuestionId(record.response_order);
            let Some(spec) = self.catalog.get(id) else {
                warn!(
                    "Ignoring draft record {} for unknown question {}",
                    record.id, id
                );
                continue;
            };

            let selected: Vec<String> = match spec.kind {
                QuestionKind::SingleChoice if spec.has_option(&record.response_value) => {
                    vec![record.response_value.clone()]
                }
                QuestionKind::SingleChoice => Vec::new(),
                QuestionKind::MultiChoice => spec
                    .options
                    .iter()
                    .filter(|option| record.response_value.contains(**option))
                    .map(|option| option.to_string())
                    .collect(),
            };
            if selected.is_empty() {
                warn!(
                    "Draft value for {} matches no option: {:?}",
                    id, record.response_value
                );
                continue;
            }

            let answer = Answer::new(
                selected.join(MULTI_CHOICE_SEPARATOR),
                record.question_version_id,
            );

            if let Some(previous) = self.drafts.get(&id) {
                debug!(
                    "Duplicate draft records for {}: {} replaced by {}",
                    id, previous.record_id, record.id
                );
            }
            self.drafts.insert(
                id,
                LoadedDraft {
                    record_id: record.id,
                    answer,
                    selected,
                },
            );
        }
        self.apply_all_rules();
    }

    // ─────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────

    /// Record a single-choice answer
    pub fn record_answer(
        &mut self,
        id: QuestionId,
        value: &str,
        version_id: &str,
    ) -> Result<()> {
        let spec = self.spec(id)?;
        if spec.kind != QuestionKind::SingleChoice {
            return Err(Error::validation(format!(
                "{} takes multiple options, toggle them individually",
                id
            )));
        }
        if !spec.has_option(value) {
            return Err(Error::validation(format!(
                "{:?} is not an option of {}",
                value, id
            )));
        }

        let log = self.answers.entry(id).or_default();
        log.selected = vec![value.to_string()];
        log.push(Answer::new(value, version_id));

        self.apply_rules(id);
        Ok(())
    }

    /// Check or uncheck one option of a multi-choice question.
    ///
    /// The stored value lists the selected options in catalog order. Clearing
    /// every option also clears the version id.
    pub fn toggle_option(
        &mut self,
        id: QuestionId,
        option: &str,
        checked: bool,
        version_id: &str,
    ) -> Result<()> {
        let spec = self.spec(id)?.clone();
        if spec.kind != QuestionKind::MultiChoice {
            return Err(Error::validation(format!("{} takes a single option", id)));
        }
        if !spec.has_option(option) {
            return Err(Error::validation(format!(
                "{:?} is not an option of {}",
                option, id
            )));
        }

        let mut selected = self.selection(id);
        selected.retain(|s| s != option);
        if checked {
            selected.push(option.to_string());
        }
        let ordered: Vec<String> = spec
            .options
            .iter()
            .filter(|o| selected.iter().any(|s| s == *o))
            .map(|o| o.to_string())
            .collect();

        let answer = if ordered.is_empty() {
            Answer::default()
        } else {
            Answer::new(ordered.join(MULTI_CHOICE_SEPARATOR), version_id)
        };

        let log = self.answers.entry(id).or_default();
        log.selected = ordered;
        log.push(answer);

        self.apply_rules(id);
        Ok(())
    }

    /// Options currently selected for a question
    pub fn selection(&self, id: QuestionId) -> Vec<String> {
        if let Some(log) = self.answers.get(&id) {
            return log.selected.clone();
        }
        self.drafts
            .get(&id)
            .map(|d| d.selected.clone())
            .unwrap_or_default()
    }

    /// The answer that would be submitted for a question, edits first
    pub fn effective_answer(&self, id: QuestionId) -> Option<&Answer> {
        let answer = match self.answers.get(&id) {
            Some(log) => log.current(),
            None => self.drafts.get(&id).map(|d| &d.answer),
        };
        answer.filter(|a| !a.is_empty())
    }

    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.effective_answer(id).is_some()
    }

    /// Whether a question is shown, given the current trigger answers
    pub fn is_visible(&self, id: QuestionId) -> bool {
        match self.catalog.rule_revealing(id) {
            Some(rule) => self.trigger_matches(rule.trigger, rule.value),
            None => true,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.catalog
            .questions()
            .iter()
            .filter(|q| self.is_visible(q.id) && self.is_answered(q.id))
            .count()
    }

    /// Answered single-choice questions, the count held against the minimum
    pub fn single_choice_answered_count(&self) -> usize {
        self.catalog
            .questions()
            .iter()
            .filter(|q| q.kind == QuestionKind::SingleChoice)
            .filter(|q| self.is_visible(q.id) && self.is_answered(q.id))
            .count()
    }

    // ─────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────

    /// Questions that block a final submission.
    ///
    /// Below the minimum count of answered single-choice questions every
    /// visible unanswered question is listed. A revealed follow-up is required whenever its trigger matches.
    pub fn missing_questions(&self) -> Vec<QuestionId> {
        let mut missing = BTreeSet::new();

        if self.single_choice_answered_count() < self.min_answered {
            missing.extend(
                self.catalog
                    .questions()
                    .iter()
                    .filter(|q| self.is_visible(q.id) && !self.is_answered(q.id))
                    .map(|q| q.id),
            );
        }

        for rule in self.catalog.rules() {
            if self.trigger_matches(rule.trigger, rule.value) && !self.is_answered(rule.reveals) {
                missing.insert(rule.reveals);
            }
        }

        missing.into_iter().collect()
    }

    pub fn validate_for_submit(&self) -> Result<()> {
        let missing = self.missing_questions();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::incomplete(missing))
        }
    }

    /// Open the incomplete or confirmation popup
    pub fn request_submit(&mut self) -> IntakePopup {
        let popup = match self.validate_for_submit() {
            Ok(()) => IntakePopup::ConfirmSubmit,
            Err(e) => {
                info!("{}", e);
                IntakePopup::Incomplete
            }
        };
        self.popup = Some(popup);
        popup
    }

    /// Close a popup without submitting
    pub fn return_to_editing(&mut self) {
        self.popup = None;
    }

    // ─────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────

    /// Visible non-empty answers in catalog order
    pub fn gather_submission(&self, is_final: bool) -> ResponseSubmission {
        let mut submission = ResponseSubmission {
            is_final,
            ..Default::default()
        };
        for question in self.catalog.questions() {
            if !self.is_visible(question.id) {
                continue;
            }
            if let Some(answer) = self.effective_answer(question.id) {
                submission.version_ids.push(answer.version_id.clone());
                submission.responses.push(answer.value.clone());
            }
        }
        submission
    }

    /// Draft records of multi-choice questions that are now fully cleared
    pub fn stale_draft_records(&self) -> Vec<String> {
        self.drafts
            .iter()
            .filter(|(id, _)| {
                self.catalog
                    .get(**id)
                    .is_some_and(|spec| spec.kind == QuestionKind::MultiChoice)
                    && !self.is_answered(**id)
            })
            .map(|(_, draft)| draft.record_id.clone())
            .collect()
    }

    /// Fetch question metadata and the saved draft
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let questions = host.report(service.fetch_questions(self.catalog.name()).await)?;
        self.load_questions(questions);

        let drafts = host.report(service.fetch_draft_responses(self.catalog.name()).await)?;
        self.load_draft(drafts);
        Ok(())
    }

    /// Save the current answers as a draft
    pub async fn save_draft<S, N, E>(
        &mut self,
        service: &S,
        host: &PageHost<N, E>,
    ) -> Result<DraftSaveOutcome>
    where
        S: LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let submission = self.gather_submission(false);
        let stale = self.stale_draft_records();

        if submission.is_empty() && stale.is_empty() {
            info!("No answers to save, returning to outstanding questionnaires");
            host.redirect(&host.pages().outstanding);
            return Ok(DraftSaveOutcome::NothingToSave);
        }

        self.persist(service, host, submission.clone(), stale).await?;

        self.popup = None;
        self.draft_saved = true;
        Ok(DraftSaveOutcome::Saved {
            responses: submission.len(),
        })
    }

    /// Submit the final answers after the confirmation popup
    pub async fn confirm_submit<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        if let Err(e) = self.validate_for_submit() {
            self.popup = Some(IntakePopup::Incomplete);
            return Err(e);
        }

        let submission = self.gather_submission(true);
        let stale = self.stale_draft_records();
        self.persist(service, host, submission, stale).await?;

        self.popup = None;
        host.redirect(&host.pages().outstanding);
        Ok(())
    }

    /// Close the "draft saved" popup and leave the questionnaire
    pub fn close_draft_saved_popup<N, E>(&mut self, host: &PageHost<N, E>)
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.draft_saved = false;
        host.redirect(&host.pages().outstanding);
    }

    async fn persist<S, N, E>(
        &mut self,
        service: &S,
        host: &PageHost<N, E>,
        submission: ResponseSubmission,
        stale: Vec<String>,
    ) -> Result<()>
    where
        S: LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        for record_id in &stale {
            host.report(service.delete_draft_response(record_id).await)?;
        }
        self.drafts.retain(|_, d| !stale.contains(&d.record_id));

        if submission.is_empty() {
            return Ok(());
        }

        debug!(
            "Submitting {} responses (final: {})",
            submission.len(),
            submission.is_final
        );
        host.report(service.submit_responses(submission).await)
    }

    // ─────────────────────────────────────────────────────────
    // Visibility rules
    // ─────────────────────────────────────────────────────────

    fn spec(&self, id: QuestionId) -> Result<&QuestionSpec> {
        self.catalog
            .get(id)
            .ok_or_else(|| Error::validation(format!("Unknown question {}", id)))
    }

    fn trigger_matches(&self, trigger: QuestionId, value: &str) -> bool {
        self.effective_answer(trigger)
            .is_some_and(|a| a.value == value)
    }

    fn apply_all_rules(&mut self) {
        let triggers: Vec<QuestionId> = self.catalog.rules().iter().map(|r| r.trigger).collect();
        for trigger in triggers {
            self.apply_rules(trigger);
        }
    }

    /// Clear follow-ups whose trigger no longer matches, including the
    /// loaded draft value so it cannot resurface
    fn apply_rules(&mut self, trigger: QuestionId) {
        let hidden: Vec<QuestionId> = self
            .catalog
            .rules_triggered_by(trigger)
            .filter(|rule| !self.trigger_matches(rule.trigger, rule.value))
            .map(|rule| rule.reveals)
            .collect();

        for id in hidden {
            if let Some(log) = self.answers.get_mut(&id) {
                if log.current().is_some_and(|a| !a.is_empty()) {
                    debug!("Clearing hidden follow-up {}", id);
                    log.selected.clear();
                    log.push(Answer::default());
                }
            }
            if let Some(draft) = self.drafts.get_mut(&id) {
                draft.answer = Answer::default();
                draft.selected.clear();
            }
        }
    }
}

//! Tests for the questionnaire controllers

use super::catalog::{NO, YES};
use super::*;
use crate::test_utils::{
    branded_site, draft_record, question_records, test_host, FakePortalService,
    RecordingErrorSlot, RecordingNavigator,
};
use chrono::NaiveDate;
use psp_core::prelude::*;
use psp_core::{AssessmentCounts, DraftRecord, EnrollmentDates, QuestionId};

const MIN_ANSWERED: usize = 13;

fn q(n: u32) -> QuestionId {
    QuestionId(n)
}

fn form() -> IntakeForm {
    let mut form = IntakeForm::new(QuestionCatalog::introduction(), MIN_ANSWERED);
    form.load_questions(question_records(16));
    form
}

/// Answer each question with its first option ("Yes" for yes/no questions)
fn fill(form: &mut IntakeForm, ids: impl IntoIterator<Item = u32>) {
    for n in ids {
        let spec = form.catalog().get(q(n)).unwrap().clone();
        let version = format!("v{}", n);
        match spec.kind {
            QuestionKind::SingleChoice => {
                form.record_answer(q(n), spec.options[0], &version).unwrap()
            }
            QuestionKind::MultiChoice => form
                .toggle_option(q(n), spec.options[0], true, &version)
                .unwrap(),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────

#[test]
fn test_load_questions_binds_by_position() {
    let form = form();
    let slot = form.slot(q(3)).unwrap();
    assert_eq!(slot.record_id, "q3");
    assert_eq!(slot.version_id, "v3");
    assert!(form.slot(q(17)).is_none());
}

#[test]
fn test_load_questions_ignores_extra_records() {
    let mut form = IntakeForm::new(QuestionCatalog::introduction(), MIN_ANSWERED);
    form.load_questions(question_records(18));
    assert!(form.slot(q(16)).is_some());
    assert!(form.slot(q(17)).is_none());
}

#[test]
fn test_load_draft_selects_exact_single_choice_option() {
    let mut form = form();
    form.load_draft(vec![draft_record(7, "Maybe")]);

    let answer = form.effective_answer(q(7)).unwrap();
    assert_eq!(answer.value, "Maybe");
    assert_eq!(answer.version_id, "v7");
    assert_eq!(form.selection(q(7)), vec!["Maybe"]);
}

#[test]
fn test_load_draft_ignores_unmatched_values() {
    let mut form = form();
    form.load_draft(vec![draft_record(2, "Unknown"), draft_record(40, YES)]);

    assert!(!form.is_answered(q(2)));
    assert_eq!(form.answered_count(), 0);
}

#[test]
fn test_load_draft_multi_choice_uses_containment() {
    let mut form = form();
    form.load_draft(vec![
        draft_record(5, YES),
        draft_record(6, "Asthma, Plaque psoriasis"),
    ]);

    assert_eq!(form.selection(q(6)), vec!["Asthma", "Plaque psoriasis"]);
    assert_eq!(form.draft(q(6)).unwrap().record_id, "d6");
}

#[test]
fn test_duplicate_single_choice_drafts_last_wins() {
    let mut form = form();
    let later = DraftRecord {
        id: "d1-later".to_string(),
        ..draft_record(1, "More than a year")
    };
    form.load_draft(vec![draft_record(1, "Less than a month"), later]);

    assert_eq!(form.effective_answer(q(1)).unwrap().value, "More than a year");
    assert_eq!(form.draft(q(1)).unwrap().record_id, "d1-later");
}

// ─────────────────────────────────────────────────────────
// Editing
// ─────────────────────────────────────────────────────────

#[test]
fn test_record_answer_last_value_wins() {
    let mut form = form();
    form.record_answer(q(1), "Less than a month", "v1").unwrap();
    form.record_answer(q(1), "Less than a year", "v1").unwrap();

    assert_eq!(form.effective_answer(q(1)).unwrap().value, "Less than a year");
    assert_eq!(form.answered_count(), 1);
}

#[test]
fn test_record_answer_rejects_bad_input() {
    let mut form = form();
    assert!(matches!(
        form.record_answer(q(1), "Yesterday", "v1"),
        Err(Error::Validation { .. })
    ));
    assert!(form.record_answer(q(99), YES, "v99").is_err());
    assert!(form.record_answer(q(4), "Self-esteem", "v4").is_err());
}

#[test]
fn test_toggle_option_joins_in_catalog_order() {
    let mut form = form();
    form.toggle_option(q(4), "Self-esteem", true, "v4").unwrap();
    form.toggle_option(q(4), "Relationships with family and friends", true, "v4")
        .unwrap();

    assert_eq!(
        form.effective_answer(q(4)).unwrap().value,
        "Relationships with family and friends, Self-esteem"
    );
}

#[test]
fn test_clearing_every_option_clears_answer() {
    let mut form = form();
    form.toggle_option(q(4), "Self-esteem", true, "v4").unwrap();
    form.toggle_option(q(4), "Self-esteem", false, "v4").unwrap();

    assert!(form.effective_answer(q(4)).is_none());
    assert!(form.selection(q(4)).is_empty());
}

#[test]
fn test_toggle_keeps_other_draft_options() {
    let mut form = form();
    form.load_draft(vec![draft_record(4, "Relationship with partner, Self-esteem")]);

    form.toggle_option(q(4), "Self-esteem", false, "v4").unwrap();

    assert_eq!(
        form.effective_answer(q(4)).unwrap().value,
        "Relationship with partner"
    );
}

#[test]
fn test_yes_to_no_clears_follow_up() {
    let mut form = form();
    form.record_answer(q(5), YES, "v5").unwrap();
    form.toggle_option(q(6), "Asthma", true, "v6").unwrap();
    assert!(form.is_visible(q(6)));

    form.record_answer(q(5), NO, "v5").unwrap();

    assert!(!form.is_visible(q(6)));
    assert!(form.effective_answer(q(6)).is_none());
    assert!(form.selection(q(6)).is_empty());

    // Switching back does not resurrect the old answer
    form.record_answer(q(5), YES, "v5").unwrap();
    assert!(!form.is_answered(q(6)));
}

#[test]
fn test_yes_to_no_clears_loaded_draft() {
    let mut form = form();
    form.load_draft(vec![draft_record(5, YES), draft_record(6, "Asthma")]);

    form.record_answer(q(5), NO, "v5").unwrap();

    let draft = form.draft(q(6)).unwrap();
    assert!(draft.answer.value.is_empty());
    assert!(draft.answer.version_id.is_empty());
    assert_eq!(form.stale_draft_records(), vec!["d6"]);
}

// ─────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────

#[test]
fn test_below_minimum_lists_visible_unanswered() {
    let mut form = form();
    fill(&mut form, 1..=5);

    let missing = form.missing_questions();

    // Q5 = Yes reveals Q6, so Q6..=Q16 are all missing
    assert_eq!(missing, (6..=16).map(q).collect::<Vec<_>>());
}

#[test]
fn test_revealed_follow_up_required_above_minimum() {
    let mut form = form();
    fill(&mut form, (1..=5).chain(7..=16));

    assert_eq!(form.answered_count(), 15);
    assert_eq!(form.missing_questions(), vec![q(6)]);

    match form.validate_for_submit() {
        Err(Error::IncompleteQuestionnaire { missing }) => assert_eq!(missing, vec![q(6)]),
        other => panic!("expected incomplete questionnaire, got {other:?}"),
    }
}

#[test]
fn test_hidden_follow_up_not_required() {
    let mut form = form();
    fill(&mut form, (1..=4).chain(7..=15));
    form.record_answer(q(5), NO, "v5").unwrap();

    assert_eq!(form.answered_count(), 14);
    assert!(form.missing_questions().is_empty());
    assert!(form.validate_for_submit().is_ok());
}

#[test]
fn test_checkbox_answers_do_not_count_toward_minimum() {
    let mut form = form();
    fill(&mut form, (1..=4).chain(7..=14));
    form.record_answer(q(5), NO, "v5").unwrap();

    assert_eq!(form.answered_count(), 13);
    assert_eq!(form.single_choice_answered_count(), 12);
    assert_eq!(form.missing_questions(), vec![q(15), q(16)]);
    assert!(matches!(
        form.validate_for_submit(),
        Err(Error::IncompleteQuestionnaire { .. })
    ));

    fill(&mut form, [15]);
    assert_eq!(form.single_choice_answered_count(), 13);
    assert!(form.validate_for_submit().is_ok());
}

#[test]
fn test_request_submit_popups() {
    let mut form = form();
    fill(&mut form, 1..=3);
    assert_eq!(form.request_submit(), IntakePopup::Incomplete);

    form.return_to_editing();
    assert_eq!(form.popup(), None);
    assert_eq!(form.answered_count(), 3);

    fill(&mut form, 4..=16);
    assert_eq!(form.request_submit(), IntakePopup::ConfirmSubmit);
    assert_eq!(form.popup(), Some(IntakePopup::ConfirmSubmit));
}

// ─────────────────────────────────────────────────────────
// Gathering
// ─────────────────────────────────────────────────────────

#[test]
fn test_gather_prefers_live_edit_over_draft() {
    let mut form = form();
    form.load_draft(vec![draft_record(1, "Less than a month"), draft_record(2, "Female")]);
    form.record_answer(q(1), "More than a year", "v1-new").unwrap();

    let submission = form.gather_submission(false);

    assert_eq!(submission.responses, vec!["More than a year", "Female"]);
    assert_eq!(submission.version_ids, vec!["v1-new", "v2"]);
    assert!(!submission.is_final);
}

#[test]
fn test_gather_strips_empty_answers() {
    let mut form = form();
    form.toggle_option(q(4), "Self-esteem", true, "v4").unwrap();
    form.toggle_option(q(4), "Self-esteem", false, "v4").unwrap();
    form.record_answer(q(3), NO, "v3").unwrap();

    let submission = form.gather_submission(true);
    assert_eq!(submission.responses, vec![NO]);
    assert!(submission.is_final);
}

// ─────────────────────────────────────────────────────────
// Remote binding
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_activate_loads_questions_and_draft() {
    let service = FakePortalService::new()
        .with_questions(question_records(16))
        .with_drafts(vec![draft_record(3, YES)]);
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = IntakeForm::new(QuestionCatalog::introduction(), MIN_ANSWERED);

    form.activate(&service, &host).await.unwrap();

    assert_eq!(
        service.calls(),
        vec![
            "fetch_questions:Introduction",
            "fetch_draft_responses:Introduction"
        ]
    );
    assert!(form.slot(q(16)).is_some());
    assert!(form.is_answered(q(3)));
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_activate_failure_reports_and_redirects() {
    let service = FakePortalService::new();
    service.fail_on("fetch_questions", "INSUFFICIENT_ACCESS");
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = IntakeForm::new(QuestionCatalog::introduction(), MIN_ANSWERED);

    assert!(form.activate(&service, &host).await.is_err());
    assert_eq!(errors.messages(), vec!["INSUFFICIENT_ACCESS"]);
    assert_eq!(navigator.visited(), vec!["/Branded/s/error"]);
}

#[tokio::test]
async fn test_save_draft_with_nothing_redirects_to_outstanding() {
    let service = FakePortalService::new();
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();

    let outcome = form.save_draft(&service, &host).await.unwrap();

    assert_eq!(outcome, DraftSaveOutcome::NothingToSave);
    assert!(service.calls().is_empty());
    assert_eq!(
        navigator.last().as_deref(),
        Some("/Branded/s/outstanding-questionnaire")
    );
}

#[tokio::test]
async fn test_save_draft_submits_partial_answers() {
    let service = FakePortalService::new();
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();
    fill(&mut form, 1..=3);

    let outcome = form.save_draft(&service, &host).await.unwrap();

    assert_eq!(outcome, DraftSaveOutcome::Saved { responses: 3 });
    assert!(form.is_draft_saved());
    assert_eq!(service.calls(), vec!["submit_responses:draft:3"]);
    assert!(navigator.visited().is_empty());

    form.close_draft_saved_popup(&host);
    assert!(!form.is_draft_saved());
    assert_eq!(
        navigator.visited(),
        vec!["/Branded/s/outstanding-questionnaire"]
    );
}

#[tokio::test]
async fn test_save_draft_deletes_cleared_multi_choice_draft_first() {
    let service = FakePortalService::new();
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();
    form.load_draft(vec![draft_record(1, "Less than a month"), draft_record(4, "Self-esteem")]);
    form.toggle_option(q(4), "Self-esteem", false, "v4").unwrap();

    form.save_draft(&service, &host).await.unwrap();

    assert_eq!(
        service.calls(),
        vec!["delete_draft_response:d4", "submit_responses:draft:1"]
    );
    assert!(form.draft(q(4)).is_none());
    assert!(form.stale_draft_records().is_empty());
}

#[tokio::test]
async fn test_confirm_submit_redirects_to_outstanding() {
    let service = FakePortalService::new();
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();
    fill(&mut form, 1..=16);
    form.request_submit();

    form.confirm_submit(&service, &host).await.unwrap();

    let submissions = service.submissions();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].is_final);
    assert_eq!(submissions[0].len(), 16);
    assert_eq!(form.popup(), None);
    assert_eq!(
        navigator.visited(),
        vec!["/Branded/s/outstanding-questionnaire"]
    );
}

#[tokio::test]
async fn test_confirm_submit_incomplete_makes_no_remote_call() {
    let service = FakePortalService::new();
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();
    fill(&mut form, 1..=4);

    let err = form.confirm_submit(&service, &host).await.unwrap_err();

    assert!(matches!(err, Error::IncompleteQuestionnaire { .. }));
    assert_eq!(form.popup(), Some(IntakePopup::Incomplete));
    assert!(service.calls().is_empty());
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_submit_failure_reports_service_message_and_keeps_answers() {
    let service = FakePortalService::new();
    service.fail_on("submit_responses", "SERVICE_DOWN");
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut form = form();
    fill(&mut form, 1..=16);

    let err = form.confirm_submit(&service, &host).await.unwrap_err();

    assert!(matches!(err, Error::RemoteService { .. }));
    assert!(errors.last().unwrap().contains("SERVICE_DOWN"));
    assert_eq!(navigator.visited(), vec!["/Branded/s/error"]);
    assert_eq!(form.answered_count(), 16);
}

// ─────────────────────────────────────────────────────────
// Tabs
// ─────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn test_tabs_hidden_until_something_is_completed() {
    let mut tabs = QuestionnaireTabs::new();
    tabs.load(AssessmentCounts::default(), EnrollmentDates::default(), None);

    assert!(!tabs.show_tab_menu);
    assert!(!tabs.show_summary_tab);
    assert!(tabs.qualitative_disabled);
}

#[test]
fn test_summary_tab_ignores_qsq() {
    let mut tabs = QuestionnaireTabs::new();
    tabs.load(
        AssessmentCounts::from_slice(&[0, 0, 0, 1]),
        EnrollmentDates::default(),
        None,
    );

    assert!(tabs.show_tab_menu);
    assert!(!tabs.show_summary_tab);
}

#[test]
fn test_completed_page_follows_priority_order() {
    let pages = crate::config::PageSettings::default();
    let mut tabs = QuestionnaireTabs::new();

    tabs.load(
        AssessmentCounts::from_slice(&[1, 1, 0, 1]),
        EnrollmentDates::default(),
        None,
    );
    assert_eq!(tabs.completed_page(&pages), Some("pss-completed-questionnaire"));

    tabs.load(
        AssessmentCounts::from_slice(&[1, 0, 1, 0]),
        EnrollmentDates::default(),
        None,
    );
    assert_eq!(tabs.completed_page(&pages), Some("dlqi-completed-questionnaire"));
}

#[test]
fn test_qsq_completed_page_depends_on_status_and_dates() {
    let pages = crate::config::PageSettings::default();
    let counts = AssessmentCounts::from_slice(&[0, 0, 0, 1]);
    let dates = EnrollmentDates {
        target_two_months_date: date(2026, 1, 10),
        target_fourteen_weeks_date: date(2026, 3, 2),
    };
    let mut tabs = QuestionnaireTabs::new();

    tabs.load(counts, dates, Some("Completed".to_string()));
    assert_eq!(tabs.completed_page(&pages), Some("qsq-completed-fourteen-weeks"));

    tabs.load(counts, dates, Some("In Progress".to_string()));
    assert_eq!(tabs.completed_page(&pages), Some("qsq-completed-two-months"));
}

#[test]
fn test_open_completed_does_nothing_when_none_completed() {
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let tabs = QuestionnaireTabs::new();

    assert!(!tabs.open_completed(&host));
    assert!(navigator.visited().is_empty());
}

#[test]
fn test_open_qualitative_prefers_fourteen_weeks() {
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut tabs = QuestionnaireTabs::new();

    tabs.load(
        AssessmentCounts::default(),
        EnrollmentDates {
            target_two_months_date: date(2026, 1, 10),
            target_fourteen_weeks_date: None,
        },
        None,
    );
    assert!(!tabs.qualitative_disabled);
    assert!(tabs.open_qualitative(&host));

    tabs.load(
        AssessmentCounts::default(),
        EnrollmentDates {
            target_two_months_date: date(2026, 1, 10),
            target_fourteen_weeks_date: date(2026, 3, 2),
        },
        None,
    );
    assert!(tabs.open_qualitative(&host));

    assert_eq!(
        navigator.visited(),
        vec![
            "/Branded/s/qualitative-two-months",
            "/Branded/s/qualitative-fourteen-weeks"
        ]
    );
}

#[tokio::test]
async fn test_tabs_activate_fetches_remote_state() {
    let service = FakePortalService::new()
        .with_counts(AssessmentCounts::from_slice(&[2, 0, 0, 0]))
        .with_qualitative_status("Completed");
    let navigator = RecordingNavigator::default();
    let errors = RecordingErrorSlot::default();
    let host = test_host(&navigator, &errors, branded_site());
    let mut tabs = QuestionnaireTabs::new();

    tabs.activate(&service, &host).await.unwrap();

    assert!(tabs.show_summary_tab);
    assert!(tabs.is_completed(Assessment::Wpai));
    assert!(!tabs.is_completed(Assessment::Dlqi));
    tabs.open_completed(&host);
    assert_eq!(
        navigator.visited(),
        vec!["/Branded/s/wpai-completed-questionnaire"]
    );
}

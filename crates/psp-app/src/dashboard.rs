//! Dashboard action notifications
//!
//! Shows the three most relevant action notifications. Notification-setting
//! and questionnaire reminders go ahead of everything else.

use chrono::{DateTime, Utc};
use psp_core::prelude::*;
use psp_core::NotificationTask;

use crate::config::PageSettings;
use crate::services::{ErrorReportingPort, LocalNotificationService, NavigationPort, PageHost};

/// Notification type marking a task the user must act on
pub const ACTION_TYPE: &str = "Action";

pub const NOTIFICATION_SETTING: &str = "Notification Setting";
pub const MY_QUESTIONNAIRES: &str = "My Questionnaires";
pub const SYMPTOM: &str = "Symptom Tracker";
pub const DATE_OF_TREATMENT: &str = "Date of Treatment";
pub const TREATMENT: &str = "Treatment";
pub const PRESCRIPTION: &str = "Prescription";
pub const WPAI: &str = "WPAI";
pub const QSQ: &str = "QSQ";
pub const PSS: &str = "PSS";
pub const DLQI: &str = "DLQI";

/// Most notifications shown at once
pub const MAX_VISIBLE_TASKS: usize = 3;

/// Button offered on an action notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    NotificationSetting,
    Symptom,
    Questionnaires,
    DateOfTreatment,
    Prescription,
    Wpai,
    Qsq,
    Pss,
    Dlqi,
}

impl TaskAction {
    fn from_category(category: &str) -> Option<Self> {
        let action = match category {
            NOTIFICATION_SETTING => TaskAction::NotificationSetting,
            SYMPTOM => TaskAction::Symptom,
            MY_QUESTIONNAIRES => TaskAction::Questionnaires,
            DATE_OF_TREATMENT | TREATMENT => TaskAction::DateOfTreatment,
            PRESCRIPTION => TaskAction::Prescription,
            WPAI => TaskAction::Wpai,
            QSQ => TaskAction::Qsq,
            PSS => TaskAction::Pss,
            DLQI => TaskAction::Dlqi,
            _ => return None,
        };
        Some(action)
    }

    /// Page opened by the action button
    pub fn page<'a>(&self, pages: &'a PageSettings) -> &'a str {
        match self {
            TaskAction::NotificationSetting => &pages.patient_notifications,
            TaskAction::Symptom => &pages.symptom_main,
            TaskAction::Wpai => &pages.wpai,
            TaskAction::Qsq => &pages.qsq,
            TaskAction::Pss => &pages.pss,
            TaskAction::Dlqi => &pages.dlqi,
            TaskAction::Questionnaires
            | TaskAction::DateOfTreatment
            | TaskAction::Prescription => &pages.action_required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskIcon {
    NotificationSetting,
    Symptom,
    Questionnaire,
    Treatment,
    Assessment,
}

impl TaskIcon {
    fn from_category(category: &str) -> Option<Self> {
        match category {
            NOTIFICATION_SETTING => Some(TaskIcon::NotificationSetting),
            SYMPTOM => Some(TaskIcon::Symptom),
            MY_QUESTIONNAIRES => Some(TaskIcon::Questionnaire),
            PRESCRIPTION | TREATMENT | DATE_OF_TREATMENT => Some(TaskIcon::Treatment),
            WPAI | QSQ | PSS | DLQI => Some(TaskIcon::Assessment),
            _ => None,
        }
    }
}

/// A notification as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub subject: String,
    pub created_date: DateTime<Utc>,
    pub category: String,
    /// Only set for action notifications with a known category
    pub action: Option<TaskAction>,
    pub icon: Option<TaskIcon>,
}

impl TaskView {
    pub fn from_task(task: NotificationTask) -> Self {
        let action = if task.notification_type == ACTION_TYPE {
            TaskAction::from_category(&task.category)
        } else {
            None
        };
        Self {
            icon: TaskIcon::from_category(&task.category),
            action,
            id: task.id,
            subject: task.subject,
            created_date: task.created_date,
            category: task.category,
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> String {
        elapsed_text(self.created_date, now)
    }

    fn rank(&self) -> u8 {
        match self.category.as_str() {
            NOTIFICATION_SETTING => 0,
            MY_QUESTIONNAIRES => 1,
            _ => 2,
        }
    }
}

/// "N days H hrs M mins ago", without the day part under 24 hours
pub fn elapsed_text(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created).num_minutes().max(0);
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours >= 24 {
        format!("{} days {} hrs {} mins ago", hours / 24, hours % 24, mins)
    } else {
        format!("{} hrs {} mins ago", hours, mins)
    }
}

/// Order by rank, newest first within a rank, and keep the top entries
pub fn prioritize(tasks: Vec<NotificationTask>) -> Vec<TaskView> {
    let mut views: Vec<TaskView> = tasks.into_iter().map(TaskView::from_task).collect();
    views.sort_by(|a, b| {
        a.rank()
            .cmp(&b.rank())
            .then_with(|| b.created_date.cmp(&a.created_date))
    });
    views.truncate(MAX_VISIBLE_TASKS);
    views
}

#[derive(Debug, Clone, Default)]
pub struct DashboardNotifications {
    tasks: Vec<TaskView>,
    open_question_tasks: Option<u32>,
}

impl DashboardNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[TaskView] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Question tasks still open after the last status sync
    pub fn open_question_tasks(&self) -> Option<u32> {
        self.open_question_tasks
    }

    /// Sync question task status, then load the action notifications
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalNotificationService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let open = host.report(service.mark_question_tasks_completed().await)?;
        self.open_question_tasks = Some(open);

        let tasks = host.report(service.action_notifications().await)?;
        self.load(tasks);
        Ok(())
    }

    pub fn load(&mut self, tasks: Vec<NotificationTask>) {
        debug!("Loaded {} action notifications", tasks.len());
        self.tasks = prioritize(tasks);
    }

    pub fn find(&self, task_id: &str) -> Option<&TaskView> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Open the page behind a task's action button
    pub fn open_action<N, E>(&self, task_id: &str, host: &PageHost<N, E>) -> Result<()>
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let action = self
            .find(task_id)
            .and_then(|t| t.action)
            .ok_or_else(|| Error::validation(format!("Task {} has no action", task_id)))?;
        host.redirect(action.page(host.pages()));
        Ok(())
    }

    /// Mark a symptom reminder completed, then open the symptom tracker
    pub async fn open_symptom<S, N, E>(
        &self,
        task_id: &str,
        service: &S,
        host: &PageHost<N, E>,
    ) -> Result<()>
    where
        S: LocalNotificationService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        host.report(service.mark_task_completed(task_id).await)?;
        info!("Symptom task {} completed", task_id);
        host.redirect(&host.pages().symptom_main);
        Ok(())
    }

    pub fn open_all<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().action_required);
    }

    pub fn open_personalise<N: NavigationPort, E: ErrorReportingPort>(
        &self,
        host: &PageHost<N, E>,
    ) {
        host.redirect(&host.pages().personalise);
    }
}

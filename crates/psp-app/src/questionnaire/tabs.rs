//! Tab menu shared by the questionnaire landing pages

use psp_core::prelude::*;
use psp_core::{AssessmentCounts, EnrollmentDates};

use crate::config::PageSettings;
use crate::services::{ErrorReportingPort, LocalAssessmentService, NavigationPort, PageHost};

/// Qualitative assessment statuses after which the QSQ results page is the
/// fourteen-week one
const QSQ_CLOSED_STATUSES: &[&str] = &["Completed", "Expired"];

/// Standardised assessments with a "completed" results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Dlqi,
    Pss,
    Wpai,
    Qsq,
}

impl Assessment {
    /// Order the "completed" tab opens them in
    pub const COMPLETED_ORDER: [Assessment; 4] = [
        Assessment::Dlqi,
        Assessment::Pss,
        Assessment::Wpai,
        Assessment::Qsq,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct QuestionnaireTabs {
    counts: AssessmentCounts,
    dates: EnrollmentDates,
    qualitative_status: Option<String>,
    pub show_tab_menu: bool,
    pub show_summary_tab: bool,
    pub qualitative_disabled: bool,
}

impl QuestionnaireTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        counts: AssessmentCounts,
        dates: EnrollmentDates,
        qualitative_status: Option<String>,
    ) {
        self.show_tab_menu = counts.any_completed();
        self.show_summary_tab = counts.wpai != 0 || counts.pss != 0 || counts.dlqi != 0;

        let no_dates =
            dates.target_two_months_date.is_none() && dates.target_fourteen_weeks_date.is_none();
        self.qualitative_disabled = no_dates || counts.qsq != 0;

        self.counts = counts;
        self.dates = dates;
        self.qualitative_status = qualitative_status;
    }

    /// Fetch counts, target dates and the qualitative status
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let counts = host.report(service.assessment_counts().await)?;
        let dates = host.report(service.enrollment_dates().await)?;
        let status = host.report(service.qualitative_status().await)?;
        self.load(counts, dates, status);
        Ok(())
    }

    pub fn is_completed(&self, assessment: Assessment) -> bool {
        let count = match assessment {
            Assessment::Dlqi => self.counts.dlqi,
            Assessment::Pss => self.counts.pss,
            Assessment::Wpai => self.counts.wpai,
            Assessment::Qsq => self.counts.qsq,
        };
        count > 0
    }

    /// Results page of the first completed assessment
    pub fn completed_page<'a>(&self, pages: &'a PageSettings) -> Option<&'a str> {
        let first = Assessment::COMPLETED_ORDER
            .into_iter()
            .find(|a| self.is_completed(*a))?;

        let slug = match first {
            Assessment::Dlqi => &pages.dlqi_completed,
            Assessment::Pss => &pages.pss_completed,
            Assessment::Wpai => &pages.wpai_completed,
            Assessment::Qsq => {
                let closed = self
                    .qualitative_status
                    .as_deref()
                    .is_some_and(|s| QSQ_CLOSED_STATUSES.contains(&s));
                if self.dates.target_fourteen_weeks_date.is_some() && closed {
                    &pages.qsq_fourteen_weeks_completed
                } else {
                    &pages.qsq_two_months_completed
                }
            }
        };
        Some(slug.as_str())
    }

    /// Qualitative questionnaire page for the latest target date
    pub fn qualitative_page<'a>(&self, pages: &'a PageSettings) -> Option<&'a str> {
        if self.dates.target_fourteen_weeks_date.is_some() {
            Some(pages.qualitative_fourteen_weeks.as_str())
        } else if self.dates.target_two_months_date.is_some() {
            Some(pages.qualitative_two_months.as_str())
        } else {
            None
        }
    }

    /// Returns `false` when nothing is completed yet
    pub fn open_completed<N, E>(&self, host: &PageHost<N, E>) -> bool
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        match self.completed_page(host.pages()) {
            Some(slug) => {
                host.redirect(slug);
                true
            }
            None => {
                debug!("No completed questionnaires to open");
                false
            }
        }
    }

    pub fn open_outstanding<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().outstanding);
    }

    pub fn open_summary<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().summary);
    }

    pub fn open_personalise<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().personalise);
    }

    /// Returns `false` when no target date is set
    pub fn open_qualitative<N, E>(&self, host: &PageHost<N, E>) -> bool
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        match self.qualitative_page(host.pages()) {
            Some(slug) => {
                host.redirect(slug);
                true
            }
            None => false,
        }
    }
}

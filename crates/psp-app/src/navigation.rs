//! Portal navigation bar
//!
//! The bar always links into the unassigned site, rooted at the origin of the
//! current page. Remote failures go to the dedicated navigation error page
//! rather than the regular error page.

use psp_core::prelude::*;
use psp_core::{CurrentUser, PatientStatus};
use url::Url;

use crate::config::{PageSettings, SiteSettings};
use crate::questionnaire::QuestionnaireTabs;
use crate::routing::{join, last_segment, origin};
use crate::services::{
    ErrorReportingPort, LocalAccountService, LocalAssessmentService, NavigationPort, PageHost,
};

/// Top-level menu entries that can be underlined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
    Home,
    InformationCenter,
    SymptomTracker,
    Challenges,
    Questionnaires,
    Community,
    Support,
}

/// Community pages, all gated on a community username
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityPage {
    AllPosts,
    MyPosts,
    Followers,
    Following,
}

/// Menu section owning a page slug
pub fn section_for(segment: &str, pages: &PageSettings) -> Option<MenuSection> {
    let table: [(MenuSection, Vec<&String>); 7] = [
        (
            MenuSection::Home,
            vec![&pages.dashboard, &pages.acute_dashboard],
        ),
        (
            MenuSection::InformationCenter,
            vec![
                &pages.info_landing,
                &pages.article_category,
                &pages.search_results,
                &pages.detailed_article,
                &pages.acute_video,
            ],
        ),
        (
            MenuSection::SymptomTracker,
            vec![
                &pages.symptom_landing,
                &pages.symptom_graph,
                &pages.symptom_main,
            ],
        ),
        (
            MenuSection::Challenges,
            vec![&pages.challenges, &pages.trophy_case],
        ),
        (
            MenuSection::Questionnaires,
            vec![
                &pages.outstanding,
                &pages.summary,
                &pages.personalise,
                &pages.dlqi,
                &pages.pss,
                &pages.wpai,
                &pages.qsq,
                &pages.dlqi_completed,
                &pages.pss_completed,
                &pages.wpai_completed,
                &pages.qsq_two_months_completed,
                &pages.qsq_fourteen_weeks_completed,
                &pages.qualitative_two_months,
                &pages.qualitative_fourteen_weeks,
            ],
        ),
        (
            MenuSection::Community,
            vec![
                &pages.all_posts,
                &pages.my_posts,
                &pages.followers,
                &pages.following,
                &pages.create_post,
                &pages.community_signup,
            ],
        ),
        (
            MenuSection::Support,
            vec![
                &pages.support,
                &pages.my_cases,
                &pages.medical_enquiry,
                &pages.adverse_event,
                &pages.platform_support,
            ],
        ),
    ];

    table
        .into_iter()
        .find(|(_, slugs)| slugs.iter().any(|s| s.as_str() == segment))
        .map(|(section, _)| section)
}

#[derive(Debug, Clone)]
pub struct NavigationBar {
    href: String,
    origin: String,
    base_url: String,
    login_url: String,
    pages: PageSettings,
    user: Option<CurrentUser>,
    patient_status: PatientStatus,
    tabs: QuestionnaireTabs,

    /// Underlined menu entry; `None` when the page belongs to no section
    pub active_section: Option<MenuSection>,
    pub show_menu: bool,
    pub show_login: bool,
    pub patient_menu: bool,
    pub caregiver_menu: bool,
    /// A caregiver with at least one active patient
    pub show_caregiver_menus: bool,
    pub show_treatment_video: bool,
    pub show_logout_popup: bool,
    pub selected_patient_name: Option<String>,
}

impl NavigationBar {
    /// Build the bar for the page at `href`
    pub fn new(href: &str, site: &SiteSettings, pages: PageSettings) -> Result<Self> {
        let origin = origin(href)?;
        let base_url = join(&origin, &site.unassigned_base_url);
        let login_url = join(&join(&origin, &site.branded_base_url), &pages.login);

        let active_section = match last_segment(href) {
            Some(segment) => section_for(&segment, &pages),
            None => Some(MenuSection::Home),
        };

        Ok(Self {
            href: href.to_string(),
            origin,
            base_url,
            login_url,
            pages,
            user: None,
            patient_status: PatientStatus::default(),
            tabs: QuestionnaireTabs::new(),
            active_section,
            show_menu: false,
            show_login: true,
            patient_menu: false,
            caregiver_menu: false,
            show_caregiver_menus: false,
            show_treatment_video: false,
            show_logout_popup: false,
            selected_patient_name: None,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `origin` + unassigned base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn user_name(&self) -> Option<String> {
        self.user.as_ref().map(CurrentUser::display_name)
    }

    pub fn show_tab_menu(&self) -> bool {
        self.tabs.show_tab_menu
    }

    pub fn page_url(&self, slug: &str) -> String {
        join(&self.base_url, slug)
    }

    pub fn error_url(&self) -> String {
        self.page_url(&self.pages.nav_error)
    }

    fn is_caregiver(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_caregiver)
    }

    // ─────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────

    /// Load the user and questionnaire state.
    ///
    /// Any failure is recorded and sends the user to the navigation error
    /// page.
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAccountService + LocalAssessmentService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let result = self.load(service).await;
        if let Err(ref e) = result {
            host.fail_to(e, &self.error_url());
        }
        result
    }

    async fn load<S>(&mut self, service: &S) -> Result<()>
    where
        S: LocalAccountService + LocalAssessmentService,
    {
        self.patient_status = service.patient_status().await?;
        self.show_treatment_video = self.patient_status == PatientStatus::Unassigned;

        let user = service.current_user().await?;
        debug!("Navigation bar for {:?} user {}", user.profile, user.id);

        if user.profile.has_portal_menu() {
            self.show_menu = true;
            self.show_login = false;
            self.patient_menu = !user.is_caregiver;
            self.caregiver_menu = user.is_caregiver;
        } else {
            self.show_menu = false;
            self.show_login = true;
        }

        if user.is_caregiver {
            let patients = service.caregiver_patients().await?;
            self.show_caregiver_menus = !patients.is_empty();
            let selected = service.linked_accounts().await?;
            self.selected_patient_name = selected.into_iter().next().map(|a| a.name);
        }
        self.user = Some(user);

        let counts = service.assessment_counts().await?;
        let dates = service.enrollment_dates().await?;
        let status = service.qualitative_status().await?;
        self.tabs.load(counts, dates, status);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Targets
    // ─────────────────────────────────────────────────────────

    /// Acute patients land on their own dashboard
    pub fn home_url(&self) -> String {
        if self.patient_status == PatientStatus::Acute {
            self.page_url(&self.pages.acute_dashboard)
        } else {
            self.base_url.clone()
        }
    }

    pub fn profile_url(&self) -> String {
        if self.is_caregiver() {
            self.page_url(&self.pages.caregiver_profile)
        } else {
            self.page_url(&self.pages.patient_profile)
        }
    }

    pub fn notification_settings_url(&self) -> String {
        if self.is_caregiver() {
            self.page_url(&self.pages.caregiver_notifications)
        } else {
            self.page_url(&self.pages.patient_notifications)
        }
    }

    /// First completed questionnaire, `None` when nothing is completed
    pub fn completed_questionnaire_url(&self) -> Option<String> {
        self.tabs
            .completed_page(&self.pages)
            .map(|slug| self.page_url(slug))
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Secure logout on the current site, returning to the branded login
    pub fn logout_url(&self) -> Result<String> {
        let url = Url::parse(&self.href).map_err(|_| Error::route_resolution(&self.href))?;
        let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
        let site_root = segments
            .iter()
            .position(|s| *s == "s")
            .ok_or_else(|| Error::route_resolution(url.path()))?;

        let mut prefix = self.origin.clone();
        for segment in &segments[..site_root] {
            prefix.push('/');
            prefix.push_str(segment);
        }
        prefix.push('/');

        Ok(format!(
            "{}{}{}",
            prefix, self.pages.secure_logout, self.login_url
        ))
    }

    pub fn open<N: NavigationPort, E: ErrorReportingPort>(&self, slug: &str, host: &PageHost<N, E>) {
        host.redirect_to(&self.page_url(slug));
    }

    pub fn open_home<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect_to(&self.home_url());
    }

    pub fn open_completed_questionnaire<N, E>(&self, host: &PageHost<N, E>) -> bool
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        match self.completed_questionnaire_url() {
            Some(url) => {
                host.redirect_to(&url);
                true
            }
            None => false,
        }
    }

    /// Open a community page, or the sign-up page when the user has no
    /// community username yet
    pub async fn open_community<S, N, E>(
        &self,
        page: CommunityPage,
        service: &S,
        host: &PageHost<N, E>,
    ) -> Result<()>
    where
        S: LocalAccountService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let has_username = match service.has_community_username().await {
            Ok(value) => value,
            Err(e) => {
                host.fail_to(&e, &self.error_url());
                return Err(e);
            }
        };

        let slug = if has_username {
            match page {
                CommunityPage::AllPosts => &self.pages.all_posts,
                CommunityPage::MyPosts => &self.pages.my_posts,
                CommunityPage::Followers => &self.pages.followers,
                CommunityPage::Following => &self.pages.following,
            }
        } else {
            &self.pages.community_signup
        };
        self.open(slug, host);
        Ok(())
    }

    pub fn request_logout(&mut self) {
        self.show_logout_popup = true;
    }

    pub fn cancel_logout(&mut self) {
        self.show_logout_popup = false;
    }

    pub fn confirm_logout<N, E>(&mut self, host: &PageHost<N, E>) -> Result<()>
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.show_logout_popup = false;
        match self.logout_url() {
            Ok(url) => {
                host.redirect_to(&url);
                Ok(())
            }
            Err(e) => {
                host.fail_to(&e, &self.error_url());
                Err(e)
            }
        }
    }
}

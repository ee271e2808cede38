//! Configuration types for the portal controllers
//!
//! Defines:
//! - `Settings` - Root of `.psp/config.toml`
//! - `SiteSettings` - Site markers and base URLs
//! - `PageSettings` - Page slugs appended to a site base
//! - `UploadSettings` / `FormSettings` - Validation limits

use serde::{Deserialize, Serialize};

/// Portal settings (.psp/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub site: SiteSettings,

    #[serde(default)]
    pub pages: PageSettings,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub forms: FormSettings,
}

/// Site variant markers and the base URL each one resolves to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteSettings {
    /// Path segment identifying the branded site (matched case-insensitively)
    #[serde(default = "default_branded_marker")]
    pub branded_marker: String,

    /// Path segment identifying the unassigned site (matched case-insensitively)
    #[serde(default = "default_unassigned_marker")]
    pub unassigned_marker: String,

    #[serde(default = "default_branded_base_url")]
    pub branded_base_url: String,

    #[serde(default = "default_unassigned_base_url")]
    pub unassigned_base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            branded_marker: default_branded_marker(),
            unassigned_marker: default_unassigned_marker(),
            branded_base_url: default_branded_base_url(),
            unassigned_base_url: default_unassigned_base_url(),
        }
    }
}

fn default_branded_marker() -> String {
    "Branded".to_string()
}

fn default_unassigned_marker() -> String {
    "Unassigned".to_string()
}

fn default_branded_base_url() -> String {
    "/Branded/s/".to_string()
}

fn default_unassigned_base_url() -> String {
    "/Unassigned/s/".to_string()
}

/// Page slugs, joined onto a site base URL
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageSettings {
    pub error: String,
    pub nav_error: String,
    pub login: String,
    pub secure_logout: String,

    // Dashboards
    pub dashboard: String,
    pub acute_dashboard: String,
    pub acute_video: String,

    // Questionnaires
    pub outstanding: String,
    pub summary: String,
    pub personalise: String,
    pub dlqi: String,
    pub pss: String,
    pub wpai: String,
    pub qsq: String,
    pub dlqi_completed: String,
    pub pss_completed: String,
    pub wpai_completed: String,
    pub qsq_two_months_completed: String,
    pub qsq_fourteen_weeks_completed: String,
    pub qualitative_two_months: String,
    pub qualitative_fourteen_weeks: String,

    // Support
    pub support: String,
    pub my_cases: String,
    pub medical_enquiry: String,
    pub adverse_event: String,
    pub platform_support: String,
    pub update_prescription: String,
    pub prescription_status: String,

    // Information centre
    pub info_landing: String,
    pub article_category: String,
    pub detailed_article: String,
    pub search_results: String,

    // Symptom tracker
    pub symptom_landing: String,
    pub symptom_graph: String,
    pub symptom_main: String,

    // Challenges
    pub challenges: String,
    pub trophy_case: String,

    // Notification centre
    pub message_center: String,
    pub action_required: String,
    pub history: String,

    // Account manager
    pub patient_profile: String,
    pub patient_caregiver: String,
    pub patient_avatar: String,
    pub patient_notifications: String,
    pub caregiver_profile: String,
    pub caregiver_patient: String,
    pub caregiver_avatar: String,
    pub caregiver_notifications: String,

    // Community
    pub all_posts: String,
    pub my_posts: String,
    pub followers: String,
    pub following: String,
    pub create_post: String,
    pub community_signup: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        let slug = |s: &str| s.to_string();
        Self {
            error: slug("error"),
            nav_error: slug("display-nav-error"),
            login: slug("login"),
            secure_logout: slug("secur/logout.jsp?retUrl="),

            dashboard: slug("dashboard"),
            acute_dashboard: slug("acute-dashboard"),
            acute_video: slug("acute-treatment-video"),

            outstanding: slug("outstanding-questionnaire"),
            summary: slug("summary"),
            personalise: slug("lets-personalise"),
            dlqi: slug("dlqi-questionnaire"),
            pss: slug("psoriasis-symptom-scale"),
            wpai: slug("wpai-questionnaire"),
            qsq: slug("qsq-questionnaire"),
            dlqi_completed: slug("dlqi-completed-questionnaire"),
            pss_completed: slug("pss-completed-questionnaire"),
            wpai_completed: slug("wpai-completed-questionnaire"),
            qsq_two_months_completed: slug("qsq-completed-two-months"),
            qsq_fourteen_weeks_completed: slug("qsq-completed-fourteen-weeks"),
            qualitative_two_months: slug("qualitative-two-months"),
            qualitative_fourteen_weeks: slug("qualitative-fourteen-weeks"),

            support: slug("support-center"),
            my_cases: slug("my-cases"),
            medical_enquiry: slug("medical-information-enquiry"),
            adverse_event: slug("report-adverse-events"),
            platform_support: slug("platform-support"),
            update_prescription: slug("update-prescription"),
            prescription_status: slug("prescription-status"),

            info_landing: slug("information-center"),
            article_category: slug("article-category"),
            detailed_article: slug("detailed-article"),
            search_results: slug("search-results"),

            symptom_landing: slug("symptom-tracker"),
            symptom_graph: slug("symptom-tracker-graph"),
            symptom_main: slug("symptom-tracker-main"),

            challenges: slug("challenges"),
            trophy_case: slug("trophy-case"),

            message_center: slug("message-center"),
            action_required: slug("action-required"),
            history: slug("history"),

            patient_profile: slug("my-profile"),
            patient_caregiver: slug("my-caregiver"),
            patient_avatar: slug("select-avatar"),
            patient_notifications: slug("notification-settings"),
            caregiver_profile: slug("caregiver-profile"),
            caregiver_patient: slug("caregiver-patient"),
            caregiver_avatar: slug("caregiver-select-avatar"),
            caregiver_notifications: slug("caregiver-notification-settings"),

            all_posts: slug("all-posts"),
            my_posts: slug("my-posts"),
            followers: slug("followers"),
            following: slug("following"),
            create_post: slug("create-post"),
            community_signup: slug("community-signup"),
        }
    }
}

/// Attachment limits shared by every case-intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Raw bytes across pending and persisted attachments
    #[serde(default = "default_max_bytes")]
    pub max_total_bytes: u64,

    #[serde(default = "default_max_bytes")]
    pub max_file_bytes: u64,

    /// Displayed file names are cut after this many characters
    #[serde(default = "default_file_name_display_chars")]
    pub file_name_display_chars: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_total_bytes: default_max_bytes(),
            max_file_bytes: default_max_bytes(),
            file_name_display_chars: default_file_name_display_chars(),
        }
    }
}

fn default_max_files() -> usize {
    3
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_file_name_display_chars() -> usize {
    24
}

/// Form validation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSettings {
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,

    /// Answers required before the questionnaire can be submitted
    #[serde(default = "default_questionnaire_min_answered")]
    pub questionnaire_min_answered: usize,

    /// Patients at or above this age manage their own account
    #[serde(default = "default_minor_age")]
    pub minor_age: u32,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            description_max_chars: default_description_max_chars(),
            questionnaire_min_answered: default_questionnaire_min_answered(),
            minor_age: default_minor_age(),
        }
    }
}

fn default_description_max_chars() -> usize {
    1000
}

fn default_questionnaire_min_answered() -> usize {
    13
}

fn default_minor_age() -> u32 {
    18
}

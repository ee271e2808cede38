//! Account manager menus and the prescription landing page

use psp_core::prelude::*;
use psp_core::{PatientStatus, UserProfile};

use crate::config::{FormSettings, PageSettings};
use crate::services::{ErrorReportingPort, LocalAccountService, NavigationPort, PageHost};

/// Account manager menu shown to caregivers
#[derive(Debug, Clone)]
pub struct CaregiverProfileMenu {
    minor_age: u32,
    patient_is_adult: bool,
}

impl CaregiverProfileMenu {
    pub fn new(forms: &FormSettings) -> Self {
        Self {
            minor_age: forms.minor_age,
            patient_is_adult: false,
        }
    }

    /// The selected patient has reached the minor age
    pub fn is_patient_adult(&self) -> bool {
        self.patient_is_adult
    }

    /// Check the selected patient's age.
    ///
    /// A caregiver with no linked patient cannot use the menu and is sent
    /// to the error page.
    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAccountService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let accounts = host.report(service.linked_accounts().await)?;
        let Some(patient) = accounts.into_iter().next() else {
            let err = Error::remote("linked_accounts", "Record Not Found");
            host.fail(&err);
            return Err(err);
        };

        self.patient_is_adult = patient.age.is_some_and(|age| age >= self.minor_age);
        debug!(
            "Patient {} is {}",
            patient.id,
            if self.patient_is_adult { "an adult" } else { "a minor" }
        );
        Ok(())
    }

    pub fn open_patient<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().caregiver_patient);
    }

    pub fn open_avatar<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().caregiver_avatar);
    }

    pub fn open_notifications<N: NavigationPort, E: ErrorReportingPort>(
        &self,
        host: &PageHost<N, E>,
    ) {
        host.redirect(&host.pages().caregiver_notifications);
    }
}

/// Link to the notification settings page of the current user's profile
#[derive(Debug, Clone, Default)]
pub struct NotificationSettingsLink {
    profile: Option<UserProfile>,
}

impl NotificationSettingsLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile
    }

    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAccountService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let user = host.report(service.current_user().await)?;
        self.profile = Some(user.profile);
        Ok(())
    }

    /// Only patients and caregivers have notification settings
    pub fn target<'a>(&self, pages: &'a PageSettings) -> Option<&'a str> {
        match self.profile? {
            UserProfile::Patient => Some(&pages.patient_notifications),
            UserProfile::Caregiver => Some(&pages.caregiver_notifications),
            _ => None,
        }
    }

    pub fn open<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) -> bool {
        match self.target(host.pages()) {
            Some(slug) => {
                host.redirect(slug);
                true
            }
            None => {
                debug!("No notification settings for profile {:?}", self.profile);
                false
            }
        }
    }
}

/// Prescription landing page with links to update and status
#[derive(Debug, Clone, Default)]
pub struct PrescriptionLanding {
    patient_status: Option<PatientStatus>,
}

impl PrescriptionLanding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient_status(&self) -> Option<PatientStatus> {
        self.patient_status
    }

    pub async fn activate<S, N, E>(&mut self, service: &S, host: &PageHost<N, E>) -> Result<()>
    where
        S: LocalAccountService,
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        self.patient_status = Some(host.report(service.patient_status().await)?);
        Ok(())
    }

    pub fn open_update<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().update_prescription);
    }

    pub fn open_status<N: NavigationPort, E: ErrorReportingPort>(&self, host: &PageHost<N, E>) {
        host.redirect(&host.pages().prescription_status);
    }
}

//! PSP Portal Library
//!
//! Page controllers for a patient support portal. The controllers live in
//! `psp-app`; this crate ties them to a settings file and hands out page hosts
//! for incoming page URLs.

use std::path::Path;

use psp_app::config::{load_settings, Settings};
use psp_app::routing::RouteResolver;
use psp_app::services::{ErrorReportingPort, NavigationPort, PageHost};
use psp_core::prelude::*;

pub use psp_app::{
    cases, config, dashboard, navigation, profile, questionnaire, routing, services, upload,
};
pub use psp_core::{logging, prelude, types, Error, Result};

/// Loaded portal settings and the site resolver built from them
#[derive(Debug, Clone)]
pub struct Portal {
    settings: Settings,
    resolver: RouteResolver,
}

impl Portal {
    pub fn new(settings: Settings) -> Self {
        let resolver = RouteResolver::new(settings.site.clone());
        Self { settings, resolver }
    }

    /// Load `.psp/config.toml` under `project_path`, falling back to defaults
    pub fn load(project_path: &Path) -> Self {
        let settings = load_settings(project_path);
        info!("Portal settings loaded from {}", project_path.display());
        Self::new(settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    /// Host for the page at `href`, failing when the URL carries no site
    /// marker
    pub fn host<N, E>(&self, href: &str, navigation: N, errors: E) -> Result<PageHost<N, E>>
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let site = self.resolver.resolve_href(href)?;
        debug!("Activating {} on {:?} site", href, site.variant);
        Ok(PageHost::new(
            navigation,
            errors,
            site,
            self.settings.pages.clone(),
        ))
    }

    /// Host for the page at `href`, using the unassigned site when the URL
    /// carries no site marker
    pub fn host_or_default<N, E>(&self, href: &str, navigation: N, errors: E) -> PageHost<N, E>
    where
        N: NavigationPort,
        E: ErrorReportingPort,
    {
        let site = match self.resolver.resolve_href(href) {
            Ok(site) => site,
            Err(e) => {
                warn!("{}, falling back to the unassigned site", e);
                self.resolver.unassigned()
            }
        };
        PageHost::new(navigation, errors, site, self.settings.pages.clone())
    }
}

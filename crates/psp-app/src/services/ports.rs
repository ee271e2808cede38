//! Navigation and error reporting ports
//!
//! Full-page redirects and the session-scoped "errorMessage" slot are the only
//! global effects a controller performs. Both sit behind small traits and are
//! bundled with the resolved site in a [`PageHost`].

use psp_core::prelude::*;

use crate::config::PageSettings;
use crate::routing::SiteBase;

/// Full-page redirect
#[cfg_attr(test, mockall::automock)]
pub trait NavigationPort {
    fn navigate(&self, url: &str);
}

/// Session-scoped error channel, read by the error page after a redirect
#[cfg_attr(test, mockall::automock)]
pub trait ErrorReportingPort {
    fn record_error(&self, message: &str);
}

impl<T: NavigationPort + ?Sized> NavigationPort for &T {
    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

impl<T: ErrorReportingPort + ?Sized> ErrorReportingPort for &T {
    fn record_error(&self, message: &str) {
        (**self).record_error(message)
    }
}

/// Ports plus the resolved site a page was activated on
pub struct PageHost<N, E> {
    navigation: N,
    errors: E,
    site: SiteBase,
    pages: PageSettings,
}

impl<N: NavigationPort, E: ErrorReportingPort> PageHost<N, E> {
    pub fn new(navigation: N, errors: E, site: SiteBase, pages: PageSettings) -> Self {
        Self {
            navigation,
            errors,
            site,
            pages,
        }
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    pub fn errors(&self) -> &E {
        &self.errors
    }

    pub fn site(&self) -> &SiteBase {
        &self.site
    }

    pub fn pages(&self) -> &PageSettings {
        &self.pages
    }

    /// Absolute target for a page slug on the current site
    pub fn page_url(&self, slug: &str) -> String {
        self.site.page(slug)
    }

    /// Redirect to a page on the current site
    pub fn redirect(&self, slug: &str) {
        let url = self.page_url(slug);
        debug!("Redirecting to {}", url);
        self.navigation.navigate(&url);
    }

    /// Redirect to an already-built URL
    pub fn redirect_to(&self, url: &str) {
        debug!("Redirecting to {}", url);
        self.navigation.navigate(url);
    }

    /// Store the error message for the error page and redirect there
    pub fn fail(&self, err: &Error) {
        let target = self.page_url(&self.pages.error);
        self.fail_to(err, &target);
    }

    /// Like [`PageHost::fail`] with an explicit error page URL
    pub fn fail_to(&self, err: &Error, target: &str) {
        error!("Redirecting to error page: {}", err);
        self.errors.record_error(&err.session_message());
        self.navigation.navigate(target);
    }

    /// Pass a remote result through, reporting failures via [`PageHost::fail`]
    pub fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            self.fail(e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSettings;
    use crate::routing::RouteResolver;
    use mockall::Sequence;

    fn branded() -> SiteBase {
        RouteResolver::new(SiteSettings::default()).branded()
    }

    #[test]
    fn test_redirect_joins_site_base() {
        let mut navigation = MockNavigationPort::new();
        navigation
            .expect_navigate()
            .withf(|url| url == "/Branded/s/outstanding-questionnaire")
            .times(1)
            .return_const(());
        let errors = MockErrorReportingPort::new();

        let host = PageHost::new(navigation, errors, branded(), PageSettings::default());
        host.redirect("outstanding-questionnaire");
    }

    #[test]
    fn test_fail_records_message_before_redirect() {
        let mut seq = Sequence::new();
        let mut errors = MockErrorReportingPort::new();
        errors
            .expect_record_error()
            .withf(|message| message == "SERVICE_DOWN")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        let mut navigation = MockNavigationPort::new();
        navigation
            .expect_navigate()
            .withf(|url| url == "/Branded/s/error")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let host = PageHost::new(navigation, errors, branded(), PageSettings::default());
        host.fail(&Error::remote("submitResponses", "SERVICE_DOWN"));
    }

    #[test]
    fn test_report_passes_success_through() {
        let navigation = MockNavigationPort::new();
        let errors = MockErrorReportingPort::new();
        let host = PageHost::new(navigation, errors, branded(), PageSettings::default());

        let value = host.report(Ok::<_, Error>(7)).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_report_fails_on_error() {
        let mut navigation = MockNavigationPort::new();
        navigation.expect_navigate().times(1).return_const(());
        let mut errors = MockErrorReportingPort::new();
        errors.expect_record_error().times(1).return_const(());
        let host = PageHost::new(navigation, errors, branded(), PageSettings::default());

        let result: Result<()> = host.report(Err(Error::remote("fetch", "denied")));
        assert!(result.is_err());
    }
}

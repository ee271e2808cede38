//! Site-variant detection and redirect URL construction
//!
//! Every portal page lives under one of two sites, identified by a literal
//! marker segment in the URL path ("Branded" or "Unassigned"). Controllers
//! resolve the marker once on activation and build all redirects from the
//! matching base URL.

use std::sync::LazyLock;

use psp_core::prelude::*;
use regex::Regex;
use url::Url;

use crate::config::SiteSettings;

/// Final path segment of a URL, ignoring a trailing query string
static LAST_SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([^/?#]+)(?:\?.*)?$").expect("Invalid last segment regex")
});

/// Which portal site a page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteVariant {
    Branded,
    Unassigned,
}

/// A resolved site and the base URL redirects are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBase {
    pub variant: SiteVariant,
    pub base_url: String,
}

impl SiteBase {
    /// Absolute target for a page slug on this site
    pub fn page(&self, slug: &str) -> String {
        join(&self.base_url, slug)
    }
}

/// Resolves site variants from URL paths using the configured markers
#[derive(Debug, Clone)]
pub struct RouteResolver {
    site: SiteSettings,
}

impl RouteResolver {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    pub fn branded(&self) -> SiteBase {
        SiteBase {
            variant: SiteVariant::Branded,
            base_url: self.site.branded_base_url.clone(),
        }
    }

    pub fn unassigned(&self) -> SiteBase {
        SiteBase {
            variant: SiteVariant::Unassigned,
            base_url: self.site.unassigned_base_url.clone(),
        }
    }

    /// Scan path segments for a site marker, case-insensitively.
    ///
    /// The first segment matching either marker decides the site. A path with
    /// neither marker fails with [`Error::RouteResolution`].
    pub fn resolve_base_url(&self, path: &str) -> Result<SiteBase> {
        let path_only = path.split(['?', '#']).next().unwrap_or_default();

        for segment in path_only.split('/') {
            if segment.eq_ignore_ascii_case(&self.site.branded_marker) {
                return Ok(self.branded());
            }
            if segment.eq_ignore_ascii_case(&self.site.unassigned_marker) {
                return Ok(self.unassigned());
            }
        }

        Err(Error::route_resolution(path))
    }

    /// Resolve from a full page URL
    pub fn resolve_href(&self, href: &str) -> Result<SiteBase> {
        let url = Url::parse(href).map_err(|e| {
            debug!("Unparseable page URL {}: {}", href, e);
            Error::route_resolution(href)
        })?;
        self.resolve_base_url(url.path())
    }

    /// Resolve, falling back to the unassigned site when no marker is present
    pub fn resolve_or_default(&self, path: &str) -> SiteBase {
        match self.resolve_base_url(path) {
            Ok(base) => base,
            Err(e) => {
                warn!("{}, falling back to the unassigned site", e);
                self.unassigned()
            }
        }
    }
}

/// `scheme://host[:port]` of a page URL
pub fn origin(href: &str) -> Result<String> {
    let url = Url::parse(href).map_err(|_| Error::route_resolution(href))?;
    if url.host_str().is_none() {
        return Err(Error::route_resolution(href));
    }
    Ok(url.origin().ascii_serialization())
}

/// Last non-empty path segment of a page URL (`None` for the site root)
pub fn last_segment(href: &str) -> Option<String> {
    let without_fragment = href.split('#').next().unwrap_or_default();
    LAST_SEGMENT_PATTERN
        .captures(without_fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Concatenate a base URL and a page slug with exactly one separator
pub fn join(base: &str, slug: &str) -> String {
    if base.is_empty() {
        return slug.to_string();
    }
    if slug.is_empty() {
        return base.to_string();
    }
    match (base.ends_with('/'), slug.starts_with('/')) {
        (true, true) => format!("{}{}", base, &slug[1..]),
        (false, false) => format!("{}/{}", base, slug),
        _ => format!("{}{}", base, slug),
    }
}

/// Truncate a file name for display, appending `...` when cut
pub fn truncate_display_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let cut: String = name.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

//! Page title resolution.
//!
//! Resolves a request path to its display title and breadcrumb trail by
//! matching against the startup route tables. Paths with an admin marker
//! segment consult the admin table; all others consult the app and
//! nested tables, concatenated. Unmatched paths yield a fixed sentinel.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, warn};

use crate::routing::table::{Crumb, RouteTable};

/// Path segment that routes a request to the admin table.
pub const DEFAULT_ADMIN_MARKER: &str = "admin";

/// A resolved page title and its navigation trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTitle {
    pub title: String,
    pub breadcrumb: Vec<Crumb>,
}

impl PageTitle {
    /// The fixed result for paths no pattern matches.
    ///
    /// A valid result, not an error; callers render it like any other
    /// page.
    pub fn not_found() -> Self {
        Self {
            title: "not Found".to_string(),
            breadcrumb: vec![Crumb {
                name: "not Found".to_string(),
                path: "/".to_string(),
            }],
        }
    }
}

/// Resolver over the static route tables.
#[derive(Debug)]
pub struct TitleResolver {
    admin: RouteTable,
    app: RouteTable,
    admin_marker: String,
}

impl TitleResolver {
    /// Build a resolver from the three startup tables.
    ///
    /// The app and nested tables are concatenated, app first. Within
    /// each table the first matching pattern wins; overlapping pairs are
    /// logged as warnings here, once, rather than surfacing at request
    /// time.
    pub fn new(admin: RouteTable, app: RouteTable, nested: RouteTable) -> Self {
        let mut app = app;
        app.append(nested);

        warn_ambiguities("admin", &admin);
        warn_ambiguities("app", &app);

        Self {
            admin,
            app,
            admin_marker: DEFAULT_ADMIN_MARKER.to_string(),
        }
    }

    /// Replace the segment that routes a path to the admin table.
    pub fn with_admin_marker(mut self, marker: impl Into<String>) -> Self {
        self.admin_marker = marker.into();
        self
    }

    /// Resolve the display title and breadcrumb trail for a request path.
    ///
    /// Never fails: unmatched and undecodable paths both yield
    /// [`PageTitle::not_found`].
    pub fn resolve(&self, pathname: &str) -> PageTitle {
        let Some(segments) = decode_segments(pathname) else {
            debug!(path = %pathname, "path segment is not valid percent-encoded UTF-8");
            return PageTitle::not_found();
        };
        let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

        let table = if parts.iter().any(|s| *s == self.admin_marker) {
            &self.admin
        } else {
            &self.app
        };

        match table.find(&parts) {
            Some((route, _params)) => PageTitle {
                title: route.title.clone(),
                breadcrumb: route.breadcrumb.clone(),
            },
            None => PageTitle::not_found(),
        }
    }
}

/// Split a path and percent-decode each segment.
///
/// Returns `None` when a segment decodes to invalid UTF-8.
fn decode_segments(pathname: &str) -> Option<Vec<String>> {
    pathname
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).map(Cow::into_owned).ok())
        .collect()
}

fn warn_ambiguities(table: &str, routes: &RouteTable) {
    for (first, second) in routes.ambiguities() {
        warn!(
            table = %table,
            first = %first,
            second = %second,
            "route patterns overlap; first listed wins"
        );
    }
}

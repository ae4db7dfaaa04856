//! Route tables: ordered pattern records compiled at startup.
//!
//! Tables are built once from JSON arrays of `{path, title, breadcrumb}`
//! records and are read-only thereafter. Matching walks the table in
//! order and the first match wins, so more specific patterns must be
//! listed before more general ones.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::routing::template::{RouteTemplate, TemplateError};

/// One `{name, path}` link in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub name: String,
    pub path: String,
}

/// A route record as supplied by configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route template (e.g. "/app/interviews/:id").
    pub path: String,
    /// Display title for the matched page.
    pub title: String,
    /// Navigation trail shown above page content.
    #[serde(default)]
    pub breadcrumb: Vec<Crumb>,
}

/// Errors from building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route template")]
    Template(#[from] TemplateError),

    #[error("invalid route table JSON")]
    Json(#[from] serde_json::Error),
}

/// A compiled route record.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub template: RouteTemplate,
    pub title: String,
    pub breadcrumb: Vec<Crumb>,
}

/// An ordered, compiled route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile a table from route records, preserving their order.
    pub fn from_entries(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        let mut routes = Vec::with_capacity(entries.len());

        for entry in entries {
            routes.push(CompiledRoute {
                template: RouteTemplate::parse(&entry.path)?,
                title: entry.title,
                breadcrumb: entry.breadcrumb,
            });
        }

        debug!(routes = routes.len(), "compiled route table");
        Ok(Self { routes })
    }

    /// Compile a table from a JSON array of route records.
    pub fn from_json(json: &str) -> Result<Self, RouteError> {
        let entries: Vec<RouteEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Append another table's routes after this table's.
    pub fn append(&mut self, other: RouteTable) {
        self.routes.extend(other.routes);
    }

    /// Find the first route matching a pre-split, decoded path.
    pub fn find(&self, parts: &[&str]) -> Option<(&CompiledRoute, HashMap<String, String>)> {
        self.routes
            .iter()
            .find_map(|route| route.template.matches(parts).map(|params| (route, params)))
    }

    /// Pattern pairs in this table that could both match some path.
    ///
    /// The first pattern of each pair is listed earlier and wins at
    /// runtime; the second is reachable only for paths the first rejects.
    pub fn ambiguities(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (i, a) in self.routes.iter().enumerate() {
            for b in &self.routes[i + 1..] {
                if a.template.overlaps(&b.template) {
                    pairs.push((
                        a.template.pattern().to_string(),
                        b.template.pattern().to_string(),
                    ));
                }
            }
        }

        pairs
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

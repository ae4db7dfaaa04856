//! Route template parsing and matching.
//!
//! A template is a path string with literal segments, named parameters
//! (`:id`), and an optional trailing rest parameter (`:rest*`) that
//! captures the remaining segments. Templates are parsed once at table
//! construction; matching runs against a pre-split segment sequence and
//! never re-parses.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Errors from parsing a route template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("route template must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("parameter segment has no name in {0}")]
    EmptyParamName(String),

    #[error("duplicate parameter name '{name}' in {template}")]
    DuplicateParam { template: String, name: String },

    #[error("rest parameter must be the final segment in {0}")]
    RestNotLast(String),
}

/// A fixed-position segment matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal the decoded path segment exactly.
    Literal(String),
    /// Matches any single segment, captured under the parameter name.
    Param(String),
}

/// A route template compiled into a segment-matcher sequence.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
    /// Name of the trailing rest parameter, when present.
    rest: Option<String>,
}

impl RouteTemplate {
    /// Parse a template string into its compiled form.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if !template.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash(template.to_string()));
        }

        let parts: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();

        let mut segments = Vec::with_capacity(parts.len());
        let mut rest = None;
        let mut seen: HashSet<&str> = HashSet::new();

        for (idx, part) in parts.iter().enumerate() {
            let Some(name) = part.strip_prefix(':') else {
                segments.push(Segment::Literal((*part).to_string()));
                continue;
            };

            let (name, is_rest) = match name.strip_suffix('*') {
                Some(stripped) => (stripped, true),
                None => (name, false),
            };

            if name.is_empty() {
                return Err(TemplateError::EmptyParamName(template.to_string()));
            }
            if !seen.insert(name) {
                return Err(TemplateError::DuplicateParam {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }

            if is_rest {
                if idx + 1 != parts.len() {
                    return Err(TemplateError::RestNotLast(template.to_string()));
                }
                rest = Some(name.to_string());
            } else {
                segments.push(Segment::Param(name.to_string()));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
            rest,
        })
    }

    /// The template string this was parsed from.
    pub fn pattern(&self) -> &str {
        &self.raw
    }

    /// Match a pre-split, decoded path against this template.
    ///
    /// Returns the named captures on a match. A rest parameter matches
    /// zero or more trailing segments, captured joined by `/`.
    pub fn matches(&self, parts: &[&str]) -> Option<HashMap<String, String>> {
        if self.rest.is_some() {
            if parts.len() < self.segments.len() {
                return None;
            }
        } else if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();

        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }

        if let Some(name) = &self.rest {
            params.insert(name.clone(), parts[self.segments.len()..].join("/"));
        }

        Some(params)
    }

    /// Whether some path could match both templates.
    ///
    /// Used by the startup ambiguity check: within one table, an
    /// overlapping later pattern is reachable only for paths the earlier
    /// one rejects.
    pub fn overlaps(&self, other: &RouteTemplate) -> bool {
        let lengths_overlap = match (&self.rest, &other.rest) {
            (None, None) => self.segments.len() == other.segments.len(),
            (Some(_), None) => other.segments.len() >= self.segments.len(),
            (None, Some(_)) => self.segments.len() >= other.segments.len(),
            (Some(_), Some(_)) => true,
        };
        if !lengths_overlap {
            return false;
        }

        // Positions beyond the common prefix are covered by a rest
        // parameter on one side, so only the prefix constrains overlap.
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                _ => true,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals_and_params() {
        let template = RouteTemplate::parse("/app/interviews/:id").unwrap();
        assert_eq!(template.pattern(), "/app/interviews/:id");
        assert!(template.rest.is_none());
        assert_eq!(template.segments.len(), 3);
    }

    #[test]
    fn parse_root_template() {
        let template = RouteTemplate::parse("/").unwrap();
        assert!(template.matches(&[]).unwrap().is_empty());
        assert!(template.matches(&["app"]).is_none());
    }

    #[test]
    fn parse_rejects_missing_leading_slash() {
        assert_eq!(
            RouteTemplate::parse("app/:id").unwrap_err(),
            TemplateError::MissingLeadingSlash("app/:id".to_string())
        );
    }

    #[test]
    fn parse_rejects_empty_param_name() {
        assert!(matches!(
            RouteTemplate::parse("/app/:"),
            Err(TemplateError::EmptyParamName(_))
        ));
        assert!(matches!(
            RouteTemplate::parse("/app/:*"),
            Err(TemplateError::EmptyParamName(_))
        ));
    }

    #[test]
    fn parse_rejects_duplicate_param() {
        assert!(matches!(
            RouteTemplate::parse("/:a/x/:a"),
            Err(TemplateError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn parse_rejects_rest_before_end() {
        assert!(matches!(
            RouteTemplate::parse("/app/:rest*/edit"),
            Err(TemplateError::RestNotLast(_))
        ));
    }

    #[test]
    fn match_exact_literals() {
        let template = RouteTemplate::parse("/admin/content").unwrap();
        assert!(template.matches(&["admin", "content"]).unwrap().is_empty());
        assert!(template.matches(&["admin", "users"]).is_none());
    }

    #[test]
    fn match_captures_params() {
        let template = RouteTemplate::parse("/app/jobs/:name").unwrap();
        let params = template.matches(&["app", "jobs", "senior dev"]).unwrap();
        assert_eq!(params.get("name"), Some(&"senior dev".to_string()));
    }

    #[test]
    fn match_rejects_length_mismatch() {
        let template = RouteTemplate::parse("/app/jobs/:name").unwrap();
        assert!(template.matches(&["app", "jobs"]).is_none());
        assert!(template.matches(&["app", "jobs", "a", "b"]).is_none());
    }

    #[test]
    fn match_rest_captures_joined_tail() {
        let template = RouteTemplate::parse("/app/:rest*").unwrap();

        let params = template.matches(&["app", "a", "b"]).unwrap();
        assert_eq!(params.get("rest"), Some(&"a/b".to_string()));

        // Zero trailing segments still match.
        let params = template.matches(&["app"]).unwrap();
        assert_eq!(params.get("rest"), Some(&String::new()));
    }

    #[test]
    fn overlap_param_against_literal() {
        let a = RouteTemplate::parse("/app/interviews/:id").unwrap();
        let b = RouteTemplate::parse("/app/interviews/new").unwrap();
        assert!(a.overlaps(&b));
    }

    #[test]
    fn overlap_rest_against_fixed() {
        let a = RouteTemplate::parse("/app/:rest*").unwrap();
        let b = RouteTemplate::parse("/app/interviews/:id").unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_literals_do_not_overlap() {
        let a = RouteTemplate::parse("/app/jobs").unwrap();
        let b = RouteTemplate::parse("/app/interviews").unwrap();
        assert!(!a.overlaps(&b));

        let c = RouteTemplate::parse("/app/jobs/:id").unwrap();
        assert!(!a.overlaps(&c));
    }
}

//! Load reporting
//!
//! Turns a load result into something every component can hold: a catalog
//! that is always defined plus the notice to show the user.

use crate::model::Catalog;
use crate::parser::ParseOutcome;
use std::fmt;

/// What the user should be told after a load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notice {
    /// Clean load
    #[default]
    None,
    /// Partial load; non-blocking, one line per skipped entry
    Dismissible(Vec<String>),
    /// Hard failure; requires acknowledgment
    Blocking(String),
}

impl Notice {
    /// Whether the notice must be acknowledged before continuing
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocking(_))
    }
}

/// Catalog plus notice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Loaded catalog, or empty after a hard failure
    pub catalog: Catalog,
    /// Notice to surface
    pub notice: Notice,
}

impl LoadReport {
    /// Resolve a parse or store result; hard failures fall back to an empty catalog
    pub fn resolve<E: fmt::Display>(result: Result<ParseOutcome, E>) -> Self {
        match result {
            Ok(outcome) if outcome.has_warnings() => Self {
                notice: Notice::Dismissible(outcome.warning_messages()),
                catalog: outcome.catalog,
            },
            Ok(outcome) => Self {
                catalog: outcome.catalog,
                notice: Notice::None,
            },
            Err(e) => {
                tracing::error!("catalog load failed: {}", e);
                Self {
                    catalog: Catalog::default(),
                    notice: Notice::Blocking(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn clean_load_has_no_notice() {
        let report = LoadReport::resolve(parse_str("checklists:\n  - id: a\n"));
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.notice, Notice::None);
    }

    #[test]
    fn partial_load_is_dismissible() {
        let report = LoadReport::resolve(parse_str("checklists:\n  - id: a\n  - 3\n"));
        assert_eq!(report.catalog.len(), 1);
        match report.notice {
            Notice::Dismissible(lines) => assert_eq!(lines, vec!["Checklist #1 skipped: not a mapping"]),
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn hard_failure_blocks_with_empty_catalog() {
        let report = LoadReport::resolve(parse_str("[1, 2]"));
        assert!(report.catalog.is_empty());
        assert!(report.notice.is_blocking());
    }
}

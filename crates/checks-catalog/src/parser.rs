//! Catalog document parser
//!
//! Parsing runs in two phases:
//! 1. Decode the raw bytes into a generic `serde_yaml::Value`.
//! 2. Validate the value record by record with total functions that return
//!    either a typed record or a [`SkipReason`].
//!
//! Only the top-level shape can fail the whole document. Each checklist and
//! each step is validated independently; invalid entries are dropped and
//! reported as [`EntrySkipped`] warnings in encounter order.
//!
//! # Example
//!
//! ```rust
//! use checks_catalog::parser::parse_str;
//!
//! let outcome = parse_str(
//!     "checklists:\n  - id: a\n    pasos:\n      - id: s1\n        texto: Check fuel\n",
//! )
//! .unwrap();
//! assert_eq!(outcome.catalog.checklists[0].title, "a");
//! assert!(!outcome.has_warnings());
//! ```

use crate::error::{EntrySkipped, MalformedReason, ParseError, SkipReason};
use crate::model::{Catalog, Checklist, Step};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;

/// Key of the top-level checklist collection
pub const CHECKLISTS_KEY: &str = "checklists";

/// Successful parse: surviving catalog plus one warning per dropped entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    /// Catalog built from the valid entries
    pub catalog: Catalog,
    /// Dropped entries, in encounter order
    pub warnings: Vec<EntrySkipped>,
}

impl ParseOutcome {
    /// Whether any entry was dropped
    #[inline]
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Human-readable warning lines
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Parse a raw document
///
/// # Errors
/// - `ParseError::SyntaxError` if the bytes do not decode
/// - `ParseError::MalformedDocument` if the document is empty, not a mapping,
///   or lacks the `checklists` key
/// - `ParseError::UnexpectedType` if `checklists` is not a list
pub fn parse(bytes: &[u8]) -> Result<ParseOutcome, ParseError> {
    let root = decode(bytes)?;
    let outcome = validate_document(&root)?;

    tracing::info!(
        checklists = outcome.catalog.len(),
        skipped = outcome.warnings.len(),
        "catalog parsed"
    );
    Ok(outcome)
}

/// Parse from text, for live validation of edited content
///
/// # Errors
/// Same as [`parse`].
#[inline]
pub fn parse_str(content: &str) -> Result<ParseOutcome, ParseError> {
    parse(content.as_bytes())
}

fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::MalformedDocument(MalformedReason::Empty));
    }

    serde_yaml::from_slice::<Value>(bytes).map_err(|e| {
        tracing::error!("YAML decode failed: {}", e);
        ParseError::SyntaxError(e.to_string())
    })
}

fn validate_document(root: &Value) -> Result<ParseOutcome, ParseError> {
    let map = match untagged(root) {
        Value::Null => return Err(ParseError::MalformedDocument(MalformedReason::Empty)),
        Value::Mapping(map) => map,
        _ => return Err(ParseError::MalformedDocument(MalformedReason::NotAMapping)),
    };

    let entries = match map.get(CHECKLISTS_KEY).map(untagged) {
        None | Some(Value::Null) => {
            return Err(ParseError::MalformedDocument(MalformedReason::MissingCollection))
        }
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            return Err(ParseError::unexpected_type(CHECKLISTS_KEY, "list", kind(other)))
        }
    };

    let mut outcome = ParseOutcome::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        match validate_checklist(index, entry) {
            Ok((checklist, _)) if seen_ids.contains(&checklist.id) => {
                skip(&mut outcome, EntrySkipped::checklist(index, SkipReason::DuplicateId(checklist.id)));
            }
            Ok((checklist, step_warnings)) => {
                seen_ids.insert(checklist.id.clone());
                for warning in step_warnings {
                    skip(&mut outcome, warning);
                }
                outcome.catalog.checklists.push(checklist);
            }
            Err(reason) => skip(&mut outcome, EntrySkipped::checklist(index, reason)),
        }
    }

    Ok(outcome)
}

fn skip(outcome: &mut ParseOutcome, warning: EntrySkipped) {
    tracing::warn!("{}", warning);
    outcome.warnings.push(warning);
}

fn validate_checklist(index: usize, entry: &Value) -> Result<(Checklist, Vec<EntrySkipped>), SkipReason> {
    let map = untagged(entry).as_mapping().ok_or(SkipReason::NotAMapping)?;

    let id = required_text(map, "id")?;
    let title = optional_text(map, "titulo").unwrap_or_else(|| id.clone());

    let raw_steps: &[Value] = match map.get("pasos").map(untagged) {
        None | Some(Value::Null) => &[],
        Some(Value::Sequence(steps)) => steps,
        Some(_) => return Err(SkipReason::InvalidCollection("pasos")),
    };

    let mut steps = Vec::with_capacity(raw_steps.len());
    let mut warnings = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (step_index, raw) in raw_steps.iter().enumerate() {
        match validate_step(raw) {
            Ok(step) if seen_ids.contains(&step.id) => {
                let reason = SkipReason::DuplicateId(step.id);
                warnings.push(EntrySkipped::step(index, &id, step_index, reason));
            }
            Ok(step) => {
                seen_ids.insert(step.id.clone());
                steps.push(step);
            }
            Err(reason) => warnings.push(EntrySkipped::step(index, &id, step_index, reason)),
        }
    }

    let checklist = Checklist {
        title,
        category: optional_text(map, "categoria"),
        full_list: optional_bool(map, "full-list"),
        color: optional_text(map, "color"),
        steps,
        id,
    };
    Ok((checklist, warnings))
}

fn validate_step(entry: &Value) -> Result<Step, SkipReason> {
    let map = untagged(entry).as_mapping().ok_or(SkipReason::NotAMapping)?;

    Ok(Step {
        id: required_text(map, "id")?,
        text: required_text(map, "texto")?,
        icon: optional_text(map, "icono"),
        altitude: optional_text(map, "altitud"),
        qnh: optional_text(map, "qnh"),
        link: optional_text(map, "link"),
        app: optional_text(map, "app"),
        local_time: optional_bool(map, "localtime").unwrap_or(false),
        utc_time: optional_bool(map, "utctime").unwrap_or(false),
        log: optional_text(map, "log"),
    })
}

/// Mandatory scalar; absent, null, non-scalar and blank values disqualify
fn required_text(map: &Mapping, field: &'static str) -> Result<String, SkipReason> {
    let text = map
        .get(field)
        .and_then(scalar_to_string)
        .ok_or(SkipReason::MissingField(field))?;
    if text.trim().is_empty() {
        return Err(SkipReason::BlankField(field));
    }
    Ok(text)
}

/// Optional scalar; anything unusable degrades to `None`
fn optional_text(map: &Mapping, field: &str) -> Option<String> {
    let value = map.get(field)?;
    let text = scalar_to_string(value);
    if text.is_none() && !value.is_null() {
        tracing::debug!(field, found = kind(value), "ignoring non-scalar field");
    }
    text
}

/// Native boolean or case-insensitive `"true"`/`"false"`; other text is absent
fn optional_bool(map: &Mapping, field: &str) -> Option<bool> {
    match untagged(map.get(field)?) {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        other => {
            tracing::debug!(field, found = kind(other), "ignoring non-boolean flag");
            None
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match untagged(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

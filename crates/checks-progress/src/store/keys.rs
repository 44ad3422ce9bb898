//! Flattened key space
//!
//! One key per field per checklist id:
//!
//! | key              | value                                   |
//! |------------------|-----------------------------------------|
//! | `idx_<id>`       | step index                              |
//! | `page_<id>`      | page index                              |
//! | `checked_<id>`   | comma-joined sorted positions, absent when empty |
//! | `fullList_<id>`  | bool, absent for inherit                |
//! | `voice_<id>`     | bool                                    |

use crate::mode::ModePreference;
use crate::state_machine::ProgressRecord;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const PREFIXES: [&str; 5] = ["idx_", "page_", "checked_", "fullList_", "voice_"];

/// Step index key
#[must_use]
pub fn index_key(id: &str) -> String {
    format!("idx_{id}")
}

/// Page index key
#[must_use]
pub fn page_key(id: &str) -> String {
    format!("page_{id}")
}

/// Checked set key
#[must_use]
pub fn checked_key(id: &str) -> String {
    format!("checked_{id}")
}

/// Mode preference key
#[must_use]
pub fn full_list_key(id: &str) -> String {
    format!("fullList_{id}")
}

/// Voice control key
#[must_use]
pub fn voice_key(id: &str) -> String {
    format!("voice_{id}")
}

/// Every key that may belong to `id`
#[must_use]
pub fn all_keys(id: &str) -> Vec<String> {
    PREFIXES.iter().map(|prefix| format!("{prefix}{id}")).collect()
}

/// Comma-joined ascending positions
#[must_use]
pub fn encode_checked(checked: &BTreeSet<usize>) -> String {
    checked
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`encode_checked`]; unparsable parts are ignored
#[must_use]
pub fn decode_checked(raw: &str) -> BTreeSet<usize> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// Write `record` into `entries`, removing keys whose value is the implicit default
pub fn flatten_into(entries: &mut BTreeMap<String, Value>, id: &str, record: &ProgressRecord) {
    entries.insert(index_key(id), Value::from(record.step_index));
    entries.insert(page_key(id), Value::from(record.page_index));
    entries.insert(voice_key(id), Value::Bool(record.voice_control));

    if record.checked.is_empty() {
        entries.remove(&checked_key(id));
    } else {
        entries.insert(checked_key(id), Value::String(encode_checked(&record.checked)));
    }

    match record.mode_preference.as_flag() {
        Some(flag) => {
            entries.insert(full_list_key(id), Value::Bool(flag));
        }
        None => {
            entries.remove(&full_list_key(id));
        }
    }
}

/// Read the record for `id`; missing or mistyped keys fall back to defaults
#[must_use]
pub fn unflatten(entries: &BTreeMap<String, Value>, id: &str) -> ProgressRecord {
    let index = |key: String| {
        entries
            .get(&key)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    };

    ProgressRecord {
        step_index: index(index_key(id)),
        page_index: index(page_key(id)),
        checked: entries
            .get(&checked_key(id))
            .and_then(Value::as_str)
            .map(decode_checked)
            .unwrap_or_default(),
        mode_preference: ModePreference::from_flag(
            entries.get(&full_list_key(id)).and_then(Value::as_bool),
        ),
        voice_control: entries
            .get(&voice_key(id))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

use std::fmt::{self, Display, Formatter};

use serde_json::{Map, Value};

use crate::natural::natural_sort_key;

/// Ordering policy applied to flattened sub-table records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Keep the order returned by the device.
    #[default]
    Preserve,
    /// Prefix first, then numeric suffix by value (`rule9` before `rule10`).
    Natural,
    /// Plain byte-wise string order.
    Alphabetical,
}

impl SortMode {
    /// Map a `dynamic_sort_subtable` setting to a mode.
    ///
    /// `"true"` and `"natural"` select natural order, `"alphabetical"` selects
    /// lexical order, and every other value leaves records untouched.
    pub fn from_setting(setting: &str) -> Self {
        match setting {
            "true" | "natural" => Self::Natural,
            "alphabetical" => Self::Alphabetical,
            _ => Self::Preserve,
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preserve => "false",
            Self::Natural => "natural",
            Self::Alphabetical => "alphabetical",
        };
        f.write_str(name)
    }
}

/// Render a record field the way the device's list keys are compared.
///
/// Strings are used verbatim, other values in their JSON form, and a missing
/// or null field renders as `<nil>`.
pub fn field_sort_text(record: &Map<String, Value>, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => "<nil>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reorder `records` in place by `field` according to `mode`.
///
/// Both sorting modes are stable, so records with equal keys keep their
/// relative device order.
pub fn order_subtable(records: &mut [Map<String, Value>], field: &str, mode: SortMode) {
    match mode {
        SortMode::Preserve => {}
        SortMode::Natural => {
            records.sort_by_cached_key(|record| natural_sort_key(&field_sort_text(record, field)))
        }
        SortMode::Alphabetical => {
            records.sort_by_cached_key(|record| field_sort_text(record, field))
        }
    }
}

//! Declarative resource state and its provider-level settings.

use forti_compat_core::SortMode;
use serde_json::{Map, Value};

use crate::config::ProviderConfig;

/// Attribute map of one resource, as held in declarative state.
pub type State = Map<String, Value>;

/// State key choosing the sub-table ordering for this resource.
pub const SORT_SETTING: &str = "dynamic_sort_subtable";
/// State key forcing every sub-table to be read back.
pub const ALL_TABLES_SETTING: &str = "get_all_tables";
/// State key naming the VDOM the resource lives in.
pub const VDOM_SETTING: &str = "vdomparam";

fn setting<'a>(state: &'a State, key: &str) -> Option<&'a str> {
    state
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Effective sub-table ordering: the state's choice, else the provider's.
pub fn sort_mode(state: &State, config: &ProviderConfig) -> SortMode {
    SortMode::from_setting(
        setting(state, SORT_SETTING).unwrap_or(config.dynamic_sort_subtable.as_str()),
    )
}

/// Whether reads populate sub-tables the state does not declare.
pub fn reads_all_tables(state: &State, config: &ProviderConfig) -> bool {
    match setting(state, ALL_TABLES_SETTING) {
        Some(value) => value == "true",
        None => config.import_table,
    }
}

/// VDOM for requests about this resource.
pub fn vdom<'a>(state: &'a State, config: &'a ProviderConfig) -> Option<&'a str> {
    setting(state, VDOM_SETTING).or(config.vdom.as_deref())
}

/// Whether the state holds a non-empty value under `key`.
pub fn is_set(state: &State, key: &str) -> bool {
    match state.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

//! Read path: device response payload -> declarative state.

use forti_compat_core::{
    int_list_to_string, int_value, is_present, list_to_scalar, order_subtable, SortMode,
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::schema::{FieldKind, FieldSchema, ResourceSchema};
use crate::state::{is_set, reads_all_tables, sort_mode, State};

/// Errors returned when a response value cannot be held in state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("error reading {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Outcome of reading one attribute.
enum Read {
    Set(Value),
    Clear,
    /// The device used a different but harmless representation.
    Keep,
}

pub(crate) fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Merge a read response into `declared`, returning the refreshed state.
///
/// Fields the firmware does not carry are left as declared. Sub-tables are
/// read when the resource or provider asks for all tables, otherwise only if
/// `declared` already has them, and are ordered by the effective
/// `dynamic_sort_subtable` mode.
pub fn refresh_object(
    schema: &ResourceSchema,
    response: &State,
    declared: &State,
    config: &ProviderConfig,
) -> Result<State, FlattenError> {
    let firmware = config.firmware_version.as_deref();
    let all_tables = reads_all_tables(declared, config);
    let mode = sort_mode(declared, config);
    let mut out = declared.clone();

    for field in &schema.fields {
        if !field.available_on(firmware) {
            continue;
        }
        if field.kind == FieldKind::Table && !all_tables && !is_set(declared, &field.name) {
            continue;
        }

        let raw = response.get(&field.api_name());
        match read_field(field, &field.name, raw, firmware, mode)? {
            Read::Set(value) => {
                out.insert(field.name.clone(), value);
            }
            Read::Clear => {
                out.remove(&field.name);
            }
            Read::Keep => {}
        }
    }

    Ok(out)
}

fn read_field(
    field: &FieldSchema,
    path: &str,
    raw: Option<&Value>,
    firmware: Option<&str>,
    mode: SortMode,
) -> Result<Read, FlattenError> {
    if field.kind == FieldKind::Table {
        return Ok(match flatten_table(field, path, raw, firmware, mode)? {
            Some(records) => Read::Set(Value::Array(
                records.into_iter().map(Value::Object).collect(),
            )),
            None => Read::Clear,
        });
    }

    let raw = match raw {
        None | Some(Value::Null) => return Ok(Read::Clear),
        Some(value) => value,
    };

    match flatten_scalar(field.kind, raw) {
        Some(value) => Ok(Read::Set(value)),
        None if is_present(raw) => {
            debug!(
                field = path,
                found = value_type(raw),
                "keeping state value for differently shaped response value"
            );
            Ok(Read::Keep)
        }
        None => Err(FlattenError::TypeMismatch {
            field: path.to_string(),
            expected: kind_name(field.kind),
            found: value_type(raw),
        }),
    }
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "string",
        FieldKind::Integer => "integer",
        FieldKind::IntList => "list of integers",
        FieldKind::Table => "list of records",
    }
}

fn flatten_scalar(kind: FieldKind, raw: &Value) -> Option<Value> {
    match kind {
        FieldKind::String => raw.is_string().then(|| raw.clone()),
        // A list element may itself be a numeric string, hence the second pass.
        FieldKind::Integer => match list_to_scalar(list_to_scalar(raw.clone())) {
            number @ Value::Number(_) => Some(Value::from(int_value(&number))),
            _ => None,
        },
        FieldKind::IntList => match raw {
            Value::Array(_) => Some(Value::String(int_list_to_string(raw))),
            Value::String(_) => Some(raw.clone()),
            _ => None,
        },
        FieldKind::Table => None,
    }
}

/// Flatten a list of records, or `None` when the device sent no usable list.
fn flatten_table(
    field: &FieldSchema,
    path: &str,
    raw: Option<&Value>,
    firmware: Option<&str>,
    mode: SortMode,
) -> Result<Option<Vec<State>>, FlattenError> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!(field = path, found = value_type(other), "sub-table is not a list");
            return Ok(None);
        }
    };
    if items.first().map_or(true, Value::is_null) {
        return Ok(None);
    }

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            debug!(field = path, index = idx, "skipping sub-table entry that is not a record");
            continue;
        };

        let mut record = State::new();
        for nested in &field.fields {
            if !nested.available_on(firmware) {
                continue;
            }
            let Some(raw) = entry.get(&nested.api_name()) else {
                continue;
            };
            let nested_path = format!("{path}.{idx}.{}", nested.name);
            match read_field(nested, &nested_path, Some(raw), firmware, mode)? {
                Read::Set(value) => {
                    record.insert(nested.name.clone(), value);
                }
                Read::Clear | Read::Keep => {}
            }
        }
        records.push(record);
    }

    if let Some(sort_field) = field.table_sort_field() {
        order_subtable(&mut records, sort_field, mode);
    }
    Ok(Some(records))
}

//! Write path: declarative state -> device request payload.

use forti_compat_core::{string_to_int_list, ValidationError};
use serde_json::Value;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::flatten::value_type;
use crate::schema::{FieldKind, FieldSchema, ResourceSchema};
use crate::state::State;

/// Errors returned when state cannot be turned into a request payload.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("invalid value for {field}: {source}")]
    Invalid {
        field: String,
        source: ValidationError,
    },
    #[error("expected {field} to be {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Build the request payload for `state`.
///
/// Attributes are renamed to their API names and validated. Unset scalars
/// (null or empty string) are omitted, a declared empty table is sent as `[]`
/// so the device clears it, and fields the firmware does not carry are left
/// out. With `clear`, every attribute that would be sent is sent as `null`
/// instead, which resets a singleton object.
pub fn get_object(
    schema: &ResourceSchema,
    state: &State,
    config: &ProviderConfig,
    clear: bool,
) -> Result<State, ExpandError> {
    let firmware = config.firmware_version.as_deref();
    let mut obj = State::new();

    for field in &schema.fields {
        if !field.available_on(firmware) {
            continue;
        }
        let Some(declared) = declared_value(field, state.get(&field.name)) else {
            continue;
        };
        if clear {
            obj.insert(field.api_name(), Value::Null);
            continue;
        }
        let value = expand_field(field, &field.name, declared, firmware)?;
        obj.insert(field.api_name(), value);
    }

    Ok(obj)
}

/// The state value when it counts as set: not null, and not `""` for scalars.
fn declared_value<'a>(field: &FieldSchema, value: Option<&'a Value>) -> Option<&'a Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() && field.kind != FieldKind::Table => None,
        Some(value) => Some(value),
    }
}

fn expand_field(
    field: &FieldSchema,
    path: &str,
    value: &Value,
    firmware: Option<&str>,
) -> Result<Value, ExpandError> {
    if let Some(validator) = &field.validate {
        validator
            .check(path, value)
            .map_err(|source| ExpandError::Invalid {
                field: path.to_string(),
                source,
            })?;
    }

    let wrong_type = |expected: &'static str| ExpandError::WrongType {
        field: path.to_string(),
        expected,
        found: value_type(value),
    };

    let expanded = match field.kind {
        FieldKind::String => match value {
            Value::String(_) => value.clone(),
            _ => return Err(wrong_type("a string")),
        },
        FieldKind::Integer => match value {
            Value::Number(_) => value.clone(),
            _ => return Err(wrong_type("an integer")),
        },
        FieldKind::IntList => match value {
            Value::String(s) => string_to_int_list(s),
            Value::Array(_) => value.clone(),
            _ => return Err(wrong_type("a space-separated integer list")),
        },
        FieldKind::Table => match value {
            Value::Array(items) => Value::Array(expand_table(field, path, items, firmware)?),
            _ => return Err(wrong_type("a list of records")),
        },
    };
    Ok(expanded)
}

fn expand_table(
    field: &FieldSchema,
    path: &str,
    items: &[Value],
    firmware: Option<&str>,
) -> Result<Vec<Value>, ExpandError> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            return Err(ExpandError::WrongType {
                field: format!("{path}.{idx}"),
                expected: "a record",
                found: value_type(item),
            });
        };

        let mut record = State::new();
        for nested in &field.fields {
            if !nested.available_on(firmware) {
                continue;
            }
            let nested_path = format!("{path}.{idx}.{}", nested.name);
            if let Some(declared) = declared_value(nested, entry.get(&nested.name)) {
                let value = expand_field(nested, &nested_path, declared, firmware)?;
                record.insert(nested.api_name(), value);
            }
        }
        out.push(Value::Object(record));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::{get_object, ExpandError};
    use crate::config::ProviderConfig;
    use crate::schema::{load_schema, ResourceSchema};
    use crate::state::State;

    fn state(value: Value) -> State {
        value.as_object().cloned().expect("object")
    }

    fn schema(name: &str) -> ResourceSchema {
        load_schema(name, None).expect("schema").0
    }

    #[test]
    fn renames_to_api_names_and_skips_unset() {
        let s = state(json!({
            "collector_ip": "10.0.0.5",
            "collector_port": 2055,
            "source_ip": "",
            "interface": null,
            "dynamic_sort_subtable": "natural"
        }));
        let obj = get_object(&schema("system_netflow"), &s, &ProviderConfig::default(), false)
            .expect("expand");
        assert_eq!(
            Value::Object(obj),
            json!({"collector-ip": "10.0.0.5", "collector-port": 2055})
        );
    }

    #[test]
    fn clear_sends_nulls() {
        let s = state(json!({"collector_ip": "10.0.0.5", "active_flow_timeout": 60}));
        let obj = get_object(&schema("system_netflow"), &s, &ProviderConfig::default(), true)
            .expect("expand");
        assert_eq!(
            Value::Object(obj),
            json!({"collector-ip": null, "active-flow-timeout": null})
        );
    }

    #[test]
    fn clear_skips_validation_of_declared_values() {
        let s = state(json!({
            "collector_ip": "10.0.0.5",
            "active_flow_timeout": 0,
            "interface": "",
            "collectors": [{"id": 99}]
        }));
        let obj = get_object(&schema("system_netflow"), &s, &ProviderConfig::default(), true)
            .expect("expand");
        assert_eq!(
            Value::Object(obj),
            json!({"collector-ip": null, "active-flow-timeout": null, "collectors": null})
        );

        let err = get_object(&schema("system_netflow"), &s, &ProviderConfig::default(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::Invalid { ref field, .. } if field == "active_flow_timeout"
        ));
    }

    #[test]
    fn tables_expand_nested_names() {
        let s = state(json!({
            "name": "qos",
            "dscp_range": [{"index": 1, "up": 0, "low": 10, "high": 20}],
            "dscp_except": []
        }));
        let obj = get_object(
            &schema("wirelesscontrollerhotspot20_qosmap"),
            &s,
            &ProviderConfig::default(),
            false,
        )
        .expect("expand");
        assert_eq!(
            Value::Object(obj),
            json!({
                "name": "qos",
                "dscp-except": [],
                "dscp-range": [{"index": 1, "up": 0, "low": 10, "high": 20}]
            })
        );
    }

    #[test]
    fn validator_failure_names_nested_path() {
        let s = state(json!({"dscp_range": [{"index": 9}]}));
        let err = get_object(
            &schema("wirelesscontrollerhotspot20_qosmap"),
            &s,
            &ProviderConfig::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::Invalid { ref field, .. } if field == "dscp_range.0.index"
        ));
        assert_eq!(
            err.to_string(),
            "invalid value for dscp_range.0.index: expected dscp_range.0.index to be in the range (1 - 8), got 9"
        );
    }

    #[test]
    fn gated_fields_are_not_sent() {
        let s = state(json!({
            "collector_ip": "10.0.0.5",
            "collectors": [{"id": 1, "collector_ip": "10.0.0.6"}]
        }));
        let config = ProviderConfig {
            firmware_version: Some("7.0.12".to_string()),
            ..ProviderConfig::default()
        };
        let obj = get_object(&schema("system_netflow"), &s, &config, false).expect("expand");
        assert_eq!(Value::Object(obj), json!({"collector-ip": "10.0.0.5"}));
    }

    #[test]
    fn int_list_string_becomes_array() {
        let schema: ResourceSchema = toml::from_str(
            r#"
name = "test_ports"
path = "test/ports"

[[field]]
name = "ports"
kind = "int_list"
"#,
        )
        .expect("schema");
        let obj = get_object(
            &schema,
            &state(json!({"ports": "80 443"})),
            &ProviderConfig::default(),
            false,
        )
        .expect("expand");
        assert_eq!(Value::Object(obj), json!({"ports": [80, 443]}));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = get_object(
            &schema("firewall_internetservicegroup"),
            &state(json!({"member": "svc"})),
            &ProviderConfig::default(),
            false,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected member to be a list of records, got string"
        );
    }
}

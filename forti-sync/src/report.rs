use colored::Colorize;
use forti_compat_core::CompatRules;
use serde_json::Value;

use crate::state::State;

/// Render state as `path = value` lines, one per leaf attribute.
pub fn render_state(state: &State) -> String {
    let mut out = Vec::new();
    for (key, value) in state {
        push_lines(&mut out, key, value);
    }
    out.join("\n")
}

fn push_lines(out: &mut Vec<String>, path: &str, value: &Value) {
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            for (idx, item) in items.iter().enumerate() {
                if let Value::Object(record) = item {
                    for (key, nested) in record {
                        push_lines(out, &format!("{path}[{idx}].{key}"), nested);
                    }
                }
            }
        }
        _ => out.push(format!("{} = {}", path.cyan(), value)),
    }
}

/// Render the outcome of a compatibility check.
pub fn render_compat(version: &str, rules: &CompatRules, supported: bool) -> String {
    let verdict = if supported {
        "supported".green().to_string()
    } else {
        "unsupported".red().to_string()
    };
    let rules = rules
        .iter()
        .map(|(op, versions)| format!("{op}[{}]", versions.join(",")))
        .collect::<Vec<_>>()
        .join(" ");
    format!("version={version} rules={rules} result={verdict}")
}

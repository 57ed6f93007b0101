use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use forti_sync::expand::get_object;
use forti_sync::flatten::refresh_object;
use forti_sync::report::render_state;
use forti_sync::request::{request_path, response_object};
use forti_sync::schema::load_schema;
use forti_sync::state::{vdom, State};
use serde_json::Value;
use tracing::debug;

use crate::cli::{ExpandArgs, GlobalArgs, OutputFormat, ReadArgs};
use crate::path_guard::ensure_payload_target;
use crate::provider_config;

pub fn run_read(args: ReadArgs, global: &GlobalArgs) -> Result<()> {
    let config = provider_config(global)?;
    let (schema, source) = load_schema(&args.resource, global.schemas_dir.as_deref())?;
    debug!(resource = %schema.name, %source, "loaded schema");

    let body = read_json(&args.response)?;
    let Some(response) = response_object(&body) else {
        bail!(
            "response {} holds no {} object",
            args.response.display(),
            schema.name
        );
    };
    let declared = match &args.state {
        Some(path) => read_state(path)?,
        None => State::new(),
    };

    let state = refresh_object(&schema, &response, &declared, &config)
        .with_context(|| format!("failed to read {}", schema.name))?;

    match args.format {
        OutputFormat::Text => println!("{}", render_state(&state)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
    }
    Ok(())
}

pub fn run_expand(args: ExpandArgs, global: &GlobalArgs) -> Result<()> {
    let config = provider_config(global)?;
    let (schema, source) = load_schema(&args.resource, global.schemas_dir.as_deref())?;
    debug!(resource = %schema.name, %source, "loaded schema");

    let state = read_state(&args.state)?;
    let mkey = schema
        .mkey
        .as_deref()
        .and_then(|key| state.get(key))
        .and_then(Value::as_str);
    debug!(
        target_path = %request_path(&schema, mkey, vdom(&state, &config), None),
        clear = args.clear,
        "building payload"
    );
    let payload = get_object(&schema, &state, &config, args.clear)
        .with_context(|| format!("failed to build {} payload", schema.name))?;
    let rendered = serde_json::to_string_pretty(&payload)?;

    match &args.output {
        Some(output) => {
            ensure_payload_target(
                output,
                &args.state,
                global.schemas_dir.as_deref(),
                &args.resource,
            )?;
            fs::write(output, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_state(path: &Path) -> Result<State> {
    match read_json(path)? {
        Value::Object(state) => Ok(state),
        other => bail!(
            "state file {} must hold a JSON object, got {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

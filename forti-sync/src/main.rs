use anyhow::{bail, Context, Result};
use clap::Parser;
use forti_compat_core::{escape_filter, natural_sort_key, order_subtable, CompatRules, SortMode};
use forti_sync::config::{load_config, ProviderConfig};
use forti_sync::report::render_compat;
use forti_sync::request::request_path;
use forti_sync::schema::{load_schema, EMBEDDED_SCHEMAS};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

mod cli;
mod path_guard;
mod state_cmd;

use cli::{
    Cli, Command, CompatArgs, FilterArgs, GlobalArgs, OutputFormat, PathArgs, ResourcesArgs,
    SortKeyArgs,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Command::Filter(args) => run_filter(args),
        Command::Compat(args) => run_compat(args),
        Command::SortKey(args) => run_sort_key(args),
        Command::Read(args) => state_cmd::run_read(args, &cli.global),
        Command::Expand(args) => state_cmd::run_expand(args, &cli.global),
        Command::Path(args) => run_path(args, &cli.global),
        Command::Resources(args) => run_resources(args, &cli.global),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file (or defaults) with the command-line firmware override applied.
pub(crate) fn provider_config(global: &GlobalArgs) -> Result<ProviderConfig> {
    let mut config = match &global.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ProviderConfig::default(),
    };
    if let Some(version) = &global.firmware_version {
        config.firmware_version = Some(version.clone());
    }
    Ok(config)
}

fn run_filter(args: FilterArgs) -> Result<()> {
    println!("{}", escape_filter(&args.expr));
    Ok(())
}

fn run_compat(args: CompatArgs) -> Result<()> {
    let rules: CompatRules = serde_json::from_str(&args.rules)
        .with_context(|| format!("invalid rules JSON: {}", args.rules))?;
    let supported = rules.matches(&args.version);

    match args.format {
        OutputFormat::Text => println!("{}", render_compat(&args.version, &rules, supported)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "version": args.version,
                "rules": rules,
                "supported": supported,
            }))?
        ),
    }

    if args.strict && !supported {
        bail!("version {} is not supported by the given rules", args.version);
    }
    Ok(())
}

fn run_sort_key(args: SortKeyArgs) -> Result<()> {
    let mode = SortMode::from_setting(&args.mode);
    let mut records = args
        .names
        .iter()
        .map(|name| {
            let mut record = Map::new();
            record.insert("name".to_string(), Value::String(name.clone()));
            record
        })
        .collect::<Vec<_>>();
    order_subtable(&mut records, "name", mode);

    let ordered = records
        .iter()
        .filter_map(|record| record.get("name").and_then(Value::as_str))
        .map(|name| (name, hex_key(&natural_sort_key(name))))
        .collect::<Vec<_>>();

    match args.format {
        OutputFormat::Text => {
            for (name, key) in &ordered {
                println!("{name}\t{key}");
            }
        }
        OutputFormat::Json => {
            let rows = ordered
                .iter()
                .map(|(name, key)| json!({"name": name, "key": key}))
                .collect::<Vec<_>>();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({"mode": mode.to_string(), "order": rows}))?
            );
        }
    }
    Ok(())
}

fn hex_key(key: &[u8]) -> String {
    key.iter().map(|b| format!("{b:02x}")).collect()
}

fn run_path(args: PathArgs, global: &GlobalArgs) -> Result<()> {
    let config = provider_config(global)?;
    let (schema, _) = load_schema(&args.resource, global.schemas_dir.as_deref())?;
    let vdom = args.vdom.as_deref().or(config.vdom.as_deref());
    println!(
        "{}",
        request_path(&schema, args.mkey.as_deref(), vdom, args.filter.as_deref())
    );
    Ok(())
}

fn run_resources(args: ResourcesArgs, global: &GlobalArgs) -> Result<()> {
    let mut rows = Vec::new();
    for name in EMBEDDED_SCHEMAS {
        let (schema, source) = load_schema(name, global.schemas_dir.as_deref())?;
        rows.push((schema, source));
    }

    match args.format {
        OutputFormat::Text => {
            for (schema, source) in &rows {
                let kind = if schema.singleton { "singleton" } else { "table" };
                println!(
                    "{}\t{}\t{}\t{} fields\t{}",
                    schema.name,
                    schema.path,
                    kind,
                    schema.fields.len(),
                    source
                );
            }
        }
        OutputFormat::Json => {
            let list = rows
                .iter()
                .map(|(schema, source)| {
                    json!({
                        "name": schema.name,
                        "path": schema.path,
                        "singleton": schema.singleton,
                        "mkey": schema.mkey,
                        "fields": schema.fields.len(),
                        "source": source,
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(())
}

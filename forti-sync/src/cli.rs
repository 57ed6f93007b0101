use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "forti-sync")]
#[command(about = "Translate FortiOS resource state to and from CMDB API payloads")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Provider config TOML (firmware_version, import_table, dynamic_sort_subtable, vdom).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory searched for <resource>.toml before the embedded schemas.
    #[arg(long, global = true)]
    pub schemas_dir: Option<PathBuf>,
    /// Device firmware version; overrides the config file.
    #[arg(long, global = true)]
    pub firmware_version: Option<String>,
    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Translate a filter expression into CMDB query parameters.
    Filter(FilterArgs),
    /// Check a firmware version against a compatibility rule set.
    Compat(CompatArgs),
    /// Print natural sort keys and the resulting order.
    SortKey(SortKeyArgs),
    /// Turn a CMDB read response into resource state.
    Read(ReadArgs),
    /// Turn resource state into a CMDB request payload.
    Expand(ExpandArgs),
    /// Print the CMDB request path for a resource.
    Path(PathArgs),
    /// List available resource schemas.
    Resources(ResourcesArgs),
}

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Filter expression, e.g. `name=port1,name=port2&fosid>=10`.
    pub expr: String,
}

#[derive(Parser, Debug)]
pub struct CompatArgs {
    /// Firmware version to check.
    #[arg(long)]
    pub version: String,
    /// Rule set as JSON, e.g. `{">=": ["6.2.0"]}`.
    #[arg(long)]
    pub rules: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Exit with an error when the version is not supported.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct SortKeyArgs {
    /// Names to order.
    #[arg(required = true)]
    pub names: Vec<String>,
    /// `natural` (or `true`), `alphabetical`, anything else keeps input order.
    #[arg(long, default_value = "natural")]
    pub mode: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Resource schema name, e.g. system_netflow.
    #[arg(long)]
    pub resource: String,
    /// CMDB response body (JSON).
    #[arg(long)]
    pub response: PathBuf,
    /// Current declared state (JSON object).
    #[arg(long)]
    pub state: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// Resource schema name, e.g. system_netflow.
    #[arg(long)]
    pub resource: String,
    /// Declared state (JSON object).
    #[arg(long)]
    pub state: PathBuf,
    /// Send every set attribute as null (singleton reset).
    #[arg(long)]
    pub clear: bool,
    /// Write the payload here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Resource schema name, e.g. system_netflow.
    #[arg(long)]
    pub resource: String,
    #[arg(long)]
    pub mkey: Option<String>,
    #[arg(long)]
    pub vdom: Option<String>,
    /// Filter expression to append.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

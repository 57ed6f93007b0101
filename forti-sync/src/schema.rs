//! Resource schema definitions and the embedded catalog.
//!
//! A schema lists the attributes of one device configuration object, how each
//! is encoded on the wire, which validator applies, and which firmware
//! versions carry it. Schemas are TOML files; a directory override is searched
//! before the copies compiled into the binary.

use std::fs;
use std::path::{Path, PathBuf};

use forti_compat_core::{CompatRules, Validator};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Wire shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    /// Integers sent as a JSON list and held in state as `"1 2 3"`.
    IntList,
    /// A list of nested records.
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub api_name: Option<String>,
    pub kind: FieldKind,
    #[serde(default)]
    pub validate: Option<Validator>,
    #[serde(default)]
    pub compat: CompatRules,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSchema>,
}

impl FieldSchema {
    /// Attribute name in API payloads (`collector_ip` -> `collector-ip`).
    pub fn api_name(&self) -> String {
        self.api_name
            .clone()
            .unwrap_or_else(|| self.name.replace('_', "-"))
    }

    /// Whether the field exists on `firmware`. Fields without rules, and all
    /// fields when the firmware is unknown, are available.
    pub fn available_on(&self, firmware: Option<&str>) -> bool {
        match firmware {
            Some(version) if !self.compat.is_empty() => {
                let available = self.compat.matches(version);
                if !available {
                    debug!(field = %self.name, firmware = version, "field not available on firmware");
                }
                available
            }
            _ => true,
        }
    }

    /// Nested field used to order table records; defaults to the first one.
    pub fn table_sort_field(&self) -> Option<&str> {
        self.sort_field
            .as_deref()
            .or_else(|| self.fields.first().map(|f| f.name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceSchema {
    pub name: String,
    /// CMDB path below `/api/v2/cmdb/`, e.g. `system/netflow`.
    pub path: String,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default)]
    pub mkey: Option<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSchema>,
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Errors returned when loading schema files.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse schema file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("unknown resource '{0}'")]
    Unknown(String),
}

/// Names of the schemas compiled into the binary.
pub const EMBEDDED_SCHEMAS: &[&str] = &[
    "firewall_internetservicegroup",
    "system_netflow",
    "system_ssofortigatecloudadmin",
    "wirelesscontrollerhotspot20_qosmap",
];

fn embedded_schema_source(name: &str) -> Option<&'static str> {
    match name {
        "firewall_internetservicegroup" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/schemas/firewall_internetservicegroup.toml"
        ))),
        "system_netflow" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/schemas/system_netflow.toml"
        ))),
        "system_ssofortigatecloudadmin" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/schemas/system_ssofortigatecloudadmin.toml"
        ))),
        "wirelesscontrollerhotspot20_qosmap" => Some(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/schemas/wirelesscontrollerhotspot20_qosmap.toml"
        ))),
        _ => None,
    }
}

/// Load a schema by resource name and report where it came from.
///
/// `<dir>/<name>.toml` wins when `schemas_dir` is given and the file exists.
/// A file that exists but does not parse is an error, not a silent fallback.
pub fn load_schema(
    name: &str,
    schemas_dir: Option<&Path>,
) -> Result<(ResourceSchema, String), SchemaLoadError> {
    if let Some(dir) = schemas_dir {
        let path = schema_path(dir, name);
        if path.exists() {
            let schema = load_schema_file(&path)?;
            return Ok((schema, format!("file:{}", path.display())));
        }
    }

    let raw = embedded_schema_source(name)
        .ok_or_else(|| SchemaLoadError::Unknown(name.to_string()))?;
    let schema = parse_schema(raw, format!("embedded {name}"))?;
    Ok((schema, "embedded".to_string()))
}

/// Load a schema from an explicit file path.
pub fn load_schema_file(path: &Path) -> Result<ResourceSchema, SchemaLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_schema(&raw, path.display().to_string())
}

fn schema_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.toml"))
}

fn parse_schema(raw: &str, path: String) -> Result<ResourceSchema, SchemaLoadError> {
    toml::from_str(raw).map_err(|source| SchemaLoadError::Parse { path, source })
}

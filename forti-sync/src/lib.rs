//! Declarative state sync for FortiOS configuration objects.
//!
//! Each resource type is described by a TOML schema (see [`schema`]). The
//! read path ([`flatten`]) turns a CMDB response into state, the write path
//! ([`expand`]) turns state into a request payload, and [`request`] builds
//! the CMDB paths both talk to. Version gating, sub-table ordering, filter
//! translation and value coercion come from `forti-compat-core`.
//!
//! ```ignore
//! use forti_sync::config::ProviderConfig;
//! use forti_sync::flatten::refresh_object;
//! use forti_sync::schema::load_schema;
//!
//! let (schema, _) = load_schema("firewall_internetservicegroup", None)?;
//! let config = ProviderConfig::default();
//! let state = refresh_object(&schema, &response, &declared, &config)?;
//! ```
//!
//! Provider settings that used to come from the process environment (such as
//! reading every sub-table on import) live on [`config::ProviderConfig`].

pub mod config;
pub mod expand;
pub mod flatten;
pub mod report;
pub mod request;
pub mod schema;
pub mod state;

//! File-based configuration
//!
//! Parses on-disk TOML configuration into parameter groups and dynamic
//! addon declarations. A configuration directory holds any number of
//! `.toml` files, read in filename order and concatenated into one
//! [`Configuration`]. Parsing failures are surfaced to the caller; a
//! broken configuration must abort startup rather than be skipped.
//!
//! On-disk shape:
//!
//! ```toml
//! [[groups]]
//! name = "async-runtime"
//! parameters = { threads = 4, debug = true }
//!
//! [[groups.groups]]
//! name = "application"
//! parameters = { application-name = "FieldLink" }
//!
//! [[modules]]
//! name = "telemetry-bridge"
//! factory = "telemetry-bridge"
//! parameters = { flush-interval = "5s" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::addon::dynamic::ModuleDeclaration;
use crate::addon::params::{ParameterGroup, ParameterSet};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode configuration TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid module declaration: {0}")]
    InvalidDeclaration(String),
}

/// Parsed configuration: parameters plus dynamic addon declarations
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Parameter groups for the merge step
    pub parameters: ParameterSet,
    /// Dynamically declared addons, appended to the submission verbatim
    pub modules: Vec<ModuleDeclaration>,
}

/// Raw on-disk file structure
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    modules: Vec<RawModule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawGroup {
    name: String,
    /// Parameter values keep their native TOML types on disk and are
    /// string-encoded when converted to the parameter model.
    #[serde(default)]
    parameters: BTreeMap<String, toml::Value>,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawModule {
    name: String,
    factory: String,
    #[serde(default)]
    parameters: BTreeMap<String, toml::Value>,
}

fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn group_from_raw(raw: &RawGroup) -> ParameterGroup {
    let mut group = ParameterGroup::new(raw.name.clone());
    for (name, value) in &raw.parameters {
        group.add_parameter(name.clone(), value_to_string(value));
    }
    group.groups = raw.groups.iter().map(group_from_raw).collect();
    group
}

fn group_to_raw(group: &ParameterGroup) -> RawGroup {
    RawGroup {
        name: group.name.clone(),
        parameters: group
            .parameters
            .iter()
            .map(|p| (p.name.clone(), toml::Value::String(p.value.clone())))
            .collect(),
        groups: group.groups.iter().map(group_to_raw).collect(),
    }
}

fn module_from_raw(raw: &RawModule) -> Result<ModuleDeclaration, ConfigError> {
    if raw.name.is_empty() {
        return Err(ConfigError::InvalidDeclaration(
            "module name cannot be empty".to_string(),
        ));
    }
    if raw.factory.is_empty() {
        return Err(ConfigError::InvalidDeclaration(format!(
            "module {} declares no factory",
            raw.name
        )));
    }

    let mut parameters = ParameterGroup::new(raw.name.clone());
    for (name, value) in &raw.parameters {
        parameters.add_parameter(name.clone(), value_to_string(value));
    }
    Ok(ModuleDeclaration {
        name: raw.name.clone(),
        factory: raw.factory.clone(),
        parameters,
    })
}

fn configuration_from_raw(raw: RawConfig) -> Result<Configuration, ConfigError> {
    let mut configuration = Configuration::default();
    for group in &raw.groups {
        configuration.parameters.add_group(group_from_raw(group));
    }
    for module in &raw.modules {
        configuration.modules.push(module_from_raw(module)?);
    }
    Ok(configuration)
}

/// Parse a single configuration file
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let raw: RawConfig = toml::from_str(&contents)?;
    debug!(
        "parsed configuration file {}: {} groups, {} modules",
        path.as_ref().display(),
        raw.groups.len(),
        raw.modules.len()
    );
    configuration_from_raw(raw)
}

/// Parse every `.toml` file in a directory, filename-sorted
///
/// Files concatenate: groups and module declarations from later files
/// append after earlier ones, so override-by-identity resolves in
/// filename order.
pub fn parse_config_dir<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    let mut files: Vec<_> = std::fs::read_dir(path.as_ref())?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut configuration = Configuration::default();
    for file in files {
        let parsed = parse_config_file(&file)?;
        configuration.parameters.groups.extend(parsed.parameters.groups);
        configuration.modules.extend(parsed.modules);
    }
    Ok(configuration)
}

/// Write a configuration to a single TOML file
///
/// Parameter values are written as strings; the string encoding is what
/// addons consume either way.
pub fn save_config_file<P: AsRef<Path>>(
    configuration: &Configuration,
    path: P,
) -> Result<(), ConfigError> {
    let raw = RawConfig {
        groups: configuration.parameters.groups.iter().map(group_to_raw).collect(),
        modules: configuration
            .modules
            .iter()
            .map(|m| RawModule {
                name: m.name.clone(),
                factory: m.factory.clone(),
                parameters: m
                    .parameters
                    .parameters
                    .iter()
                    .map(|p| (p.name.clone(), toml::Value::String(p.value.clone())))
                    .collect(),
            })
            .collect(),
    };
    let contents = toml::to_string_pretty(&raw)?;
    std::fs::write(path.as_ref(), contents)?;
    Ok(())
}

//! Parameter model for addon configuration
//!
//! Plain data shared by every configuration source: named string values,
//! grouped under the identity of the addon they configure, with nested
//! groups for compound sub-configuration such as endpoint descriptions.

use serde::{Deserialize, Serialize};

/// A single named configuration value
///
/// Values are string-encoded regardless of origin; addons decode them at
/// initialize time. A parameter is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// String-encoded value
    pub value: String,
}

impl Parameter {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named bundle of parameters with optional nested groups
///
/// The group name is the identity used to match caller configuration
/// against addon descriptors during assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroup {
    /// Group identity
    pub name: String,
    /// Flat parameters of this group
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Nested sub-groups
    #[serde(default)]
    pub groups: Vec<ParameterGroup>,
}

impl ParameterGroup {
    /// Create an empty group with the given identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push(Parameter::new(name, value));
    }

    /// Look up a parameter value by name (first match)
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Read a boolean parameter
    ///
    /// Accepts `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, case
    /// insensitive. Returns `None` when the parameter is absent or the
    /// value is not recognizable as a boolean.
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        match self.param(name)?.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// Read an integer parameter, `None` when absent or unparseable
    pub fn int_param<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.param(name)?.parse().ok()
    }

    /// Look up a nested group by name (first match)
    pub fn subgroup(&self, name: &str) -> Option<&ParameterGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Iterate all nested groups with the given name
    pub fn subgroups<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParameterGroup> {
        self.groups.iter().filter(move |g| g.name == name)
    }

    /// True when the group carries no parameters and no nested groups
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.groups.is_empty()
    }
}

/// An unordered collection of top-level parameter groups
///
/// The unit every configuration source produces and the merge step
/// consumes. Built fresh per configuration run and discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Top-level groups, keyed by their names during assembly
    #[serde(default)]
    pub groups: Vec<ParameterGroup>,
}

impl ParameterSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group
    pub fn add_group(&mut self, group: ParameterGroup) {
        self.groups.push(group);
    }

    /// Look up a top-level group by name (first match)
    pub fn group(&self, name: &str) -> Option<&ParameterGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

//! Addon descriptor
//!
//! The unit of registration: identity, construction capability, static
//! dependency edges, and the configuration the addon will receive.

use std::fmt;
use std::sync::Arc;

use crate::addon::params::ParameterGroup;
use crate::addon::traits::AddonFactory;

/// Describes one addon to be constructed by the registration authority
///
/// Created once per configuration run. The parameter group starts empty
/// (named after the addon identity) and is replaced wholesale when the
/// caller supplies configuration under the same identity; dependency
/// edges are fixed at construction and never altered by merging.
#[derive(Clone)]
pub struct AddonDescriptor {
    /// Unique addon identity within a submitted list
    pub id: String,
    /// Handle able to construct the running addon
    pub factory: Arc<dyn AddonFactory>,
    /// Identities that must be initialized before this addon
    pub dependencies: Vec<String>,
    /// Configuration handed to the addon at initialize time
    pub parameters: ParameterGroup,
}

impl AddonDescriptor {
    /// Create a descriptor with no dependencies and an empty parameter group
    pub fn new(id: impl Into<String>, factory: Arc<dyn AddonFactory>) -> Self {
        let id = id.into();
        let parameters = ParameterGroup::new(id.clone());
        Self {
            id,
            factory,
            dependencies: Vec::new(),
            parameters,
        }
    }

    /// Set the static dependency edges
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Replace the attached parameter group wholesale
    pub fn with_parameters(mut self, parameters: ParameterGroup) -> Self {
        self.parameters = parameters;
        self
    }
}

impl fmt::Debug for AddonDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddonDescriptor")
            .field("id", &self.id)
            .field("dependencies", &self.dependencies)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

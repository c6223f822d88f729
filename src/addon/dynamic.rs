//! Dynamically declared addons
//!
//! File-based configuration may declare addons beyond the built-in set:
//! an identity, a factory name, and parameters. Factory names resolve
//! against a registry of known constructors; there is no reflective code
//! loading, a declaration naming an unknown factory is an error before
//! anything is submitted.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::addon::descriptor::AddonDescriptor;
use crate::addon::params::ParameterGroup;
use crate::addon::traits::{AddonError, AddonFactory};

/// A dynamic addon declaration from file-based configuration
#[derive(Debug, Clone)]
pub struct ModuleDeclaration {
    /// Addon identity the declaration registers under
    pub name: String,
    /// Name of the factory that constructs it
    pub factory: String,
    /// Parameters handed to the addon at initialize time
    pub parameters: ParameterGroup,
}

/// Maps factory names to addon constructors
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Arc<dyn AddonFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a name; replaces any previous entry
    pub fn insert(&mut self, name: impl Into<String>, factory: Arc<dyn AddonFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// True when a factory is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolve one declaration into a descriptor
    ///
    /// Dynamic addons carry no dependency edges; the declaration's
    /// parameters are attached under the addon's own identity.
    pub fn resolve(&self, declaration: &ModuleDeclaration) -> Result<AddonDescriptor, AddonError> {
        let factory = self
            .factories
            .get(&declaration.factory)
            .ok_or_else(|| AddonError::FactoryNotFound(declaration.factory.clone()))?;
        debug!(
            "resolved dynamic addon {} via factory {}",
            declaration.name, declaration.factory
        );

        let mut parameters = declaration.parameters.clone();
        parameters.name = declaration.name.clone();
        Ok(AddonDescriptor::new(declaration.name.clone(), Arc::clone(factory))
            .with_dependencies(Vec::new())
            .with_parameters(parameters))
    }

    /// Resolve a declaration list, failing on the first unknown factory
    pub fn resolve_all(
        &self,
        declarations: &[ModuleDeclaration],
    ) -> Result<Vec<AddonDescriptor>, AddonError> {
        declarations.iter().map(|d| self.resolve(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::traits::Addon;

    struct NullAddon;

    impl Addon for NullAddon {
        fn initialize(&mut self, _parameters: &ParameterGroup) -> Result<(), AddonError> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), AddonError> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    struct NullFactory;

    impl AddonFactory for NullFactory {
        fn create(&self) -> Box<dyn Addon> {
            Box::new(NullAddon)
        }
    }

    fn declaration(name: &str, factory: &str) -> ModuleDeclaration {
        let mut parameters = ParameterGroup::new(name);
        parameters.add_parameter("key", "value");
        ModuleDeclaration {
            name: name.to_string(),
            factory: factory.to_string(),
            parameters,
        }
    }

    #[test]
    fn test_resolves_known_factory() {
        let mut registry = FactoryRegistry::new();
        registry.insert("null", Arc::new(NullFactory));

        let descriptor = registry.resolve(&declaration("telemetry-bridge", "null")).unwrap();
        assert_eq!(descriptor.id, "telemetry-bridge");
        assert!(descriptor.dependencies.is_empty());
        assert_eq!(descriptor.parameters.param("key"), Some("value"));
    }

    #[test]
    fn test_unknown_factory_is_an_error() {
        let registry = FactoryRegistry::new();

        match registry.resolve(&declaration("x", "ghost")) {
            Err(AddonError::FactoryNotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected factory-not-found, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let mut registry = FactoryRegistry::new();
        registry.insert("null", Arc::new(NullFactory));

        let declarations = vec![declaration("a", "null"), declaration("b", "ghost")];
        assert!(matches!(
            registry.resolve_all(&declarations),
            Err(AddonError::FactoryNotFound(_))
        ));
    }
}

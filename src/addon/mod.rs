//! Addon system
//!
//! The generic half of server composition: the parameter model, addon
//! descriptors, the factory and registry contracts, dynamic addon
//! declarations, and the manager that constructs addon sets in
//! dependency order. Knows nothing about the built-in server addons;
//! those live under [`crate::server`].

pub mod dependencies;
pub mod descriptor;
pub mod dynamic;
pub mod manager;
pub mod params;
pub mod traits;

pub use dependencies::AddonDependencies;
pub use descriptor::AddonDescriptor;
pub use dynamic::{FactoryRegistry, ModuleDeclaration};
pub use manager::AddonManager;
pub use params::{Parameter, ParameterGroup, ParameterSet};
pub use traits::{Addon, AddonError, AddonFactory, AddonRegistry, AddonState};

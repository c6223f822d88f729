//! Addon system traits and errors
//!
//! Defines the contract between addon implementations, their factories,
//! and the registration authority that constructs them.

use std::any::Any;
use thiserror::Error;

use crate::addon::descriptor::AddonDescriptor;
use crate::addon::params::ParameterGroup;

/// Addon lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddonState {
    /// Descriptor accepted, addon not yet constructed
    Registered,
    /// Constructed and initialized, dependencies live
    Initialized,
    /// Stopped after a successful initialization
    Stopped,
    /// Initialization or stop failed
    Failed(String),
}

/// Addon trait that all server addons implement
///
/// Initialization receives the parameter group attached to the addon's
/// descriptor; the registration authority guarantees every declared
/// dependency has been initialized before `initialize` is called.
pub trait Addon: Send + Sync {
    /// Initialize the addon from its configured parameters
    fn initialize(&mut self, parameters: &ParameterGroup) -> Result<(), AddonError>;

    /// Stop the addon and release its resources
    fn stop(&mut self) -> Result<(), AddonError>;

    /// Downcast support for typed lookup through the manager
    fn as_any(&self) -> &dyn Any;
}

/// Factory capable of constructing one kind of addon
///
/// Descriptors carry a factory handle instead of a constructed addon so
/// that assembly stays decoupled from construction: the registration
/// authority decides when each addon comes to life.
pub trait AddonFactory: Send + Sync {
    /// Construct a fresh, uninitialized addon instance
    fn create(&self) -> Box<dyn Addon>;
}

/// The registration authority boundary
///
/// Accepts a complete descriptor list in one call and owns dependency
/// resolution, duplicate detection, and construction order. Ownership of
/// the descriptors moves into the registry; the caller never touches
/// them again.
pub trait AddonRegistry {
    /// Register and construct a full addon set
    ///
    /// Must reject duplicate identities, missing dependencies, and
    /// dependency cycles, and must fail the whole registration rather
    /// than leave a partial set running.
    fn register(&mut self, addons: Vec<AddonDescriptor>) -> Result<(), AddonError>;
}

/// Addon system errors
#[derive(Debug, Error)]
pub enum AddonError {
    #[error("duplicate addon identity: {0}")]
    DuplicateAddon(String),

    #[error("addon {addon} depends on unknown addon {dependency}")]
    DependencyMissing { addon: String, dependency: String },

    #[error("circular dependency among addons: {0}")]
    DependencyCycle(String),

    #[error("addon not found: {0}")]
    AddonNotFound(String),

    #[error("unknown addon factory: {0}")]
    FactoryNotFound(String),

    #[error("addon {addon} failed to initialize: {reason}")]
    InitializationFailed { addon: String, reason: String },

    #[error("addon {addon}: invalid value {value:?} for parameter {name}")]
    InvalidParameter {
        addon: String,
        name: String,
        value: String,
    },

    #[error("addon set already registered")]
    AlreadyRegistered,
}

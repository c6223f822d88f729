//! FieldLink server addon composition core
//!
//! Assembles the set of service addons a FieldLink telemetry server
//! needs to run. Caller-supplied configuration, whether a small typed
//! options record or on-disk TOML files, is merged into the canonical
//! default addon graph and the resulting descriptors are handed to an
//! addon registry that constructs them in dependency order.
//!
//! ## Layers
//!
//! 1. [`addon`] — the generic addon system: parameter model,
//!    descriptors, factory/registry contracts, dependency-ordered
//!    construction through [`addon::AddonManager`]
//! 2. [`config`] — the file-based configuration parser
//! 3. [`server`] — the built-in addon graph and the composition driver
//!
//! ## Design principles
//!
//! 1. **Pure assembly**: composition builds descriptor lists; the
//!    registry alone decides when and in what order addons come to life
//! 2. **Fresh per run**: the default graph is rebuilt for every
//!    registration, never cached
//! 3. **Fail whole**: duplicate identities, unresolvable dependencies,
//!    and initialization failures abort the entire registration rather
//!    than leaving a partial server running
//!
//! ## Example
//!
//! ```rust,no_run
//! use fieldlink_server::addon::AddonManager;
//! use fieldlink_server::server::{
//!     register_server_addons, ApplicationDescription, EndpointDescription, ServerOptions,
//! };
//!
//! let options = ServerOptions {
//!     debug: false,
//!     threads: 4,
//!     endpoint: EndpointDescription {
//!         url: "field.tcp://0.0.0.0:4870".to_string(),
//!     },
//!     application: ApplicationDescription {
//!         name: "FieldLink Server".to_string(),
//!         uri: "urn:fieldlink:server".to_string(),
//!         product_uri: "urn:fieldlink:product".to_string(),
//!     },
//! };
//!
//! let mut manager = AddonManager::new();
//! register_server_addons(&options, &mut manager).expect("server startup failed");
//! ```

pub mod addon;
pub mod config;
pub mod server;
pub mod utils;

pub use addon::{
    Addon, AddonDescriptor, AddonError, AddonFactory, AddonManager, AddonRegistry, AddonState,
    FactoryRegistry, ModuleDeclaration, Parameter, ParameterGroup, ParameterSet,
};
pub use config::{parse_config_dir, parse_config_file, save_config_file, ConfigError, Configuration};
pub use server::{
    load_configuration, register_server_addons, ApplicationData, ApplicationDescription,
    EndpointDescription, ServerOptions,
};

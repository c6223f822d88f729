//! Built-in addon implementations
//!
//! One shell per built-in identity plus its factory. Each addon decodes
//! its own slice of configuration at initialize time: the service
//! registries capture the debug flag, the async runtime builds a sized
//! Tokio thread pool, and the transports decode the application and
//! endpoint descriptions carried in their nested parameter groups. The
//! service logic behind each shell (address space storage, subscription
//! delivery, wire codecs) lives in the respective service crates.

use std::any::Any;
use tracing::{debug, info};

use crate::addon::params::ParameterGroup;
use crate::addon::traits::{Addon, AddonError, AddonFactory};
use crate::server::addons::ASYNC_RUNTIME_ID;
use crate::server::options::{applications_from_group, ApplicationData};

fn debug_flag(parameters: &ParameterGroup) -> bool {
    parameters.bool_param("debug").unwrap_or(false)
}

macro_rules! registry_addon {
    ($(#[$meta:meta])* $addon:ident, $factory:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $addon {
            debug: bool,
        }

        impl $addon {
            pub fn debug(&self) -> bool {
                self.debug
            }
        }

        impl Addon for $addon {
            fn initialize(&mut self, parameters: &ParameterGroup) -> Result<(), AddonError> {
                self.debug = debug_flag(parameters);
                debug!("{} initialized (debug={})", parameters.name, self.debug);
                Ok(())
            }

            fn stop(&mut self) -> Result<(), AddonError> {
                Ok(())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        pub struct $factory;

        impl AddonFactory for $factory {
            fn create(&self) -> Box<dyn Addon> {
                Box::<$addon>::default()
            }
        }
    };
}

registry_addon!(
    /// Routes service calls between addons
    ServicesRegistryAddon,
    ServicesRegistryFactory
);
registry_addon!(
    /// Owns the server's address space
    AddressSpaceAddon,
    AddressSpaceFactory
);
registry_addon!(
    /// Loads the standard namespace into the address space
    StandardNamespaceAddon,
    StandardNamespaceFactory
);
registry_addon!(
    /// Tracks the endpoints the server announces
    EndpointsRegistryAddon,
    EndpointsRegistryFactory
);
registry_addon!(
    /// Subscription and notification delivery
    SubscriptionServiceAddon,
    SubscriptionServiceFactory
);
registry_addon!(
    /// The server's self-describing object
    ServerObjectAddon,
    ServerObjectFactory
);

/// Owns the shared Tokio runtime sized by the `threads` parameter
///
/// Other addons declare a dependency on [`ASYNC_RUNTIME_ID`] and borrow
/// the handle; the runtime lives until the addon is stopped.
#[derive(Default)]
pub struct AsyncRuntimeAddon {
    runtime: Option<tokio::runtime::Runtime>,
    threads: usize,
    debug: bool,
}

impl AsyncRuntimeAddon {
    /// Worker threads the runtime was built with
    pub fn worker_threads(&self) -> usize {
        self.threads
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Handle to the owned runtime; `None` before initialize or after stop
    pub fn handle(&self) -> Option<tokio::runtime::Handle> {
        self.runtime.as_ref().map(|rt| rt.handle().clone())
    }
}

impl Addon for AsyncRuntimeAddon {
    fn initialize(&mut self, parameters: &ParameterGroup) -> Result<(), AddonError> {
        let threads = match parameters.param("threads") {
            Some(raw) => raw.parse::<usize>().ok().filter(|&n| n > 0).ok_or_else(|| {
                AddonError::InvalidParameter {
                    addon: ASYNC_RUNTIME_ID.to_string(),
                    name: "threads".to_string(),
                    value: raw.to_string(),
                }
            })?,
            None => 2,
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("fieldlink-worker")
            .enable_all()
            .build()
            .map_err(|e| AddonError::InitializationFailed {
                addon: ASYNC_RUNTIME_ID.to_string(),
                reason: e.to_string(),
            })?;

        self.threads = threads;
        self.debug = debug_flag(parameters);
        self.runtime = Some(runtime);
        info!("async runtime started with {} worker threads", threads);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AddonError> {
        if let Some(runtime) = self.runtime.take() {
            // Tasks still running are detached rather than waited on;
            // dependents were stopped first.
            runtime.shutdown_background();
            info!("async runtime stopped");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct AsyncRuntimeFactory;

impl AddonFactory for AsyncRuntimeFactory {
    fn create(&self) -> Box<dyn Addon> {
        Box::<AsyncRuntimeAddon>::default()
    }
}

macro_rules! transport_addon {
    ($(#[$meta:meta])* $addon:ident, $factory:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $addon {
            applications: Vec<ApplicationData>,
            debug: bool,
        }

        impl $addon {
            /// Applications decoded from the transport's parameter group
            pub fn applications(&self) -> &[ApplicationData] {
                &self.applications
            }

            pub fn debug(&self) -> bool {
                self.debug
            }
        }

        impl Addon for $addon {
            fn initialize(&mut self, parameters: &ParameterGroup) -> Result<(), AddonError> {
                self.debug = debug_flag(parameters);
                self.applications = applications_from_group(parameters);
                let endpoints: usize = self.applications.iter().map(|a| a.endpoints.len()).sum();
                info!(
                    "{} transport configured: {} applications, {} endpoints",
                    $label,
                    self.applications.len(),
                    endpoints
                );
                Ok(())
            }

            fn stop(&mut self) -> Result<(), AddonError> {
                Ok(())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        pub struct $factory;

        impl AddonFactory for $factory {
            fn create(&self) -> Box<dyn Addon> {
                Box::<$addon>::default()
            }
        }
    };
}

transport_addon!(
    /// Synchronous binary protocol binding
    BinaryProtocolAddon,
    BinaryProtocolFactory,
    "binary-protocol"
);
transport_addon!(
    /// Fully asynchronous transport binding
    AsyncTransportAddon,
    AsyncTransportFactory,
    "async"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::options::{application_parameters, ApplicationDescription, EndpointDescription};

    #[test]
    fn test_runtime_honors_threads_parameter() {
        let mut group = ParameterGroup::new(ASYNC_RUNTIME_ID);
        group.add_parameter("threads", "3");
        group.add_parameter("debug", "true");

        let mut addon = AsyncRuntimeAddon::default();
        addon.initialize(&group).unwrap();
        assert_eq!(addon.worker_threads(), 3);
        assert!(addon.debug());

        let handle = addon.handle().unwrap();
        let sum = handle.block_on(async { 2 + 2 });
        assert_eq!(sum, 4);

        addon.stop().unwrap();
        assert!(addon.handle().is_none());
    }

    #[test]
    fn test_runtime_rejects_zero_threads() {
        let mut group = ParameterGroup::new(ASYNC_RUNTIME_ID);
        group.add_parameter("threads", "0");

        let mut addon = AsyncRuntimeAddon::default();
        assert!(matches!(
            addon.initialize(&group),
            Err(AddonError::InvalidParameter { ref name, .. }) if name == "threads"
        ));
    }

    #[test]
    fn test_runtime_rejects_unparseable_threads() {
        let mut group = ParameterGroup::new(ASYNC_RUNTIME_ID);
        group.add_parameter("threads", "many");

        let mut addon = AsyncRuntimeAddon::default();
        assert!(addon.initialize(&group).is_err());
    }

    #[test]
    fn test_transport_decodes_application_data() {
        let data = ApplicationData {
            application: ApplicationDescription {
                name: "FieldLink Server".to_string(),
                uri: "urn:fieldlink:server".to_string(),
                product_uri: "urn:fieldlink:product".to_string(),
            },
            endpoints: vec![EndpointDescription {
                url: "field.tcp://0.0.0.0:4870".to_string(),
            }],
        };

        let mut group = ParameterGroup::new("async-transport");
        group.add_parameter("debug", "true");
        group.groups = application_parameters(std::slice::from_ref(&data), true);

        let mut addon = AsyncTransportAddon::default();
        addon.initialize(&group).unwrap();
        assert!(addon.debug());
        assert_eq!(addon.applications(), &[data]);
    }

    #[test]
    fn test_registry_addon_captures_debug() {
        let mut group = ParameterGroup::new("address-space-registry");
        group.add_parameter("debug", "true");

        let mut addon = AddressSpaceAddon::default();
        addon.initialize(&group).unwrap();
        assert!(addon.debug());
    }
}

//! Default addon graph
//!
//! Identity constants and one factory function per built-in addon.
//! Every function returns a fresh descriptor with its fixed dependency
//! edges and an empty parameter group; the graph is rebuilt from
//! scratch for each registration run, nothing is cached.
//!
//! The backbone is the seven non-transport addons. The two transports
//! (`binary-protocol`, `async-transport`) are optional: a transport
//! descriptor is only created when the caller supplies a parameter
//! group under its identity.

use std::sync::Arc;

use crate::addon::descriptor::AddonDescriptor;
use crate::server::services::{
    AddressSpaceFactory, AsyncRuntimeFactory, AsyncTransportFactory, BinaryProtocolFactory,
    EndpointsRegistryFactory, ServerObjectFactory, ServicesRegistryFactory,
    StandardNamespaceFactory, SubscriptionServiceFactory,
};

/// Service call routing registry
pub const SERVICES_REGISTRY_ID: &str = "services-registry";
/// Address space storage and access
pub const ADDRESS_SPACE_ID: &str = "address-space-registry";
/// Standard namespace nodes loaded into the address space
pub const STANDARD_NAMESPACE_ID: &str = "standard-namespace";
/// Endpoint announcement registry
pub const ENDPOINTS_REGISTRY_ID: &str = "endpoints-registry";
/// Shared async runtime (worker thread pool)
pub const ASYNC_RUNTIME_ID: &str = "async-runtime";
/// Subscription and notification engine
pub const SUBSCRIPTION_SERVICE_ID: &str = "subscription-service";
/// The server's self-describing object
pub const SERVER_OBJECT_ID: &str = "server-object";
/// Synchronous binary protocol transport
pub const BINARY_PROTOCOL_ID: &str = "binary-protocol";
/// Fully asynchronous transport
pub const ASYNC_TRANSPORT_ID: &str = "async-transport";

/// The always-present addon identities
pub const BACKBONE_IDS: [&str; 7] = [
    SERVICES_REGISTRY_ID,
    ADDRESS_SPACE_ID,
    STANDARD_NAMESPACE_ID,
    ENDPOINTS_REGISTRY_ID,
    ASYNC_RUNTIME_ID,
    SUBSCRIPTION_SERVICE_ID,
    SERVER_OBJECT_ID,
];

pub fn create_services_registry_addon() -> AddonDescriptor {
    AddonDescriptor::new(SERVICES_REGISTRY_ID, Arc::new(ServicesRegistryFactory))
}

pub fn create_address_space_addon() -> AddonDescriptor {
    AddonDescriptor::new(ADDRESS_SPACE_ID, Arc::new(AddressSpaceFactory))
        .with_dependencies(vec![SERVICES_REGISTRY_ID.to_string()])
}

pub fn create_standard_namespace_addon() -> AddonDescriptor {
    AddonDescriptor::new(STANDARD_NAMESPACE_ID, Arc::new(StandardNamespaceFactory))
        .with_dependencies(vec![ADDRESS_SPACE_ID.to_string()])
}

pub fn create_endpoints_registry_addon() -> AddonDescriptor {
    AddonDescriptor::new(ENDPOINTS_REGISTRY_ID, Arc::new(EndpointsRegistryFactory))
        .with_dependencies(vec![SERVICES_REGISTRY_ID.to_string()])
}

pub fn create_async_runtime_addon() -> AddonDescriptor {
    AddonDescriptor::new(ASYNC_RUNTIME_ID, Arc::new(AsyncRuntimeFactory))
}

pub fn create_subscription_service_addon() -> AddonDescriptor {
    AddonDescriptor::new(SUBSCRIPTION_SERVICE_ID, Arc::new(SubscriptionServiceFactory))
        .with_dependencies(vec![
            ASYNC_RUNTIME_ID.to_string(),
            ADDRESS_SPACE_ID.to_string(),
            SERVICES_REGISTRY_ID.to_string(),
        ])
}

pub fn create_server_object_addon() -> AddonDescriptor {
    AddonDescriptor::new(SERVER_OBJECT_ID, Arc::new(ServerObjectFactory)).with_dependencies(vec![
        STANDARD_NAMESPACE_ID.to_string(),
        SERVICES_REGISTRY_ID.to_string(),
        ASYNC_RUNTIME_ID.to_string(),
    ])
}

pub fn create_binary_protocol_addon() -> AddonDescriptor {
    AddonDescriptor::new(BINARY_PROTOCOL_ID, Arc::new(BinaryProtocolFactory)).with_dependencies(
        vec![
            ENDPOINTS_REGISTRY_ID.to_string(),
            SUBSCRIPTION_SERVICE_ID.to_string(),
        ],
    )
}

pub fn create_async_transport_addon() -> AddonDescriptor {
    AddonDescriptor::new(ASYNC_TRANSPORT_ID, Arc::new(AsyncTransportFactory)).with_dependencies(
        vec![
            ASYNC_RUNTIME_ID.to_string(),
            ENDPOINTS_REGISTRY_ID.to_string(),
            SUBSCRIPTION_SERVICE_ID.to_string(),
        ],
    )
}

//! Server composition
//!
//! The built-in addon graph, its addon implementations, the typed
//! options record, and the composition driver that assembles and
//! registers a complete server addon set.

pub mod addons;
pub mod composition;
pub mod options;
pub mod services;

pub use addons::{
    create_address_space_addon, create_async_runtime_addon, create_async_transport_addon,
    create_binary_protocol_addon, create_endpoints_registry_addon, create_server_object_addon,
    create_services_registry_addon, create_standard_namespace_addon,
    create_subscription_service_addon, ADDRESS_SPACE_ID, ASYNC_RUNTIME_ID, ASYNC_TRANSPORT_ID,
    BACKBONE_IDS, BINARY_PROTOCOL_ID, ENDPOINTS_REGISTRY_ID, SERVER_OBJECT_ID,
    SERVICES_REGISTRY_ID, STANDARD_NAMESPACE_ID, SUBSCRIPTION_SERVICE_ID,
};
pub use composition::{
    apply_configuration, load_configuration, options_parameters, register_server_addons,
};
pub use options::{
    application_parameters, applications_from_group, ApplicationData, ApplicationDescription,
    EndpointDescription, ServerOptions,
};

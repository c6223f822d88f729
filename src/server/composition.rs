//! Server composition: merge step, configuration adapters, driver
//!
//! Reconciles caller-supplied parameter groups with the default addon
//! graph and submits the result to a registration authority. Composition
//! is pure assembly: it never starts addons, never reorders by
//! dependency, and holds no state between runs.

use anyhow::Context;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::addon::descriptor::AddonDescriptor;
use crate::addon::dynamic::FactoryRegistry;
use crate::addon::params::{ParameterGroup, ParameterSet};
use crate::addon::traits::{AddonError, AddonRegistry};
use crate::config;
use crate::server::addons::{
    create_address_space_addon, create_async_runtime_addon, create_async_transport_addon,
    create_binary_protocol_addon, create_endpoints_registry_addon, create_server_object_addon,
    create_services_registry_addon, create_standard_namespace_addon,
    create_subscription_service_addon, ADDRESS_SPACE_ID, ASYNC_RUNTIME_ID, ASYNC_TRANSPORT_ID,
    BINARY_PROTOCOL_ID, ENDPOINTS_REGISTRY_ID, SERVER_OBJECT_ID, SERVICES_REGISTRY_ID,
    STANDARD_NAMESPACE_ID, SUBSCRIPTION_SERVICE_ID,
};
use crate::server::options::{application_parameters, ApplicationData, ServerOptions};

/// Merge caller parameters into the default graph and append the result
///
/// Builds the backbone fresh, replaces a backbone descriptor's parameter
/// group wholesale whenever the caller supplies a group under its
/// identity (a later group under the same identity wins), and appends a
/// transport descriptor for each group under a transport identity.
/// Groups matching no known identity are left for other consumers.
/// Dependency edges are never touched.
///
/// `addons` may already contain dynamically declared addons; transports
/// and then the backbone are appended after them.
pub fn apply_configuration(parameters: &ParameterSet, addons: &mut Vec<AddonDescriptor>) {
    let mut endpoints_registry = create_endpoints_registry_addon();
    let mut address_space = create_address_space_addon();
    let mut async_runtime = create_async_runtime_addon();
    let mut subscription_service = create_subscription_service_addon();
    let mut services_registry = create_services_registry_addon();
    let mut standard_namespace = create_standard_namespace_addon();
    let mut server_object = create_server_object_addon();

    for group in &parameters.groups {
        match group.name.as_str() {
            ENDPOINTS_REGISTRY_ID => endpoints_registry.parameters = group.clone(),
            ADDRESS_SPACE_ID => address_space.parameters = group.clone(),
            ASYNC_RUNTIME_ID => async_runtime.parameters = group.clone(),
            SUBSCRIPTION_SERVICE_ID => subscription_service.parameters = group.clone(),
            SERVICES_REGISTRY_ID => services_registry.parameters = group.clone(),
            STANDARD_NAMESPACE_ID => standard_namespace.parameters = group.clone(),
            SERVER_OBJECT_ID => server_object.parameters = group.clone(),
            BINARY_PROTOCOL_ID => {
                let transport = create_binary_protocol_addon().with_parameters(group.clone());
                addons.push(transport);
            }
            ASYNC_TRANSPORT_ID => {
                let transport = create_async_transport_addon().with_parameters(group.clone());
                addons.push(transport);
            }
            other => debug!("ignoring parameter group with unknown identity {}", other),
        }
    }

    addons.push(endpoints_registry);
    addons.push(address_space);
    addons.push(async_runtime);
    addons.push(subscription_service);
    addons.push(services_registry);
    addons.push(standard_namespace);
    addons.push(server_object);
}

/// Synthesize a parameter set from the typed options record
///
/// Always activates the asynchronous transport and never the binary
/// protocol. A worker-thread count of zero is rejected here rather than
/// surfacing as a runtime construction failure.
pub fn options_parameters(options: &ServerOptions) -> Result<ParameterSet, AddonError> {
    if options.threads == 0 {
        return Err(AddonError::InvalidParameter {
            addon: ASYNC_RUNTIME_ID.to_string(),
            name: "threads".to_string(),
            value: "0".to_string(),
        });
    }
    let debug_value = if options.debug { "true" } else { "false" };

    let mut parameters = ParameterSet::new();

    let mut async_runtime = ParameterGroup::new(ASYNC_RUNTIME_ID);
    async_runtime.add_parameter("threads", options.threads.to_string());
    async_runtime.add_parameter("debug", debug_value);
    parameters.add_group(async_runtime);

    for id in [ADDRESS_SPACE_ID, ENDPOINTS_REGISTRY_ID, SUBSCRIPTION_SERVICE_ID] {
        let mut group = ParameterGroup::new(id);
        group.add_parameter("debug", debug_value);
        parameters.add_group(group);
    }

    let application_data = ApplicationData {
        application: options.application.clone(),
        endpoints: vec![options.endpoint.clone()],
    };
    let mut transport = ParameterGroup::new(ASYNC_TRANSPORT_ID);
    transport.add_parameter("debug", debug_value);
    transport.groups = application_parameters(&[application_data], options.debug);
    parameters.add_group(transport);

    Ok(parameters)
}

fn warn_if_transportless(addons: &[AddonDescriptor]) {
    let has_transport = addons
        .iter()
        .any(|a| a.id == ASYNC_TRANSPORT_ID || a.id == BINARY_PROTOCOL_ID);
    if !has_transport {
        warn!("no transport addon configured; server will not accept connections");
    }
}

/// Assemble and register the addon set for a typed options record
pub fn register_server_addons(
    options: &ServerOptions,
    registry: &mut impl AddonRegistry,
) -> anyhow::Result<()> {
    let parameters = options_parameters(options)?;
    let mut addons = Vec::new();
    apply_configuration(&parameters, &mut addons);
    warn_if_transportless(&addons);

    info!("registering {} server addons", addons.len());
    registry
        .register(addons)
        .context("addon registration failed")
}

/// Assemble and register the addon set from a configuration directory
///
/// Dynamically declared addons are resolved against `factories` and
/// submitted ahead of the backbone, with no dependency validation here;
/// the registry surfaces unresolvable or duplicate identities.
pub fn load_configuration(
    config_dir: &Path,
    factories: &FactoryRegistry,
    registry: &mut impl AddonRegistry,
) -> anyhow::Result<()> {
    let configuration = config::parse_config_dir(config_dir).with_context(|| {
        format!("failed to load configuration from {}", config_dir.display())
    })?;

    let mut addons = factories
        .resolve_all(&configuration.modules)
        .context("failed to resolve dynamic addon declarations")?;
    apply_configuration(&configuration.parameters, &mut addons);
    warn_if_transportless(&addons);

    info!(
        "registering {} server addons ({} dynamic)",
        addons.len(),
        configuration.modules.len()
    );
    registry
        .register(addons)
        .context("addon registration failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::addons::BACKBONE_IDS;

    fn ids(addons: &[AddonDescriptor]) -> Vec<&str> {
        addons.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_empty_set_yields_bare_backbone() {
        let mut addons = Vec::new();
        apply_configuration(&ParameterSet::new(), &mut addons);

        assert_eq!(addons.len(), BACKBONE_IDS.len());
        for addon in &addons {
            assert!(BACKBONE_IDS.contains(&addon.id.as_str()));
            assert!(addon.parameters.is_empty());
        }
    }

    #[test]
    fn test_backbone_submission_order_is_fixed() {
        let mut addons = Vec::new();
        apply_configuration(&ParameterSet::new(), &mut addons);

        assert_eq!(
            ids(&addons),
            vec![
                ENDPOINTS_REGISTRY_ID,
                ADDRESS_SPACE_ID,
                ASYNC_RUNTIME_ID,
                SUBSCRIPTION_SERVICE_ID,
                SERVICES_REGISTRY_ID,
                STANDARD_NAMESPACE_ID,
                SERVER_OBJECT_ID,
            ]
        );
    }

    #[test]
    fn test_transport_group_appends_transport() {
        let mut parameters = ParameterSet::new();
        parameters.add_group(ParameterGroup::new(ASYNC_TRANSPORT_ID));

        let mut addons = Vec::new();
        apply_configuration(&parameters, &mut addons);

        let transport_ids: Vec<&str> = ids(&addons)
            .into_iter()
            .filter(|id| *id == ASYNC_TRANSPORT_ID || *id == BINARY_PROTOCOL_ID)
            .collect();
        assert_eq!(transport_ids, vec![ASYNC_TRANSPORT_ID]);
        assert_eq!(addons.len(), BACKBONE_IDS.len() + 1);
    }

    #[test]
    fn test_merge_replaces_group_wholesale() {
        let mut defaults_group = ParameterGroup::new(ASYNC_RUNTIME_ID);
        defaults_group.add_parameter("threads", "8");
        let mut parameters = ParameterSet::new();
        parameters.add_group(defaults_group);

        let mut addons = Vec::new();
        apply_configuration(&parameters, &mut addons);

        let runtime = addons.iter().find(|a| a.id == ASYNC_RUNTIME_ID).unwrap();
        assert_eq!(runtime.parameters.param("threads"), Some("8"));
        // Edges are untouched by merging.
        assert!(runtime.dependencies.is_empty());
        let subscription = addons
            .iter()
            .find(|a| a.id == SUBSCRIPTION_SERVICE_ID)
            .unwrap();
        assert_eq!(
            subscription.dependencies,
            vec![ASYNC_RUNTIME_ID, ADDRESS_SPACE_ID, SERVICES_REGISTRY_ID]
        );
    }

    #[test]
    fn test_last_duplicate_group_wins() {
        let mut first = ParameterGroup::new(ASYNC_RUNTIME_ID);
        first.add_parameter("threads", "2");
        let mut second = ParameterGroup::new(ASYNC_RUNTIME_ID);
        second.add_parameter("threads", "6");

        let mut parameters = ParameterSet::new();
        parameters.add_group(first);
        parameters.add_group(second);

        let mut addons = Vec::new();
        apply_configuration(&parameters, &mut addons);
        let runtime = addons.iter().find(|a| a.id == ASYNC_RUNTIME_ID).unwrap();
        assert_eq!(runtime.parameters.param("threads"), Some("6"));
    }

    #[test]
    fn test_unknown_groups_are_ignored() {
        let mut parameters = ParameterSet::new();
        parameters.add_group(ParameterGroup::new("somebody-else"));

        let mut addons = Vec::new();
        apply_configuration(&parameters, &mut addons);
        assert_eq!(addons.len(), BACKBONE_IDS.len());
    }

    #[test]
    fn test_options_reject_zero_threads() {
        let options = ServerOptions {
            threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            options_parameters(&options),
            Err(AddonError::InvalidParameter { .. })
        ));
    }
}

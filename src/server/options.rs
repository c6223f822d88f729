//! Typed server options and the endpoint parameter codec
//!
//! The minimal, code-constructed way to configure a server: a debug
//! flag, a worker-thread count, and one listening endpoint with its
//! application description. Also provides the codec that carries
//! application/endpoint data inside a transport's parameter group as
//! nested groups, in both directions.

use serde::{Deserialize, Serialize};

use crate::addon::params::ParameterGroup;

/// Describes the application a transport exposes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescription {
    /// Human-readable application name
    pub name: String,
    /// Application URI
    pub uri: String,
    /// Product URI
    pub product_uri: String,
}

/// One listening endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescription {
    /// Endpoint URL, e.g. `field.tcp://0.0.0.0:4870`
    pub url: String,
}

/// An application together with the endpoints it listens on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub application: ApplicationDescription,
    pub endpoints: Vec<EndpointDescription>,
}

/// The typed options record for code-constructed configuration
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Verbose addon logging
    pub debug: bool,
    /// Worker threads for the async runtime; must be positive
    pub threads: usize,
    /// The single listening endpoint
    pub endpoint: EndpointDescription,
    /// Application exposed at that endpoint
    pub application: ApplicationDescription,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            debug: false,
            threads: 2,
            endpoint: EndpointDescription::default(),
            application: ApplicationDescription::default(),
        }
    }
}

/// Encode application data as nested parameter groups
///
/// One `application` group per application, each carrying the
/// description parameters plus one nested `endpoint` group per
/// listening endpoint. The debug flag rides along so a transport can
/// pick it up without consulting its top-level parameters.
pub fn application_parameters(
    applications: &[ApplicationData],
    debug: bool,
) -> Vec<ParameterGroup> {
    applications
        .iter()
        .map(|data| {
            let mut group = ParameterGroup::new("application");
            group.add_parameter("application-name", &data.application.name);
            group.add_parameter("application-uri", &data.application.uri);
            group.add_parameter("product-uri", &data.application.product_uri);
            group.add_parameter("debug", if debug { "true" } else { "false" });
            for endpoint in &data.endpoints {
                let mut ep = ParameterGroup::new("endpoint");
                ep.add_parameter("url", &endpoint.url);
                group.groups.push(ep);
            }
            group
        })
        .collect()
}

/// Decode application data from a transport's parameter group
///
/// The reverse of [`application_parameters`]; groups other than
/// `application`, and parameters other than the known ones, are
/// ignored. Missing parameters decode as empty strings.
pub fn applications_from_group(group: &ParameterGroup) -> Vec<ApplicationData> {
    group
        .subgroups("application")
        .map(|app| {
            let application = ApplicationDescription {
                name: app.param("application-name").unwrap_or_default().to_string(),
                uri: app.param("application-uri").unwrap_or_default().to_string(),
                product_uri: app.param("product-uri").unwrap_or_default().to_string(),
            };
            let endpoints = app
                .subgroups("endpoint")
                .map(|ep| EndpointDescription {
                    url: ep.param("url").unwrap_or_default().to_string(),
                })
                .collect();
            ApplicationData {
                application,
                endpoints,
            }
        })
        .collect()
}

//! Resolve resource names to typed clients
//!
//! `ip_block` resolves to `IpBlockClient` by camelizing the name and
//! appending `Client`, then looking the result up in a fixed registry of
//! constructors. Every resolution builds a fresh transport (and auth client,
//! when auth settings are present); nothing is cached between calls.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::auth::AuthorizationClient;
use crate::client_trait::ResourceClient;
use crate::clients::{
    AllocatedIpClient, AllowedIpClient, InterfaceClient, IpAddressClient, IpBlockClient, IpRouteClient,
    MacAddressRangeClient, PolicyClient, SubnetClient, UnusableIpOctetClient, UnusableIpRangeClient,
};
use crate::common::camelize;
use crate::error::MelangeError;
use crate::resource::ClientContext;
use crate::transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};

/// Default Melange server port
pub const DEFAULT_PORT: u16 = 9898;

type Constructor = fn(&ClientContext) -> Box<dyn ResourceClient>;

fn construct<C: ResourceClient + 'static>(context: &ClientContext) -> Box<dyn ResourceClient> {
    Box::new(C::from_context(context))
}

/// Resource name, client class name and constructor of every typed client
const REGISTRY: &[(&str, &str, Constructor)] = &[
    ("allocated_ip", "AllocatedIpClient", construct::<AllocatedIpClient>),
    ("allowed_ip", "AllowedIpClient", construct::<AllowedIpClient>),
    ("interface", "InterfaceClient", construct::<InterfaceClient>),
    ("ip_address", "IpAddressClient", construct::<IpAddressClient>),
    ("ip_block", "IpBlockClient", construct::<IpBlockClient>),
    ("ip_route", "IpRouteClient", construct::<IpRouteClient>),
    ("mac_address_range", "MacAddressRangeClient", construct::<MacAddressRangeClient>),
    ("policy", "PolicyClient", construct::<PolicyClient>),
    ("subnet", "SubnetClient", construct::<SubnetClient>),
    ("unusable_ip_octet", "UnusableIpOctetClient", construct::<UnusableIpOctetClient>),
    ("unusable_ip_range", "UnusableIpRangeClient", construct::<UnusableIpRangeClient>),
];

/// Connection and auth settings for a [`ClientFactory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Melange server host
    pub host: String,
    /// Melange server port
    pub port: u16,
    /// Use `https`
    pub use_ssl: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Identity service root
    pub auth_url: Option<String>,
    /// Identity service user
    pub username: Option<String>,
    /// Identity service password / API key
    pub api_key: Option<String>,
    /// Static token; skips the identity service
    pub auth_token: Option<String>,
    /// Tenant every path is scoped to
    pub tenant_id: Option<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            use_ssl: false,
            timeout: DEFAULT_TIMEOUT,
            auth_url: None,
            username: None,
            api_key: None,
            auth_token: None,
            tenant_id: None,
        }
    }
}

/// Builds typed clients by resource name
pub struct ClientFactory {
    config: FactoryConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientFactory {
    /// Create a factory that talks HTTP to the configured server
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Create a factory whose clients all share `transport`
    pub fn with_transport(config: FactoryConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport: Some(transport),
        }
    }

    /// The factory's settings
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Every resource name the factory resolves, sorted
    pub fn resource_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(name, _, _)| *name)
    }

    /// Resolve a resource name to a typed client
    ///
    /// # Returns
    /// * `Ok(client)` - A newly built client
    /// * `Err(MelangeError::UnknownCapability)` - No client is registered under that name
    pub fn resolve(&self, name: &str) -> Result<Box<dyn ResourceClient>, MelangeError> {
        let class_name = format!("{}Client", camelize(name));
        let (_, _, construct) = REGISTRY
            .iter()
            .find(|(_, class, _)| *class == class_name)
            .ok_or_else(|| MelangeError::UnknownCapability {
                owner: "Factory".to_string(),
                name: name.to_string(),
            })?;

        debug!("resolved {} to {}", name, class_name);
        Ok(construct(&self.context()?))
    }

    fn context(&self) -> Result<ClientContext, MelangeError> {
        Ok(ClientContext::new(
            self.transport()?,
            self.auth_client()?,
            self.config.tenant_id.clone(),
        ))
    }

    fn transport(&self) -> Result<Arc<dyn Transport>, MelangeError> {
        if let Some(transport) = &self.transport {
            return Ok(Arc::clone(transport));
        }

        let transport = HttpTransport::new(
            &self.config.host,
            self.config.port,
            self.config.use_ssl,
            self.config.timeout,
        )?;
        Ok(Arc::new(transport))
    }

    fn auth_client(&self) -> Result<Option<Arc<AuthorizationClient>>, MelangeError> {
        if self.config.auth_url.is_none() && self.config.auth_token.is_none() {
            return Ok(None);
        }

        let client = AuthorizationClient::new(
            self.config.auth_url.as_deref(),
            self.config.username.clone(),
            self.config.api_key.clone(),
            self.config.auth_token.clone(),
            self.config.timeout,
        )?;
        Ok(Some(Arc::new(client)))
    }
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("tenant_id", &self.config.tenant_id)
            .finish_non_exhaustive()
    }
}

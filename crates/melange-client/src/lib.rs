//! Melange IPAM REST API Client
//!
//! A Rust client library for the Melange IP address management service.
//! Provides typed clients for IP blocks, subnets, policies, IP addresses,
//! routes, interfaces and MAC address ranges, plus name-based dispatch for
//! command-line front ends.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use melange_client::{ClientContext, ClientFactory, FactoryConfig, HttpTransport, IpBlockClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Resolve a client by resource name
//! let factory = ClientFactory::new(FactoryConfig {
//!     host: "melange".to_string(),
//!     tenant_id: Some("tenant-1".to_string()),
//!     ..FactoryConfig::default()
//! });
//! let client = factory.resolve("ip_block")?;
//! println!("{:?}", client.operations());
//!
//! // Or build a typed client directly
//! let transport = HttpTransport::new("melange", 9898, false, Duration::from_secs(30))?;
//! let context = ClientContext::new(Arc::new(transport), None, Some("tenant-1".to_string()));
//! let blocks = IpBlockClient::new(&context);
//! let block = blocks.create("private", "10.1.1.0/29", None, None).await?;
//! let all = blocks.list().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Tenant scoping**: paths are prefixed with `tenants/{id}` when a tenant is set
//! - **Keystone-style auth**: static tokens or password-credential exchange
//! - **Introspection**: every operation carries a descriptor used for CLI help and validation
//! - **`test-util`**: exposes [`MockTransport`] for downstream tests

pub mod auth;
pub mod clients;
pub mod common;
pub mod error;
pub mod factory;
pub mod inspector;
pub mod resource;
pub mod transport;
#[path = "trait.rs"]
pub mod client_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use auth::AuthorizationClient;
pub use client_trait::ResourceClient;
pub use clients::{
    AllocatedIpClient, AllowedIpClient, InterfaceClient, IpAddressClient, IpBlockClient, IpRouteClient,
    MacAddressRangeClient, PolicyClient, SubnetClient, UnusableIpOctetClient, UnusableIpRangeClient,
};
pub use common::{Fields, camelize, remove_nones};
pub use error::MelangeError;
pub use factory::{ClientFactory, FactoryConfig};
pub use inspector::{Arguments, CapabilityRegistry, MethodSignature, OperationSpec, ParamSpec};
pub use resource::{ClientContext, Resource, ResourceSpec};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;

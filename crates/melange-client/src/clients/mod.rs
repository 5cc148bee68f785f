//! Typed clients, one module per resource family
//!
//! Each client fixes the path template and envelope keys of its resource
//! and exposes the operations with named parameters. Clients for nested
//! resources bind a fresh [`Resource`](crate::resource::Resource) per call,
//! since the path depends on the parent id.

pub mod interface;
pub mod ip_address;
pub mod ip_block;
pub mod ip_route;
pub mod mac_address_range;
pub mod policy;
pub mod subnet;

pub use interface::{AllowedIpClient, InterfaceClient};
pub use ip_address::{AllocatedIpClient, IpAddressClient};
pub use ip_block::IpBlockClient;
pub use ip_route::IpRouteClient;
pub use mac_address_range::MacAddressRangeClient;
pub use policy::{PolicyClient, UnusableIpOctetClient, UnusableIpRangeClient};
pub use subnet::SubnetClient;

use serde_json::Value;

use crate::error::MelangeError;

/// Wrap a listing so it travels through [`ResourceClient::invoke`](crate::ResourceClient::invoke)
pub(crate) fn listed(items: Vec<Value>) -> Option<Value> {
    Some(Value::Array(items))
}

pub(crate) fn unknown_operation(owner: &str, operation: &str) -> MelangeError {
    MelangeError::UnknownCapability {
        owner: owner.to_string(),
        name: operation.to_string(),
    }
}

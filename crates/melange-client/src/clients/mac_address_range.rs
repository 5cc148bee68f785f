//! MAC address ranges

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// `mac_address_ranges` collection
pub const MAC_ADDRESS_RANGES: ResourceSpec =
    ResourceSpec::new("mac_address_ranges", "mac_address_range", "mac_address_ranges");

const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new("create", &[ParamSpec::required("cidr")]),
    OperationSpec::new("show", &[ParamSpec::required("id")]),
    OperationSpec::new("list", &[]),
    OperationSpec::new("delete", &[ParamSpec::required("id")]),
];

/// Client for MAC address ranges
#[derive(Debug, Clone)]
pub struct MacAddressRangeClient {
    resource: Resource,
}

impl MacAddressRangeClient {
    /// MAC ranges are global
    pub const TENANT_ID_REQUIRED: bool = false;

    /// Create a new MAC address range client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            resource: MAC_ADDRESS_RANGES.bind(context, &[]),
        }
    }

    /// Create a range (e.g. `BC:76:4E:20:00:00/27`)
    pub async fn create(&self, cidr: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.create(fields([("cidr", json!(cidr))])).await
    }

    /// Show a range
    pub async fn show(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.find(id).await
    }

    /// List ranges
    pub async fn list(&self) -> Result<Vec<Value>, MelangeError> {
        self.resource.all(Fields::new()).await
    }

    /// Delete a range
    pub async fn delete(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for MacAddressRangeClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "MacAddressRangeClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &MAC_ADDRESS_RANGES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => self.create(args.required("cidr")?).await,
            "show" => self.show(args.required("id")?).await,
            "list" => self.list().await.map(listed),
            "delete" => self.delete(args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tenant_is_still_applied_when_supplied() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(200, json!({"mac_address_ranges": []}));
        let client = MacAddressRangeClient::new(&ClientContext::new(Arc::<MockTransport>::clone(&mock), None, Some("t1".to_string())));

        let ranges = client.list().await.expect("list succeeds");

        assert!(ranges.is_empty());
        let request = mock.last_request().expect("request recorded");
        assert_eq!(request.path, "/v0.1/ipam/tenants/t1/mac_address_ranges");
    }

    #[tokio::test]
    async fn test_create_range() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(201, json!({"mac_address_range": {"id": "m1", "cidr": "BC:76:4E:20:00:00/27"}}));
        let client = MacAddressRangeClient::new(&ClientContext::new(Arc::<MockTransport>::clone(&mock), None, None));

        let range = client.create("BC:76:4E:20:00:00/27").await.expect("create succeeds");

        assert_eq!(range, Some(json!({"id": "m1", "cidr": "BC:76:4E:20:00:00/27"})));
        assert_eq!(mock.last_request().map(|r| r.path).as_deref(), Some("/v0.1/ipam/mac_address_ranges"));
    }
}

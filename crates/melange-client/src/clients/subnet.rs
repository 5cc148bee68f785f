//! Subnets carved out of a parent IP block

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// Subnets of the block `{parent_id}`
pub const SUBNETS: ResourceSpec = ResourceSpec::new("ip_blocks/{parent_id}/subnets", "subnet", "subnets");

const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("parent_id"),
            ParamSpec::required("cidr"),
            ParamSpec::optional("network_id"),
        ],
    ),
    OperationSpec::new("list", &[ParamSpec::required("parent_id")]),
];

/// Client for subnets
#[derive(Debug, Clone)]
pub struct SubnetClient {
    context: ClientContext,
}

impl SubnetClient {
    /// Whether subnets are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new subnet client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, parent_id: &str) -> Resource {
        SUBNETS.bind(&self.context, &[("parent_id", parent_id)])
    }

    /// Create a subnet under `parent_id`
    pub async fn create(
        &self,
        parent_id: &str,
        cidr: &str,
        network_id: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource(parent_id)
            .create(fields([("cidr", json!(cidr)), ("network_id", json!(network_id))]))
            .await
    }

    /// List the subnets of `parent_id`
    pub async fn list(&self, parent_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(parent_id).all(Fields::new()).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for SubnetClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "SubnetClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &SUBNETS
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(args.required("parent_id")?, args.required("cidr")?, args.get("network_id"))
                    .await
            }
            "list" => self.list(args.required("parent_id")?).await.map(listed),
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
    async fn test_paths_nest_under_parent_after_tenant() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(201, json!({"subnet": {"id": "s1", "cidr": "10.0.0.0/30"}}));
        mock.respond(200, json!({"subnets": []}));
        let client = SubnetClient::new(&ClientContext::new(Arc::<MockTransport>::clone(&mock), None, Some("t1".to_string())));

        client.create("b1", "10.0.0.0/30", None).await.expect("create succeeds");
        client.list("b2").await.expect("list succeeds");

        let paths: Vec<String> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/v0.1/ipam/tenants/t1/ip_blocks/b1/subnets",
                "/v0.1/ipam/tenants/t1/ip_blocks/b2/subnets",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_strips_network_id() {
        let mock = Arc::new(MockTransport::new());
        let client = SubnetClient::new(&ClientContext::new(Arc::<MockTransport>::clone(&mock), None, None));

        client.create("b1", "10.0.0.0/30", None).await.expect("create succeeds");

        assert_eq!(mock.last_json_body(), Some(json!({"subnet": {"cidr": "10.0.0.0/30"}})));
    }
}

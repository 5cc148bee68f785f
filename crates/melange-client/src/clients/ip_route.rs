//! Static routes attached to an IP block

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// Routes of the block `{ip_block_id}`
pub const IP_ROUTES: ResourceSpec = ResourceSpec::new("ip_blocks/{ip_block_id}/ip_routes", "ip_route", "ip_routes");

const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("ip_block_id"),
            ParamSpec::required("destination"),
            ParamSpec::required("gateway"),
            ParamSpec::optional("netmask"),
        ],
    ),
    OperationSpec::new("list", &[ParamSpec::required("ip_block_id")]),
    OperationSpec::new("show", &[ParamSpec::required("ip_block_id"), ParamSpec::required("id")]),
    OperationSpec::new("delete", &[ParamSpec::required("ip_block_id"), ParamSpec::required("id")]),
];

/// Client for IP routes
#[derive(Debug, Clone)]
pub struct IpRouteClient {
    context: ClientContext,
}

impl IpRouteClient {
    /// Whether routes are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new IP route client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, ip_block_id: &str) -> Resource {
        IP_ROUTES.bind(&self.context, &[("ip_block_id", ip_block_id)])
    }

    /// Add a route to a block
    pub async fn create(
        &self,
        ip_block_id: &str,
        destination: &str,
        gateway: &str,
        netmask: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id)
            .create(fields([
                ("destination", json!(destination)),
                ("gateway", json!(gateway)),
                ("netmask", json!(netmask)),
            ]))
            .await
    }

    /// List the routes of a block
    pub async fn list(&self, ip_block_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(ip_block_id).all(Fields::new()).await
    }

    /// Show a route
    pub async fn show(&self, ip_block_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id).find(id).await
    }

    /// Delete a route
    pub async fn delete(&self, ip_block_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id).delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for IpRouteClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "IpRouteClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &IP_ROUTES
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
                self.create(
                    args.required("ip_block_id")?,
                    args.required("destination")?,
                    args.required("gateway")?,
                    args.get("netmask"),
                )
                .await
            }
            "list" => self.list(args.required("ip_block_id")?).await.map(listed),
            "show" => self.show(args.required("ip_block_id")?, args.required("id")?).await,
            "delete" => self.delete(args.required("ip_block_id")?, args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

//! IP block operations

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// `ip_blocks` collection
pub const IP_BLOCKS: ResourceSpec = ResourceSpec::new("ip_blocks", "ip_block", "ip_blocks");

const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("type"),
            ParamSpec::required("cidr"),
            ParamSpec::optional("network_id"),
            ParamSpec::optional("policy_id"),
        ],
    ),
    OperationSpec::new("list", &[]),
    OperationSpec::new("show", &[ParamSpec::required("id")]),
    OperationSpec::new(
        "update",
        &[
            ParamSpec::required("id"),
            ParamSpec::optional("network_id"),
            ParamSpec::optional("policy_id"),
        ],
    ),
    OperationSpec::new("delete", &[ParamSpec::required("id")]),
];

/// Client for IP blocks
#[derive(Debug, Clone)]
pub struct IpBlockClient {
    resource: Resource,
}

impl IpBlockClient {
    /// Whether IP blocks are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new IP block client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            resource: IP_BLOCKS.bind(context, &[]),
        }
    }

    /// Create an IP block
    ///
    /// # Arguments
    /// * `block_type` - `private` or `public`
    /// * `cidr` - Block range (e.g. `10.1.1.0/29`)
    /// * `network_id` - Network the block serves
    /// * `policy_id` - Policy restricting allocation
    pub async fn create(
        &self,
        block_type: &str,
        cidr: &str,
        network_id: Option<&str>,
        policy_id: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource
            .create(fields([
                ("type", json!(block_type)),
                ("cidr", json!(cidr)),
                ("network_id", json!(network_id)),
                ("policy_id", json!(policy_id)),
            ]))
            .await
    }

    /// List IP blocks
    pub async fn list(&self) -> Result<Vec<Value>, MelangeError> {
        self.resource.all(Fields::new()).await
    }

    /// Show an IP block
    pub async fn show(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.find(id).await
    }

    /// Update an IP block; omitted fields are left untouched
    pub async fn update(
        &self,
        id: &str,
        network_id: Option<&str>,
        policy_id: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource
            .update(
                id,
                fields([("network_id", json!(network_id)), ("policy_id", json!(policy_id))]),
            )
            .await
    }

    /// Delete an IP block
    pub async fn delete(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for IpBlockClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "IpBlockClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &IP_BLOCKS
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
                    args.required("type")?,
                    args.required("cidr")?,
                    args.get("network_id"),
                    args.get("policy_id"),
                )
                .await
            }
            "list" => self.list().await.map(listed),
            "show" => self.show(args.required("id")?).await,
            "update" => {
                self.update(args.required("id")?, args.get("network_id"), args.get("policy_id"))
                    .await
            }
            "delete" => self.delete(args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

//! IP addresses allocated from a block, and the cross-block allocation view

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// Addresses allocated from the block `{ip_block_id}`
pub const IP_ADDRESSES: ResourceSpec =
    ResourceSpec::new("ip_blocks/{ip_block_id}/ip_addresses", "ip_address", "ip_addresses");

/// Read-only view over every allocated address
pub const ALLOCATED_IP_ADDRESSES: ResourceSpec =
    ResourceSpec::new("allocated_ip_addresses", "allocated_ip_addresses", "ip_addresses");

const IP_ADDRESS_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("ip_block_id"),
            ParamSpec::optional("address"),
            ParamSpec::optional("interface_id"),
            ParamSpec::optional("used_by_tenant"),
            ParamSpec::optional("used_by_device"),
        ],
    ),
    OperationSpec::new("list", &[ParamSpec::required("ip_block_id")]),
    OperationSpec::new("show", &[ParamSpec::required("ip_block_id"), ParamSpec::required("address")]),
    OperationSpec::new("delete", &[ParamSpec::required("ip_block_id"), ParamSpec::required("address")]),
];

const ALLOCATED_IP_OPERATIONS: &[OperationSpec] = &[OperationSpec::new(
    "list",
    &[ParamSpec::optional("used_by_device"), ParamSpec::optional("used_by_tenant")],
)];

/// Client for IP addresses; the address itself is the member id
#[derive(Debug, Clone)]
pub struct IpAddressClient {
    context: ClientContext,
}

impl IpAddressClient {
    /// Whether IP addresses are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new IP address client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, ip_block_id: &str) -> Resource {
        IP_ADDRESSES.bind(&self.context, &[("ip_block_id", ip_block_id)])
    }

    /// Allocate an address from a block
    ///
    /// # Arguments
    /// * `ip_block_id` - Block to allocate from
    /// * `address` - Specific address to take; the service picks one when omitted
    /// * `interface_id` - Interface the address is bound to
    /// * `used_by_tenant` - Tenant using the address (sent as `tenant_id`)
    /// * `used_by_device` - Device using the address
    pub async fn create(
        &self,
        ip_block_id: &str,
        address: Option<&str>,
        interface_id: Option<&str>,
        used_by_tenant: Option<&str>,
        used_by_device: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id)
            .create(fields([
                ("address", json!(address)),
                ("interface_id", json!(interface_id)),
                ("used_by_device", json!(used_by_device)),
                ("tenant_id", json!(used_by_tenant)),
            ]))
            .await
    }

    /// List the addresses allocated from a block
    pub async fn list(&self, ip_block_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(ip_block_id).all(Fields::new()).await
    }

    /// Show an allocated address
    pub async fn show(&self, ip_block_id: &str, address: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id).find(address).await
    }

    /// Release an allocated address
    pub async fn delete(&self, ip_block_id: &str, address: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(ip_block_id).delete(address).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for IpAddressClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "IpAddressClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &IP_ADDRESSES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        IP_ADDRESS_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(
                    args.required("ip_block_id")?,
                    args.get("address"),
                    args.get("interface_id"),
                    args.get("used_by_tenant"),
                    args.get("used_by_device"),
                )
                .await
            }
            "list" => self.list(args.required("ip_block_id")?).await.map(listed),
            "show" => {
                self.show(args.required("ip_block_id")?, args.required("address")?)
                    .await
            }
            "delete" => {
                self.delete(args.required("ip_block_id")?, args.required("address")?)
                    .await
            }
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

/// Client for the allocated-address view, filterable by device and tenant
#[derive(Debug, Clone)]
pub struct AllocatedIpClient {
    resource: Resource,
}

impl AllocatedIpClient {
    /// The allocation view spans tenants
    pub const TENANT_ID_REQUIRED: bool = false;

    /// Create a new allocated IP client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            resource: ALLOCATED_IP_ADDRESSES.bind(context, &[]),
        }
    }

    /// List allocated addresses, optionally filtered
    pub async fn list(
        &self,
        used_by_device: Option<&str>,
        used_by_tenant: Option<&str>,
    ) -> Result<Vec<Value>, MelangeError> {
        self.resource
            .all(fields([
                ("used_by_device", json!(used_by_device)),
                ("used_by_tenant", json!(used_by_tenant)),
            ]))
            .await
    }
}

#[async_trait::async_trait]
impl ResourceClient for AllocatedIpClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "AllocatedIpClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &ALLOCATED_IP_ADDRESSES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        ALLOCATED_IP_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "list" => {
                self.list(args.get("used_by_device"), args.get("used_by_tenant"))
                    .await
                    .map(listed)
            }
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

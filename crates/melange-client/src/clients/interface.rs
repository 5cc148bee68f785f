//! Virtual interfaces and the extra addresses they are allowed to use

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// `interfaces` collection
pub const INTERFACES: ResourceSpec = ResourceSpec::new("interfaces", "interface", "interfaces");

/// Allowed addresses of the interface `{interface_id}`
///
/// Requests are wrapped in `allowed_ip`; the service answers with the
/// underlying `ip_address`.
pub const ALLOWED_IPS: ResourceSpec =
    ResourceSpec::new("interfaces/{interface_id}/allowed_ips", "allowed_ip", "ip_addresses")
        .with_response("ip_address");

const INTERFACE_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("vif_id"),
            ParamSpec::required("tenant_id"),
            ParamSpec::optional("device_id"),
            ParamSpec::optional("network_id"),
        ],
    ),
    OperationSpec::new("show", &[ParamSpec::required("vif_id")]),
    OperationSpec::new("delete", &[ParamSpec::required("vif_id")]),
];

const ALLOWED_IP_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("interface_id"),
            ParamSpec::required("network_id"),
            ParamSpec::required("ip_address"),
        ],
    ),
    OperationSpec::new(
        "show",
        &[ParamSpec::required("interface_id"), ParamSpec::required("ip_address")],
    ),
    OperationSpec::new("list", &[ParamSpec::required("interface_id")]),
    OperationSpec::new(
        "delete",
        &[ParamSpec::required("interface_id"), ParamSpec::required("ip_address")],
    ),
];

/// Client for interfaces, identified by their vif id
#[derive(Debug, Clone)]
pub struct InterfaceClient {
    resource: Resource,
}

impl InterfaceClient {
    /// Interfaces are not partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = false;

    /// Create a new interface client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            resource: INTERFACES.bind(context, &[]),
        }
    }

    /// Register an interface
    ///
    /// # Arguments
    /// * `vif_id` - Virtual interface id (sent as `id`)
    /// * `tenant_id` - Owning tenant
    /// * `device_id` - Device the interface is plugged into
    /// * `network_id` - Network to attach; sent as `{"network": {"id": ..}}`
    pub async fn create(
        &self,
        vif_id: &str,
        tenant_id: &str,
        device_id: Option<&str>,
        network_id: Option<&str>,
    ) -> Result<Option<Value>, MelangeError> {
        let mut request = fields([
            ("id", json!(vif_id)),
            ("tenant_id", json!(tenant_id)),
            ("device_id", json!(device_id)),
        ]);
        if let Some(network_id) = network_id.filter(|id| !id.is_empty()) {
            request.insert("network".to_string(), json!({"id": network_id}));
        }

        self.resource.create(request).await
    }

    /// Show an interface
    pub async fn show(&self, vif_id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.find(vif_id).await
    }

    /// Delete an interface
    pub async fn delete(&self, vif_id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.delete(vif_id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for InterfaceClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "InterfaceClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &INTERFACES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        INTERFACE_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(
                    args.required("vif_id")?,
                    args.required("tenant_id")?,
                    args.get("device_id"),
                    args.get("network_id"),
                )
                .await
            }
            "show" => self.show(args.required("vif_id")?).await,
            "delete" => self.delete(args.required("vif_id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

/// Client for addresses an interface may use beyond its own allocations
#[derive(Debug, Clone)]
pub struct AllowedIpClient {
    context: ClientContext,
}

impl AllowedIpClient {
    /// Whether allowed IPs are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new allowed IP client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, interface_id: &str) -> Resource {
        ALLOWED_IPS.bind(&self.context, &[("interface_id", interface_id)])
    }

    /// Allow an interface to use `ip_address` from `network_id`
    pub async fn create(
        &self,
        interface_id: &str,
        network_id: &str,
        ip_address: &str,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource(interface_id)
            .create(fields([
                ("network_id", json!(network_id)),
                ("ip_address", json!(ip_address)),
            ]))
            .await
    }

    /// Show an allowed address
    pub async fn show(&self, interface_id: &str, ip_address: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(interface_id).find(ip_address).await
    }

    /// List the allowed addresses of an interface
    pub async fn list(&self, interface_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(interface_id).all(Fields::new()).await
    }

    /// Revoke an allowed address
    pub async fn delete(&self, interface_id: &str, ip_address: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(interface_id).delete(ip_address).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for AllowedIpClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "AllowedIpClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &ALLOWED_IPS
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        ALLOWED_IP_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(
                    args.required("interface_id")?,
                    args.required("network_id")?,
                    args.required("ip_address")?,
                )
                .await
            }
            "show" => {
                self.show(args.required("interface_id")?, args.required("ip_address")?)
                    .await
            }
            "list" => self.list(args.required("interface_id")?).await.map(listed),
            "delete" => {
                self.delete(args.required("interface_id")?, args.required("ip_address")?)
                    .await
            }
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

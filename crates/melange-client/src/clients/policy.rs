//! Policies and the unusable ranges/octets they carry

use serde_json::{Value, json};

use crate::client_trait::ResourceClient;
use crate::clients::{listed, unknown_operation};
use crate::common::{Fields, fields};
use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec, ParamSpec};
use crate::resource::{ClientContext, Resource, ResourceSpec};

/// `policies` collection
pub const POLICIES: ResourceSpec = ResourceSpec::new("policies", "policy", "policies");

/// Unusable IP ranges of the policy `{policy_id}`
pub const UNUSABLE_IP_RANGES: ResourceSpec =
    ResourceSpec::new("policies/{policy_id}/unusable_ip_ranges", "ip_range", "ip_ranges");

/// Unusable IP octets of the policy `{policy_id}`
pub const UNUSABLE_IP_OCTETS: ResourceSpec =
    ResourceSpec::new("policies/{policy_id}/unusable_ip_octets", "ip_octet", "ip_octets");

const POLICY_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new("create", &[ParamSpec::required("name"), ParamSpec::optional("desc")]),
    OperationSpec::new(
        "update",
        &[
            ParamSpec::required("id"),
            ParamSpec::required("name"),
            ParamSpec::optional("desc"),
        ],
    ),
    OperationSpec::new("list", &[]),
    OperationSpec::new("show", &[ParamSpec::required("id")]),
    OperationSpec::new("delete", &[ParamSpec::required("id")]),
];

const RANGE_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new(
        "create",
        &[
            ParamSpec::required("policy_id"),
            ParamSpec::required("offset"),
            ParamSpec::required("length"),
        ],
    ),
    OperationSpec::new(
        "update",
        &[
            ParamSpec::required("policy_id"),
            ParamSpec::required("id"),
            ParamSpec::optional("offset"),
            ParamSpec::optional("length"),
        ],
    ),
    OperationSpec::new("list", &[ParamSpec::required("policy_id")]),
    OperationSpec::new("show", &[ParamSpec::required("policy_id"), ParamSpec::required("id")]),
    OperationSpec::new("delete", &[ParamSpec::required("policy_id"), ParamSpec::required("id")]),
];

const OCTET_OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new("create", &[ParamSpec::required("policy_id"), ParamSpec::required("octet")]),
    OperationSpec::new(
        "update",
        &[
            ParamSpec::required("policy_id"),
            ParamSpec::required("id"),
            ParamSpec::optional("octet"),
        ],
    ),
    OperationSpec::new("list", &[ParamSpec::required("policy_id")]),
    OperationSpec::new("show", &[ParamSpec::required("policy_id"), ParamSpec::required("id")]),
    OperationSpec::new("delete", &[ParamSpec::required("policy_id"), ParamSpec::required("id")]),
];

/// Client for policies
#[derive(Debug, Clone)]
pub struct PolicyClient {
    resource: Resource,
}

impl PolicyClient {
    /// Whether policies are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new policy client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            resource: POLICIES.bind(context, &[]),
        }
    }

    /// Create a policy; `desc` is sent as `description`
    pub async fn create(&self, name: &str, desc: Option<&str>) -> Result<Option<Value>, MelangeError> {
        self.resource
            .create(fields([("name", json!(name)), ("description", json!(desc))]))
            .await
    }

    /// Update a policy
    pub async fn update(&self, id: &str, name: &str, desc: Option<&str>) -> Result<Option<Value>, MelangeError> {
        self.resource
            .update(id, fields([("name", json!(name)), ("description", json!(desc))]))
            .await
    }

    /// List policies
    pub async fn list(&self) -> Result<Vec<Value>, MelangeError> {
        self.resource.all(Fields::new()).await
    }

    /// Show a policy
    pub async fn show(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.find(id).await
    }

    /// Delete a policy
    pub async fn delete(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource.delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for PolicyClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "PolicyClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &POLICIES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        POLICY_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => self.create(args.required("name")?, args.get("desc")).await,
            "update" => {
                self.update(args.required("id")?, args.required("name")?, args.get("desc"))
                    .await
            }
            "list" => self.list().await.map(listed),
            "show" => self.show(args.required("id")?).await,
            "delete" => self.delete(args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

/// Client for IP ranges a policy excludes from allocation
#[derive(Debug, Clone)]
pub struct UnusableIpRangeClient {
    context: ClientContext,
}

impl UnusableIpRangeClient {
    /// Whether unusable ranges are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new unusable IP range client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, policy_id: &str) -> Resource {
        UNUSABLE_IP_RANGES.bind(&self.context, &[("policy_id", policy_id)])
    }

    /// Exclude `length` addresses starting `offset` addresses into each block
    pub async fn create(&self, policy_id: &str, offset: u32, length: u32) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id)
            .create(fields([("offset", json!(offset)), ("length", json!(length))]))
            .await
    }

    /// Update an unusable range
    pub async fn update(
        &self,
        policy_id: &str,
        id: &str,
        offset: Option<u32>,
        length: Option<u32>,
    ) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id)
            .update(id, fields([("offset", json!(offset)), ("length", json!(length))]))
            .await
    }

    /// List the unusable ranges of a policy
    pub async fn list(&self, policy_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(policy_id).all(Fields::new()).await
    }

    /// Show an unusable range
    pub async fn show(&self, policy_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id).find(id).await
    }

    /// Delete an unusable range
    pub async fn delete(&self, policy_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id).delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for UnusableIpRangeClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "UnusableIpRangeClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &UNUSABLE_IP_RANGES
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        RANGE_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(
                    args.required("policy_id")?,
                    args.parse_required("offset")?,
                    args.parse_required("length")?,
                )
                .await
            }
            "update" => {
                self.update(
                    args.required("policy_id")?,
                    args.required("id")?,
                    args.parse("offset")?,
                    args.parse("length")?,
                )
                .await
            }
            "list" => self.list(args.required("policy_id")?).await.map(listed),
            "show" => self.show(args.required("policy_id")?, args.required("id")?).await,
            "delete" => self.delete(args.required("policy_id")?, args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

/// Client for last-octet values a policy excludes from allocation
#[derive(Debug, Clone)]
pub struct UnusableIpOctetClient {
    context: ClientContext,
}

impl UnusableIpOctetClient {
    /// Whether unusable octets are partitioned per tenant
    pub const TENANT_ID_REQUIRED: bool = true;

    /// Create a new unusable IP octet client
    pub fn new(context: &ClientContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn resource(&self, policy_id: &str) -> Resource {
        UNUSABLE_IP_OCTETS.bind(&self.context, &[("policy_id", policy_id)])
    }

    /// Exclude an octet
    pub async fn create(&self, policy_id: &str, octet: u32) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id)
            .create(fields([("octet", json!(octet))]))
            .await
    }

    /// Update an unusable octet
    pub async fn update(&self, policy_id: &str, id: &str, octet: Option<u32>) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id)
            .update(id, fields([("octet", json!(octet))]))
            .await
    }

    /// List the unusable octets of a policy
    pub async fn list(&self, policy_id: &str) -> Result<Vec<Value>, MelangeError> {
        self.resource(policy_id).all(Fields::new()).await
    }

    /// Show an unusable octet
    pub async fn show(&self, policy_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id).find(id).await
    }

    /// Delete an unusable octet
    pub async fn delete(&self, policy_id: &str, id: &str) -> Result<Option<Value>, MelangeError> {
        self.resource(policy_id).delete(id).await
    }
}

#[async_trait::async_trait]
impl ResourceClient for UnusableIpOctetClient {
    fn from_context(context: &ClientContext) -> Self {
        Self::new(context)
    }

    fn name(&self) -> &'static str {
        "UnusableIpOctetClient"
    }

    fn spec(&self) -> &'static ResourceSpec {
        &UNUSABLE_IP_OCTETS
    }

    fn tenant_required(&self) -> bool {
        Self::TENANT_ID_REQUIRED
    }

    fn operations(&self) -> &'static [OperationSpec] {
        OCTET_OPERATIONS
    }

    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        match operation {
            "create" => {
                self.create(args.required("policy_id")?, args.parse_required("octet")?)
                    .await
            }
            "update" => {
                self.update(args.required("policy_id")?, args.required("id")?, args.parse("octet")?)
                    .await
            }
            "list" => self.list(args.required("policy_id")?).await.map(listed),
            "show" => self.show(args.required("policy_id")?, args.required("id")?).await,
            "delete" => self.delete(args.required("policy_id")?, args.required("id")?).await,
            _ => Err(unknown_operation(self.name(), operation)),
        }
    }
}

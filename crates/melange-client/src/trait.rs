//! ResourceClient trait for uniform dispatch
//!
//! Every typed client implements this trait next to its strongly typed
//! methods. The CLI (and anything else that only knows a resource by name)
//! discovers operations through [`ResourceClient::operations`] and calls them
//! through [`ResourceClient::invoke`].

use serde_json::Value;

use crate::error::MelangeError;
use crate::inspector::{Arguments, OperationSpec};
use crate::resource::{ClientContext, ResourceSpec};

/// Trait for typed Melange resource clients
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    /// Build the client from shared handles
    fn from_context(context: &ClientContext) -> Self
    where
        Self: Sized;

    /// Class-style name of the client (e.g. `IpBlockClient`)
    fn name(&self) -> &'static str;

    /// Path template and envelope keys of the primary resource
    fn spec(&self) -> &'static ResourceSpec;

    /// Whether the remote side partitions this resource per tenant
    fn tenant_required(&self) -> bool;

    /// Descriptors of every operation this client exposes
    fn operations(&self) -> &'static [OperationSpec];

    /// Invoke an operation by name with keyword arguments
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The unwrapped entity, or an array for `list`
    /// * `Ok(None)` - The service answered with an empty body
    /// * `Err(MelangeError::UnknownCapability)` - No such operation
    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Option<Value>, MelangeError>;

    /// Envelope key results of `operation` are rendered under
    fn envelope_key(&self, operation: &str) -> &'static str {
        if operation == "list" {
            self.spec().collection
        } else {
            self.spec().response
        }
    }
}

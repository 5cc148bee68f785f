//! Generic CRUD endpoint for one Melange resource type
//!
//! A [`ResourceSpec`] is the small declarative description of a resource:
//! its path template and the envelope keys of its bodies. Binding
//! it to a [`ClientContext`] and the template's parent ids yields a
//! [`Resource`], which implements create/list/show/update/delete over any
//! [`Transport`].

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthorizationClient;
use crate::common::query::resource_path;
use crate::common::{Fields, remove_nones};
use crate::error::MelangeError;
use crate::transport::{ApiRequest, Transport};

/// Header carrying the authorization token
pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

/// Shared handles every typed client is built from
#[derive(Clone)]
pub struct ClientContext {
    /// Transport used for every request
    pub transport: Arc<dyn Transport>,
    /// Token source; requests are unauthenticated when absent
    pub auth: Option<Arc<AuthorizationClient>>,
    /// Tenant the paths are scoped to
    pub tenant_id: Option<String>,
}

impl ClientContext {
    /// Create a new context
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Option<Arc<AuthorizationClient>>,
        tenant_id: Option<String>,
    ) -> Self {
        Self {
            transport,
            auth,
            tenant_id,
        }
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("auth", &self.auth)
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

/// Declarative description of a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Path below the API root; `{name}` placeholders are bound per call
    pub path_template: &'static str,
    /// Envelope key for request bodies
    pub singular: &'static str,
    /// Envelope key for single-entity responses; usually `singular`
    pub response: &'static str,
    /// Envelope key for collection responses
    pub collection: &'static str,
}

impl ResourceSpec {
    /// Describe a resource
    pub const fn new(path_template: &'static str, singular: &'static str, collection: &'static str) -> Self {
        Self {
            path_template,
            singular,
            response: singular,
            collection,
        }
    }

    /// Unwrap single-entity responses by `key` instead of the request key
    #[must_use]
    pub const fn with_response(self, key: &'static str) -> Self {
        Self { response: key, ..self }
    }

    /// Substitute `{name}` placeholders in the path template
    pub fn path(&self, bindings: &[(&str, &str)]) -> String {
        bindings
            .iter()
            .fold(self.path_template.to_string(), |path, (name, value)| {
                path.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Bind this descriptor to a context, producing a usable endpoint
    pub fn bind(&self, context: &ClientContext, bindings: &[(&str, &str)]) -> Resource {
        Resource::new(
            &self.path(bindings),
            self.singular,
            self.collection,
            Arc::clone(&context.transport),
            context.auth.clone(),
            context.tenant_id.as_deref(),
        )
        .with_response(self.response)
    }
}

/// One resource endpoint with its composed path
#[derive(Clone)]
pub struct Resource {
    path: String,
    name: String,
    response: String,
    collection: String,
    transport: Arc<dyn Transport>,
    auth: Option<Arc<AuthorizationClient>>,
}

impl Resource {
    /// Create a new endpoint
    ///
    /// # Arguments
    /// * `path` - Path below the API root (e.g. `"ip_blocks"`)
    /// * `name` - Singular envelope key (e.g. `"ip_block"`)
    /// * `collection` - Collection envelope key (e.g. `"ip_blocks"`)
    /// * `transport` - Request transport
    /// * `auth` - Optional token source
    /// * `tenant_id` - Optional tenant; prefixes the path when present
    pub fn new(
        path: &str,
        name: &str,
        collection: &str,
        transport: Arc<dyn Transport>,
        auth: Option<Arc<AuthorizationClient>>,
        tenant_id: Option<&str>,
    ) -> Self {
        Self {
            path: resource_path(path, tenant_id),
            name: name.to_string(),
            response: name.to_string(),
            collection: collection.to_string(),
            transport,
            auth,
        }
    }

    /// Unwrap single-entity responses by `key`
    #[must_use]
    pub fn with_response(mut self, key: &str) -> Self {
        self.response = key.to_string();
        self
    }

    /// The absolute collection path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request envelope key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single-entity response envelope key
    pub fn response(&self) -> &str {
        &self.response
    }

    /// The collection envelope key
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create a resource; unset fields are omitted from the payload
    pub async fn create(&self, fields: Fields) -> Result<Option<Value>, MelangeError> {
        let body = self.envelope(fields)?;
        let request = ApiRequest::new(Method::POST, self.path.clone()).body(body);
        let response = self.request(request).await?;
        unwrap_envelope(&response, &self.response)
    }

    /// Update a resource; unset fields are omitted from the payload
    pub async fn update(&self, id: &str, fields: Fields) -> Result<Option<Value>, MelangeError> {
        let body = self.envelope(fields)?;
        let request = ApiRequest::new(Method::PUT, self.member_path(id)).body(body);
        let response = self.request(request).await?;
        unwrap_envelope(&response, &self.response)
    }

    /// List resources, passing set parameters as the query string
    pub async fn all(&self, params: Fields) -> Result<Vec<Value>, MelangeError> {
        let request = ApiRequest::new(Method::GET, self.path.clone()).params(remove_nones(params));
        let response = self.request(request).await?;
        match unwrap_envelope(&response, &self.collection)? {
            Some(items) => Ok(serde_json::from_value(items)?),
            None => Ok(Vec::new()),
        }
    }

    /// Fetch a single resource
    pub async fn find(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        let request = ApiRequest::new(Method::GET, self.member_path(id));
        let response = self.request(request).await?;
        unwrap_envelope(&response, &self.response)
    }

    /// Delete a single resource
    pub async fn delete(&self, id: &str) -> Result<Option<Value>, MelangeError> {
        let request = ApiRequest::new(Method::DELETE, self.member_path(id));
        let response = self.request(request).await?;
        unwrap_envelope(&response, &self.response)
    }

    fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    fn envelope(&self, fields: Fields) -> Result<String, MelangeError> {
        let mut envelope = Fields::new();
        envelope.insert(self.name.clone(), Value::Object(remove_nones(fields)));
        Ok(serde_json::to_string(&envelope)?)
    }

    async fn request(&self, request: ApiRequest) -> Result<String, MelangeError> {
        let mut request = request.header("Content-Type", "application/json");
        if let Some(auth) = &self.auth {
            request = request.header(AUTH_TOKEN_HEADER, auth.get_token().await?);
        }

        debug!("{} {} ({})", request.method, request.path, self.name);
        let response = self.transport.do_request(request).await?;
        Ok(response.body)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("response", &self.response)
            .field("collection", &self.collection)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Decode a response body and take the value under `key`.
///
/// An empty body yields `None`; a non-empty body without `key` is an error.
pub fn unwrap_envelope(body: &str, key: &str) -> Result<Option<Value>, MelangeError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let mut decoded: Value = serde_json::from_str(body)?;
    decoded
        .get_mut(key)
        .map(Value::take)
        .map(Some)
        .ok_or_else(|| MelangeError::MissingEnvelope { key: key.to_string() })
}

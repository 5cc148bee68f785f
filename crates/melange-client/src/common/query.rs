//! Path and query-string helpers for the Melange API

use serde_json::Value;

use crate::common::{API_ROOT, Fields};

/// Compose the absolute collection path for a resource.
///
/// The tenant segment, when present, is applied before the resource path so
/// nested templates (`ip_blocks/{id}/subnets`) always live under the tenant.
pub fn resource_path(path: &str, tenant_id: Option<&str>) -> String {
    let path = path.trim_matches('/');
    match tenant_id {
        Some(tenant_id) => format!("{API_ROOT}tenants/{tenant_id}/{path}"),
        None => format!("{API_ROOT}{path}"),
    }
}

/// Build a query string from parameters, skipping unset ones.
///
/// String values are sent as-is; other scalars use their JSON rendering.
pub fn build_query_string(params: &Fields) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(&value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append a query string to a path, omitting the `?` when there is nothing to add
pub fn with_query(path: &str, params: &Fields) -> String {
    let query = build_query_string(params);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fields;
    use serde_json::json;

    #[test]
    fn test_resource_path_without_tenant() {
        assert_eq!(resource_path("ip_blocks", None), "/v0.1/ipam/ip_blocks");
    }

    #[test]
    fn test_resource_path_with_tenant_precedes_nested_segments() {
        assert_eq!(
            resource_path("ip_blocks/42/subnets", Some("123")),
            "/v0.1/ipam/tenants/123/ip_blocks/42/subnets"
        );
    }

    #[test]
    fn test_build_query_string_encodes_and_skips_unset() {
        let params = fields([
            ("used_by_device", json!("dev 1")),
            ("used_by_tenant", Value::Null),
            ("limit", json!(5)),
        ]);
        assert_eq!(build_query_string(&params), "limit=5&used_by_device=dev%201");
    }

    #[test]
    fn test_with_query_without_params() {
        assert_eq!(with_query("/v0.1/ipam/ip_blocks", &Fields::new()), "/v0.1/ipam/ip_blocks");
    }
}

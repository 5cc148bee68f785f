//! End-to-end tests for the typed clients against a wiremock server.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use melange_client::transport::DEFAULT_TIMEOUT;
use melange_client::{
    AllocatedIpClient, AuthorizationClient, ClientContext, HttpTransport, InterfaceClient, IpAddressClient,
    IpBlockClient, MelangeError, SubnetClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn context(server: &MockServer, tenant_id: Option<&str>) -> ClientContext {
    let transport = HttpTransport::new("127.0.0.1", server.address().port(), false, DEFAULT_TIMEOUT)
        .expect("transport builds");
    ClientContext::new(Arc::new(transport), None, tenant_id.map(str::to_string))
}

fn ids(items: &[Value]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect()
}

// ── IP blocks ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_ip_block_lifecycle() {
    let server = MockServer::start().await;
    let network_id = uuid::Uuid::new_v4().to_string();
    let block = json!({
        "id": "block-1",
        "type": "private",
        "cidr": "10.1.1.0/29",
        "network_id": network_id,
        "tenant_id": "123",
    });

    Mock::given(method("POST"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "ip_block": {"type": "private", "cidr": "10.1.1.0/29", "network_id": network_id}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ip_block": block})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/block-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip_block": block})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/block-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/block-1"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"NotFound": {"message": "IpBlock Not Found", "code": 404}}"#),
        )
        .mount(&server)
        .await;

    let client = IpBlockClient::new(&context(&server, Some("123")));

    let created = client
        .create("private", "10.1.1.0/29", Some(&network_id), None)
        .await
        .expect("create succeeds")
        .expect("created block returned");
    assert_eq!(created["id"], "block-1");
    assert_eq!(created["cidr"], "10.1.1.0/29");
    assert_eq!(created["network_id"], network_id.as_str());

    let shown = client.show("block-1").await.expect("show succeeds");
    assert_eq!(shown, Some(created));

    let deleted = client.delete("block-1").await.expect("delete succeeds");
    assert_eq!(deleted, None);

    let result = client.show("block-1").await;
    assert!(
        matches!(result, Err(MelangeError::ServiceResponse { status: 404, ref body }) if body.contains("IpBlock Not Found")),
        "expected ServiceResponse error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_failure_is_reported() {
    let server = MockServer::start().await;
    let port = server.address().port();
    drop(server);

    let transport = HttpTransport::new("127.0.0.1", port, false, DEFAULT_TIMEOUT).expect("transport builds");
    let client = IpBlockClient::new(&ClientContext::new(Arc::new(transport), None, None));

    let result = client.list().await;
    assert!(
        matches!(result, Err(MelangeError::Connection(_))),
        "expected Connection error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_auth_token_is_sent_with_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/ip_blocks"))
        .and(header("X-AUTH-TOKEN", "preset-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip_blocks": []})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new("127.0.0.1", server.address().port(), false, DEFAULT_TIMEOUT)
        .expect("transport builds");
    let auth = AuthorizationClient::with_token("preset-token");
    let client = IpBlockClient::new(&ClientContext::new(Arc::new(transport), Some(Arc::new(auth)), None));

    let blocks = client.list().await.expect("list succeeds");
    assert!(blocks.is_empty());
}

// ── Nested resources ────────────────────────────────────────────────

#[tokio::test]
async fn test_subnets_are_listed_per_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/parent-1/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subnets": [
                {"id": "s2", "cidr": "10.0.0.4/30"},
                {"id": "s1", "cidr": "10.0.0.0/30"},
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/parent-2/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subnets": [{"id": "s3", "cidr": "192.168.0.0/30"}]
        })))
        .mount(&server)
        .await;

    let client = SubnetClient::new(&context(&server, Some("123")));

    let subnets = client.list("parent-1").await.expect("list succeeds");
    assert_eq!(
        ids(&subnets),
        BTreeSet::from(["s1".to_string(), "s2".to_string()])
    );
}

#[tokio::test]
async fn test_ip_address_sends_tenant_id_for_used_by_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/block-1/ip_addresses"))
        .and(body_json(json!({
            "ip_address": {"interface_id": "vif-1", "tenant_id": "other-tenant"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ip_address": {"address": "10.1.1.2", "interface_id": "vif-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = IpAddressClient::new(&context(&server, Some("123")));

    let address = client
        .create("block-1", None, Some("vif-1"), Some("other-tenant"), None)
        .await
        .expect("create succeeds");
    assert_eq!(address.and_then(|a| a["address"].as_str().map(str::to_string)).as_deref(), Some("10.1.1.2"));
}

// ── Untenanted resources ────────────────────────────────────────────

#[tokio::test]
async fn test_interface_nests_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/ipam/interfaces"))
        .and(body_json(json!({
            "interface": {"id": "vif-1", "tenant_id": "t1", "network": {"id": "net-1"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "interface": {"id": "vif-1", "tenant_id": "t1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = InterfaceClient::new(&context(&server, None));

    let interface = client
        .create("vif-1", "t1", None, Some("net-1"))
        .await
        .expect("create succeeds");
    assert_eq!(interface, Some(json!({"id": "vif-1", "tenant_id": "t1"})));
}

#[tokio::test]
async fn test_allocated_ips_filter_by_device() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/allocated_ip_addresses"))
        .and(query_param("used_by_device", "dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip_addresses": [{"address": "10.1.1.2", "used_by_device": "dev-1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AllocatedIpClient::new(&context(&server, None));

    let addresses = client.list(Some("dev-1"), None).await.expect("list succeeds");
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0]["used_by_device"], "dev-1");
}

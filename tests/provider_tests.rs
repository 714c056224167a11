use gasadmin_client::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authed_client(server: &MockServer) -> AdminClient {
    let client = AdminClient::new(&server.uri());
    client
        .session
        .set_session(Session::new("test-token".into(), None));
    client
}

#[tokio::test]
async fn get_list_sends_query_and_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/branches"))
        .and(header("Authorization", "Bearer test-token"))
        .and(query_param("order_field", "name"))
        .and(query_param("order_by", "asc"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 57,
            "data": [{"id": 1, "name": "North Branch"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let params = GetListParams::new()
        .sort(Sort::asc("Name"))
        .paginate(3, 10);

    let result: ListResult<Value> = client.provider().get_list("branches", &params).await.unwrap();
    assert_eq!(result.total, 57);
    assert_eq!(result.data[0]["name"], "North Branch");
}

#[tokio::test]
async fn get_list_serializes_filter_clauses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param(
            "filters",
            r#"[{"field":"branch_id","operator":"==","value":3}]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let params = GetListParams::new().filter(Filter::new().eq("branch_id", 3));

    let result: ListResult<Value> = client.provider().get_list("products", &params).await.unwrap();
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn unbounded_get_list_omits_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 2, "data": [{}, {}]})))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let result: ListResult<Value> = client
        .provider()
        .get_list("branches", &GetListParams::new())
        .await
        .unwrap();
    assert_eq!(result.total, 2);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or("");
    assert!(!query.contains("offset"));
    assert!(!query.contains("limit"));
}

#[tokio::test]
async fn get_list_accepts_bare_array_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/machines"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        )
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let result: ListResult<Value> = client
        .provider()
        .get_list("machines", &GetListParams::new())
        .await
        .unwrap();

    // Legacy shape: total falls back to the page length.
    assert_eq!(result.total, 3);
}

#[tokio::test]
async fn get_one_hits_record_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/branches/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "East Branch"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let record: Value = client.provider().get_one("branches", 7).await.unwrap();
    assert_eq!(record["id"], 7);
}

#[tokio::test]
async fn get_one_propagates_backend_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/branches/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Branch not found"})),
        )
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client
        .provider()
        .get_one::<Value>("branches", 999)
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Branch not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn get_many_sends_ids_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("filter", r#"{"ids":[1,2]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let records: Vec<Value> = client.provider().get_many("products", &[1, 2]).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn get_many_reference_appends_target_clause() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audits"))
        .and(query_param(
            "filters",
            r#"[{"field":"status","operator":"==","value":"open"},{"field":"branch_id","operator":"==","value":3}]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let params = GetListParams::new().filter(Filter::new().eq("status", "open"));

    let _: ListResult<Value> = client
        .provider()
        .get_many_reference("audits", "branch_id", 3, &params)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_posts_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(json!({"name": "Diesel", "price": 65.5})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 12, "name": "Diesel", "price": 65.5})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let record: Value = client
        .provider()
        .create("products", &json!({"name": "Diesel", "price": 65.5}))
        .await
        .unwrap();
    assert_eq!(record["id"], 12);
}

#[tokio::test]
async fn update_patches_record_path() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/products/45"))
        .and(body_json(json!({"price": 70.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 45, "price": 70.0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let record: Value = client
        .provider()
        .update("products", 45, &json!({"price": 70.0}))
        .await
        .unwrap();
    assert_eq!(record["price"], 70.0);
}

#[tokio::test]
async fn bulk_operations_send_id_filter() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/products"))
        .and(query_param("filter", r#"{"id":[1,2]}"#))
        .and(body_json(json!({"active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/products"))
        .and(query_param("filter", r#"{"id":[3,4]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 4])))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let updated: Value = client
        .provider()
        .update_many("products", &[1, 2], &json!({"active": false}))
        .await
        .unwrap();
    assert_eq!(updated, json!([1, 2]));

    let deleted: Value = client.provider().delete_many("products", &[3, 4]).await.unwrap();
    assert_eq!(deleted, json!([3, 4]));
}

#[tokio::test]
async fn delete_hits_record_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/machines/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Machine deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let response: Value = client.provider().delete("machines", 5).await.unwrap();
    assert_eq!(response["success"], true);
}

#[tokio::test]
async fn many_to_many_list_uses_alternated_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/machines/7/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [{"id": 45, "name": "Unleaded"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let result: ListResult<Value> = client
        .provider()
        .get_many_to_many_reference_list(&["machines", "products"], &["7"])
        .await
        .unwrap();
    assert_eq!(result.total, 1);
}

#[tokio::test]
async fn many_to_many_one_fetches_full_pair_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/machines/7/products/45"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"machine_id": 7, "product_id": 45, "stock": 120})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let record: Value = client
        .provider()
        .get_many_to_many_reference_one(&["machines", "products"], &["7", "45"])
        .await
        .unwrap();
    assert_eq!(record["stock"], 120);
}

#[tokio::test]
async fn many_to_many_create_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/machines/7/products"))
        .and(body_json(json!({"product_id": 3})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"machine_id": 7, "product_id": 3})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/machines/7/products/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Association removed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);

    let created: Value = client
        .provider()
        .create_many_to_many_reference(&["machines", "products"], &["7"], &json!({"product_id": 3}))
        .await
        .unwrap();
    assert_eq!(created["product_id"], 3);

    let deleted: Value = client
        .provider()
        .delete_many_to_many_reference(&["machines", "products"], &["7", "3"])
        .await
        .unwrap();
    assert_eq!(deleted["success"], true);
}

#[tokio::test]
async fn requests_without_session_are_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/branches"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::new(&server.uri());
    let _: ListResult<Value> = client
        .provider()
        .get_list("branches", &GetListParams::new())
        .await
        .unwrap();
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use basecrawl::domain::models::table::{CellValue, FieldSpec, Row};
use basecrawl::domain::repositories::base_repository::{BaseHost, HostError};
use basecrawl::infrastructure::bitable::BitableClient;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLES: &str = "/open-apis/bitable/v1/apps/app1/tables";

fn client(server: &MockServer) -> BitableClient {
    BitableClient::new(&server.uri(), "app1", "tok", Duration::from_secs(5)).unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "success", "data": data }))
}

#[tokio::test]
async fn list_tables_follows_page_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLES))
        .and(query_param("page_token", "p2"))
        .respond_with(ok(json!({
            "items": [{ "table_id": "tbl2", "name": "热榜" }],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLES))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ok(json!({
            "items": [{ "table_id": "tbl1", "name": "商品" }],
            "has_more": true,
            "page_token": "p2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tables = client(&server).list_tables().await.unwrap();

    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["商品", "热榜"]);
}

#[tokio::test]
async fn records_are_sent_keyed_by_field_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/tbl1/fields", TABLES)))
        .respond_with(ok(json!({
            "items": [
                { "field_id": "fld1", "field_name": "产品ID", "type": 1 },
                { "field_id": "fld2", "field_name": "产品链接", "type": 15 }
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/tbl1/records/batch_create", TABLES)))
        .and(body_json(json!({
            "records": [{
                "fields": {
                    "产品ID": "B08N5WRWNW",
                    "产品链接": { "text": "https://a.test/dp/1", "link": "https://a.test/dp/1" }
                }
            }]
        })))
        .respond_with(ok(json!({ "records": [{ "record_id": "rec1" }] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut row = Row::new();
    row.insert("fld1".to_string(), CellValue::text("B08N5WRWNW"));
    row.insert("fld2".to_string(), CellValue::link("https://a.test/dp/1"));

    let ids = client(&server).add_records("tbl1", &[row]).await.unwrap();
    assert_eq!(ids, vec!["rec1"]);
}

#[tokio::test]
async fn create_field_posts_type_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/tbl1/fields", TABLES)))
        .and(body_json(json!({ "field_name": "热度值", "type": 2 })))
        .respond_with(ok(json!({
            "field": { "field_id": "fld9", "field_name": "热度值", "type": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let field = client(&server)
        .create_field("tbl1", &FieldSpec::number("热度值"))
        .await
        .unwrap();
    assert_eq!(field.id, "fld9");
}

#[tokio::test]
async fn delete_records_sends_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/tbl1/records/batch_delete", TABLES)))
        .and(body_partial_json(json!({ "records": ["r1", "r2"] })))
        .respond_with(ok(json!({ "records": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_records("tbl1", &["r1".to_string(), "r2".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn non_zero_code_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLES))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 91402, "msg": "NOTEXIST", "data": {} })),
        )
        .mount(&server)
        .await;

    let err = client(&server).list_tables().await.unwrap_err();
    match err {
        HostError::Api { code, msg } => {
            assert_eq!(code, 91402);
            assert_eq!(msg, "NOTEXIST");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_tables().await.unwrap_err();
    assert!(matches!(err, HostError::InvalidResponse(_)));
}

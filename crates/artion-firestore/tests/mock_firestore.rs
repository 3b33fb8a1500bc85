//! Mock Firestore tests.
//!
//! These tests use wiremock to stand in for the Firestore REST API and check
//! both the requests the store sends and how it reads the responses.

use std::sync::Arc;

use artion_core::value::fields_from_json;
use artion_core::{
    CollectionName, Database, Direction, Document, DocumentId, DocumentStore, Error, Exhibition,
    PageRequest, StoreUrl,
};
use artion_firestore::FirestoreStore;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/v1/projects/artion/databases/artion-test/documents";

fn store_url(server: &MockServer) -> StoreUrl {
    StoreUrl::new(format!(
        "http://127.0.0.1:{}{}",
        server.address().port(),
        DOCS_PATH
    ))
    .unwrap()
}

fn store(server: &MockServer) -> FirestoreStore {
    FirestoreStore::new(store_url(server)).unwrap()
}

fn doc_name(collection: &str, id: &str) -> String {
    format!("projects/artion/databases/artion-test/documents/{}/{}", collection, id)
}

fn wire_news(id: &str, title: &str) -> serde_json::Value {
    json!({
        "name": doc_name("news", id),
        "fields": {
            "title": {"stringValue": title},
            "date": {"stringValue": "2023-08-01"},
            "author": {"stringValue": "Editor"},
            "image": {"stringValue": ""},
            "description": {"stringValue": "..."}
        },
        "createTime": "2023-08-01T00:00:00Z",
        "updateTime": "2023-08-01T00:00:00Z"
    })
}

fn coll(name: &str) -> CollectionName {
    CollectionName::new(name).unwrap()
}

fn id(raw: &str) -> DocumentId {
    DocumentId::new(raw).unwrap()
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/news", DOCS_PATH)))
        .and(body_json(json!({"fields": {
            "title": {"stringValue": "Opening"},
            "views": {"integerValue": "3"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": doc_name("news", "AbC123"),
            "fields": {"title": {"stringValue": "Opening"}, "views": {"integerValue": "3"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = fields_from_json(json!({"title": "Opening", "views": 3})).unwrap();
    let created = store(&server).insert(&coll("news"), &fields).await.unwrap();
    assert_eq!(created.as_str(), "AbC123");
}

#[tokio::test]
async fn test_get_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire_news("n1", "Opening")))
        .mount(&server)
        .await;

    let doc = store(&server)
        .get(&coll("news"), &id("n1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.id.as_str(), "n1");
    assert_eq!(doc.get("title").and_then(|v| v.as_str()), Some("Opening"));
}

#[tokio::test]
async fn test_get_missing_document_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/news/ghost", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let doc = store(&server).get(&coll("news"), &id("ghost")).await.unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn test_update_sends_field_mask() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .and(query_param("updateMask.fieldPaths", "title"))
        .and(query_param("updateMask.fieldPaths", "`show info`"))
        .and(query_param("currentDocument.exists", "true"))
        .and(body_json(json!({"fields": {
            "show info": {"stringValue": "x"},
            "title": {"stringValue": "Renamed"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire_news("n1", "Renamed")))
        .expect(1)
        .mount(&server)
        .await;

    let fields = fields_from_json(json!({"title": "Renamed", "show info": "x"})).unwrap();
    store(&server)
        .update(&coll("news"), &id("n1"), &fields)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_missing_document_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/news/ghost", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "No document to update", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let fields = fields_from_json(json!({"title": "x"})).unwrap();
    let err = store(&server)
        .update(&coll("news"), &id("ghost"), &fields)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("No document to update"));
}

#[tokio::test]
async fn test_delete_document() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).delete(&coll("news"), &id("n1")).await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire_news("n1", "Opening")))
        .expect(1)
        .mount(&server)
        .await;

    let store = FirestoreStore::builder(store_url(&server))
        .with_token("secret-token")
        .build()
        .unwrap();
    assert!(store.get(&coll("news"), &id("n1")).await.unwrap().is_some());
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_ranked_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .and(body_json(json!({"structuredQuery": {
            "from": [{"collectionId": "news"}],
            "orderBy": [
                {"field": {"fieldPath": "date"}, "direction": "DESCENDING"},
                {"field": {"fieldPath": "__name__"}, "direction": "DESCENDING"}
            ],
            "limit": 2
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": wire_news("n2", "Second"), "readTime": "2023-08-02T00:00:00Z"},
            {"document": wire_news("n1", "First"), "readTime": "2023-08-02T00:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let db = Database::new(Arc::new(store(&server)));
    let news: Vec<Document> = db
        .collection("news")
        .unwrap()
        .ranked(&[], "date", Direction::Descending, 2)
        .await
        .unwrap();

    let ids: Vec<_> = news.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["n2", "n1"]);
}

#[tokio::test]
async fn test_empty_query_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"readTime": "2023-08-02T00:00:00Z"}])),
        )
        .mount(&server)
        .await;

    let query = artion_core::Query::new(coll("news")).limit(5);
    let docs = store(&server).query(&query).await.unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_malformed_documents_dropped_by_codec() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": {
                "name": doc_name("exhibitions", "broken"),
                "fields": {"title": {"stringValue": "only a title"}}
            }},
            {"document": {
                "name": doc_name("exhibitions", "ok"),
                "fields": {
                    "title": {"stringValue": "Light"},
                    "imageUrl": {"stringValue": ""},
                    "startDate": {"stringValue": "2023/07/01"},
                    "subUnit": {"arrayValue": {"values": [{"stringValue": "Museum"}]}},
                    "showUnit": {"stringValue": "Museum"},
                    "showInfo": {"arrayValue": {"values": [{"mapValue": {"fields": {
                        "price": {"stringValue": "free"},
                        "time": {"stringValue": "09:00"},
                        "locationName": {"stringValue": "臺北市立美術館"},
                        "location": {"stringValue": "中山北路三段181號"},
                        "latitude": {"stringValue": "25.07"},
                        "longitude": {"stringValue": "121.52"}
                    }}}]}},
                    "viewCount": {"integerValue": "12"}
                }
            }}
        ])))
        .mount(&server)
        .await;

    let db = Database::new(Arc::new(store(&server)));
    let page = db
        .collection("exhibitions")
        .unwrap()
        .paged::<Exhibition>(&PageRequest::new(2))
        .await
        .unwrap();

    assert_eq!(page.fetched, 2);
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].city(), "臺北市");
}

#[tokio::test]
async fn test_second_page_sends_start_at() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .and(body_partial_json(json!({"structuredQuery": {
            "startAt": {
                "values": [
                    {"stringValue": "2023-08-01"},
                    {"referenceValue": doc_name("news", "n1")}
                ],
                "before": false
            }
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": wire_news("n1", "First")}
        ])))
        .mount(&server)
        .await;

    let db = Database::new(Arc::new(store(&server)));
    let news = db.collection("news").unwrap();
    let request = PageRequest::new(1).order_by("date", Direction::Ascending);

    let first = news.paged::<Document>(&request).await.unwrap();
    assert_eq!(first.fetched, 1);
    assert!(!first.is_last());

    let second = news
        .paged::<Document>(&request.next(&first).unwrap())
        .await
        .unwrap();
    assert_eq!(second.fetched, 0);
    assert!(second.is_last());
}

fn wire_article(id: &str, published_at: &str) -> serde_json::Value {
    json!({
        "name": doc_name("news", id),
        "fields": {
            "title": {"stringValue": id},
            "publishedAt": {"timestampValue": published_at}
        }
    })
}

#[tokio::test]
async fn test_paging_over_timestamp_field_keeps_timestamp_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .and(body_partial_json(json!({"structuredQuery": {
            "startAt": {
                "values": [
                    {"timestampValue": "2023-07-02T09:00:00Z"},
                    {"referenceValue": doc_name("news", "n2")}
                ],
                "before": false
            }
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": wire_article("n3", "2023-07-03T09:00:00Z")}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": wire_article("n1", "2023-07-01T09:00:00Z")},
            {"document": wire_article("n2", "2023-07-02T09:00:00Z")}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let db = Database::new(Arc::new(store(&server)));
    let news = db.collection("news").unwrap();
    let request = PageRequest::new(2).order_by("publishedAt", Direction::Ascending);

    let all: Vec<Document> = news.paged_all(&request).await.unwrap();
    let ids: Vec<_> = all.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2", "n3"]);
}

#[tokio::test]
async fn test_update_after_read_keeps_timestamp_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(wire_article("n1", "2023-07-01T09:00:00Z")),
        )
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .and(body_partial_json(json!({"fields": {
            "publishedAt": {"timestampValue": "2023-07-01T09:00:00Z"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire_article("n1", "2023-07-01T09:00:00Z")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let doc = store.get(&coll("news"), &id("n1")).await.unwrap().unwrap();
    store.update(&coll("news"), &id("n1"), &doc.fields).await.unwrap();
}

#[tokio::test]
async fn test_query_error_surfaces_backend_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
            "error": {
                "code": 400,
                "message": "order by clause cannot contain a field with an equality filter",
                "status": "INVALID_ARGUMENT"
            }
        }])))
        .mount(&server)
        .await;

    let query = artion_core::Query::new(coll("exhibitions"))
        .where_eq("startDate", "2023/07/01")
        .order_by("startDate", Direction::Ascending);
    let err = store(&server).query(&query).await.unwrap_err();

    match err {
        Error::Backend(e) => {
            assert_eq!(e.status, 400);
            assert_eq!(e.code.as_deref(), Some("INVALID_ARGUMENT"));
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/users/u1", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = store(&server).get(&coll("users"), &id("u1")).await.unwrap_err();
    assert!(matches!(err, Error::Backend(ref e) if e.is_permission_denied()));
}

#[tokio::test]
async fn test_garbage_body_is_wire_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/news/n1", DOCS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = store(&server).get(&coll("news"), &id("n1")).await.unwrap_err();
    assert!(matches!(err, Error::Wire { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let server = MockServer::start().await;
    let url = store_url(&server);
    drop(server);

    let err = FirestoreStore::new(url)
        .unwrap()
        .get(&coll("news"), &id("n1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

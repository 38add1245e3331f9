use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

use wikijs_client::{
    ClientError, CreateOutcome, CreatePageRequest, UpdateOutcome, WikiClient, WikiClientConfig,
};

/// Canned GraphQL endpoint: answers each POST with the next scripted reply
/// and records every request body it was sent.
#[derive(Clone)]
struct MockWiki {
    replies: Arc<Mutex<Vec<(u16, Value)>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockWiki {
    fn new(replies: Vec<(u16, Value)>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn request_variables(&self, index: usize) -> Value {
        self.requests.lock().expect("requests lock")[index]["variables"].clone()
    }
}

async fn graphql(State(mock): State<MockWiki>, Json(request): Json<Value>) -> (StatusCode, Json<Value>) {
    mock.requests.lock().expect("requests lock").push(request);
    let (status, reply) = mock.replies.lock().expect("replies lock").remove(0);
    (
        StatusCode::from_u16(status).expect("scripted status"),
        Json(reply),
    )
}

async fn serve(mock: MockWiki) -> SocketAddr {
    let app = Router::new()
        .route("/graphql", post(graphql))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock wiki serve");
    });
    addr
}

async fn client_against(mock: MockWiki) -> WikiClient {
    let addr = serve(mock).await;
    let base_url: Url = format!("http://{addr}").parse().expect("mock base url");
    WikiClient::new(WikiClientConfig::new(base_url, "test-token"))
}

fn page_json(id: i64, description: &str) -> Value {
    json!({
        "id": id,
        "title": "Homepage",
        "description": description,
        "content": "existing content",
        "path": "/home",
        "updatedAt": "2024-05-02T10:00:00.000Z",
    })
}

fn single_reply(page: Value) -> Value {
    json!({ "data": { "pages": { "single": page } } })
}

fn not_found_reply() -> Value {
    json!({
        "errors": [{
            "message": "This page does not exist",
            "extensions": { "exception": { "code": 6003 } }
        }]
    })
}

fn update_reply(succeeded: bool, slug: &str, message: &str) -> Value {
    json!({
        "data": {
            "pages": {
                "update": {
                    "responseResult": {
                        "succeeded": succeeded,
                        "slug": slug,
                        "message": message,
                    }
                }
            }
        }
    })
}

#[tokio::test]
async fn missing_page_is_not_found_not_api_error() {
    let mock = MockWiki::new(vec![(200, not_found_reply())]);
    let client = client_against(mock).await;

    let page = client.page_by_id(99).await.expect("lookup should classify");
    assert!(page.is_none());
}

#[tokio::test]
async fn null_single_field_is_not_found() {
    let mock = MockWiki::new(vec![(200, single_reply(Value::Null))]);
    let client = client_against(mock).await;

    let page = client.page_by_id(7).await.expect("lookup should classify");
    assert!(page.is_none());
}

#[tokio::test]
async fn page_fields_round_trip() {
    let mock = MockWiki::new(vec![(200, single_reply(page_json(7, "about the team")))]);
    let client = client_against(mock).await;

    let page = client
        .page_by_id(7)
        .await
        .expect("lookup should succeed")
        .expect("page should exist");
    assert_eq!(page.id, 7);
    assert_eq!(page.title.as_deref(), Some("Homepage"));
    assert_eq!(page.description.as_deref(), Some("about the team"));
    assert_eq!(page.path.as_deref(), Some("/home"));
    assert!(page.updated_at.is_some());
}

#[tokio::test]
async fn page_by_path_sends_the_configured_locale() {
    let mock = MockWiki::new(vec![(
        200,
        json!({ "data": { "pages": { "singleByPath": page_json(3, "") } } }),
    )]);
    let addr = serve(mock.clone()).await;
    let base_url: Url = format!("http://{addr}").parse().expect("mock base url");
    let client = WikiClient::new(
        WikiClientConfig::new(base_url, "test-token").with_locale("de"),
    );

    let page = client
        .page_by_path("/people/zef")
        .await
        .expect("lookup should succeed")
        .expect("page should exist");
    assert_eq!(page.id, 3);

    let variables = mock.request_variables(0);
    assert_eq!(variables["path"], json!("/people/zef"));
    assert_eq!(variables["locale"], json!("de"));
}

#[tokio::test]
async fn search_keeps_server_order() {
    let mock = MockWiki::new(vec![(
        200,
        json!({
            "data": { "pages": { "search": { "results": [
                { "id": 3, "title": "Deploys", "description": "how we ship", "path": "/ops/deploys" },
                { "id": 1, "title": "Home", "description": "", "path": "/home" },
            ] } } }
        }),
    )]);
    let client = client_against(mock).await;

    let hits = client.search("deploy").await.expect("search should succeed");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, 3);
    assert_eq!(hits[1].id, 1);
}

#[tokio::test]
async fn search_with_no_hits_is_an_empty_success() {
    let mock = MockWiki::new(vec![(
        200,
        json!({ "data": { "pages": { "search": { "results": [] } } } }),
    )]);
    let client = client_against(mock).await;

    let hits = client.search("nothing").await.expect("search should succeed");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let mock = MockWiki::new(vec![(502, json!({ "message": "bad gateway" }))]);
    let client = client_against(mock).await;

    match client.page_by_id(1).await {
        Err(ClientError::Transport { status, body }) => {
            assert_eq!(status.as_u16(), 502);
            assert!(body.contains("bad gateway"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_list_without_sentinel_is_an_api_error() {
    let mock = MockWiki::new(vec![(
        200,
        json!({ "errors": [{ "message": "forbidden" }] }),
    )]);
    let client = client_against(mock).await;

    match client.page_by_id(1).await {
        Err(ClientError::Api(messages)) => assert_eq!(messages, vec!["forbidden"]),
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_pages_container_is_malformed_not_a_panic() {
    let mock = MockWiki::new(vec![(200, json!({ "data": {} }))]);
    let client = client_against(mock).await;

    assert!(matches!(
        client.page_by_id(1).await,
        Err(ClientError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn update_short_circuits_when_the_page_is_missing() {
    let mock = MockWiki::new(vec![(200, not_found_reply())]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    let outcome = client
        .update_page(42, "new content", None)
        .await
        .expect("update should classify");
    assert!(outcome.is_none());
    assert_eq!(handle.request_count(), 1, "mutation must not be issued");
}

#[tokio::test]
async fn update_short_circuits_when_the_read_fails() {
    let mock = MockWiki::new(vec![(500, json!({ "message": "boom" }))]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    assert!(matches!(
        client.update_page(42, "new content", None).await,
        Err(ClientError::Transport { .. })
    ));
    assert_eq!(handle.request_count(), 1, "mutation must not be issued");
}

#[tokio::test]
async fn update_preserves_the_stored_description_verbatim() {
    let mock = MockWiki::new(vec![
        (200, single_reply(page_json(42, "keep me intact"))),
        (200, update_reply(true, "home", "ok")),
    ]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    let outcome = client
        .update_page(42, "new content", None)
        .await
        .expect("update should succeed");
    assert_eq!(
        outcome,
        Some(UpdateOutcome::Updated {
            slug: "home".to_owned()
        })
    );

    let variables = handle.request_variables(1);
    assert_eq!(variables["id"], json!(42));
    assert_eq!(variables["content"], json!("new content"));
    assert_eq!(variables["description"], json!("keep me intact"));
    assert_eq!(variables["title"], json!("Homepage"));
    assert_eq!(variables["path"], json!("/home"));
}

#[tokio::test]
async fn update_overrides_the_description_only_when_supplied() {
    let mock = MockWiki::new(vec![
        (200, single_reply(page_json(42, "old words"))),
        (200, update_reply(true, "home", "ok")),
    ]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    client
        .update_page(42, "new content", Some("fresh words"))
        .await
        .expect("update should succeed");

    let variables = handle.request_variables(1);
    assert_eq!(variables["description"], json!("fresh words"));
}

#[tokio::test]
async fn update_rejection_carries_the_remote_message() {
    let mock = MockWiki::new(vec![
        (200, single_reply(page_json(42, ""))),
        (200, update_reply(false, "", "version conflict")),
    ]);
    let client = client_against(mock).await;

    let outcome = client
        .update_page(42, "new content", None)
        .await
        .expect("update should classify");
    assert_eq!(
        outcome,
        Some(UpdateOutcome::Rejected {
            message: "version conflict".to_owned()
        })
    );
}

#[tokio::test]
async fn create_sends_the_full_field_set_with_string_description() {
    let mock = MockWiki::new(vec![(
        200,
        json!({
            "data": { "pages": { "create": {
                "responseResult": { "succeeded": true, "slug": "/t", "message": "created" },
                "page": { "id": 42, "title": "T", "description": "", "path": "/t" }
            } } }
        }),
    )]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    let outcome = client
        .create_page(&CreatePageRequest::new("T", "C", "/t"))
        .await
        .expect("create should succeed");
    assert_eq!(outcome, CreateOutcome::Created { id: 42 });

    let variables = handle.request_variables(0);
    // The remote schema requires every field present, empty string not null.
    assert_eq!(variables["description"], json!(""));
    assert_eq!(variables["editor"], json!("markdown"));
    assert_eq!(variables["locale"], json!("en"));
    assert_eq!(variables["isPrivate"], json!(false));
    assert_eq!(variables["isPublished"], json!(true));
    assert_eq!(variables["tags"], json!([]));
    assert_eq!(variables["scriptCss"], json!(""));
    assert_eq!(variables["scriptJs"], json!(""));
    assert_eq!(variables.get("publishStartDate"), Some(&Value::Null));
    assert_eq!(variables.get("publishEndDate"), Some(&Value::Null));
}

#[tokio::test]
async fn create_rejection_carries_the_remote_message_and_no_id() {
    let mock = MockWiki::new(vec![(
        200,
        json!({
            "data": { "pages": { "create": {
                "responseResult": { "succeeded": false, "slug": "", "message": "path taken" },
                "page": null
            } } }
        }),
    )]);
    let client = client_against(mock).await;

    let outcome = client
        .create_page(&CreatePageRequest::new("T", "C", "/t"))
        .await
        .expect("create should classify");
    assert_eq!(
        outcome,
        CreateOutcome::Rejected {
            message: "path taken".to_owned()
        }
    );
}

#[tokio::test]
async fn create_with_description_passes_it_through() {
    let mock = MockWiki::new(vec![(
        200,
        json!({
            "data": { "pages": { "create": {
                "responseResult": { "succeeded": true, "slug": "/t", "message": "created" },
                "page": { "id": 7, "title": "T", "description": "what this page is", "path": "/t" }
            } } }
        }),
    )]);
    let handle = mock.clone();
    let client = client_against(mock).await;

    client
        .create_page(
            &CreatePageRequest::new("T", "C", "/t").with_description("what this page is"),
        )
        .await
        .expect("create should succeed");

    assert_eq!(
        handle.request_variables(0)["description"],
        json!("what this page is")
    );
}

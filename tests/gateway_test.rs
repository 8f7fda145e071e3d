//! Question gateway tests against a mock API

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use question_hub::client::{GatewayConfig, GatewayError, ManualClock, QuestionGateway};
use question_hub::filter::CategoryCatalog;
use question_hub::types::Difficulty;

fn backend_questions() -> serde_json::Value {
    json!([
        {
            "_id": "65a000000000000000000001",
            "question": "What is REST?",
            "answer": "An architectural style",
            "category": "Backend",
            "tags": ["REST", "HTTP"],
            "difficulty": "easy"
        },
        {
            "_id": "65a000000000000000000002",
            "question": "What is gRPC?",
            "answer": "An RPC framework over HTTP/2",
            "category": "Backend",
            "tags": ["RPC"]
        }
    ])
}

async fn mount_questions(server: &MockServer, category: &str, body: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/questions/{}", category)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

fn gateway(server: &MockServer, clock: Arc<ManualClock>) -> QuestionGateway {
    QuestionGateway::with_clock(GatewayConfig::new(server.uri()), clock).unwrap()
}

#[tokio::test]
async fn test_second_fetch_within_ttl_is_cached() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", backend_questions(), 1).await;
    let clock = Arc::new(ManualClock::new());
    let gateway = gateway(&server, Arc::clone(&clock));

    let first = gateway.questions("Backend", false).await.unwrap();
    clock.advance(Duration::from_secs(299));
    let second = gateway.questions("Backend", false).await.unwrap();

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(gateway.stats().network_fetches, 1);
    assert_eq!(gateway.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", backend_questions(), 2).await;
    let clock = Arc::new(ManualClock::new());
    let gateway = gateway(&server, Arc::clone(&clock));

    gateway.questions("Backend", false).await.unwrap();
    clock.advance(Duration::from_secs(301));
    gateway.questions("Backend", false).await.unwrap();

    assert_eq!(gateway.stats().network_fetches, 2);
}

#[tokio::test]
async fn test_force_refresh_bypasses_cache() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", backend_questions(), 2).await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let first = gateway.questions("Backend", false).await.unwrap();
    let refreshed = gateway.questions("Backend", true).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));

    // The refreshed entry now serves normal calls
    let cached = gateway.questions("Backend", false).await.unwrap();
    assert!(Arc::ptr_eq(&refreshed, &cached));
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/Backend"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(backend_questions())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let (a, b, c) = tokio::join!(
        gateway.questions("Backend", false),
        gateway.questions("Backend", false),
        gateway.questions("Backend", true),
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
    assert_eq!(gateway.stats().network_fetches, 1);
    assert_eq!(gateway.stats().coalesced, 2);
}

#[tokio::test]
async fn test_waiter_takes_over_when_leading_fetch_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/Backend"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(backend_questions())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let gateway = Arc::new(gateway(&server, Arc::new(ManualClock::new())));

    let leader = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.questions("Backend", false).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let waiter = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.questions("Backend", false).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    leader.abort();
    assert!(leader.await.unwrap_err().is_cancelled());

    let questions = waiter.await.unwrap().unwrap();
    assert_eq!(questions.len(), 2);

    let stats = gateway.stats();
    assert_eq!(stats.network_fetches, 2);
    assert_eq!(stats.coalesced, 1);

    // The takeover result is cached for later callers
    let cached = gateway.questions("Backend", false).await.unwrap();
    assert!(Arc::ptr_eq(&questions, &cached));
}

#[tokio::test]
async fn test_categories_are_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Frontend", "Backend"])))
        .expect(1)
        .mount(&server)
        .await;
    let clock = Arc::new(ManualClock::new());
    let gateway = gateway(&server, Arc::clone(&clock));

    let first = gateway.categories().await.unwrap();
    clock.advance(Duration::from_secs(24 * 60 * 60));
    let second = gateway.categories().await.unwrap();

    assert_eq!(*first, vec!["Frontend", "Backend"]);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_server_error_carries_status_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/Backend"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Server Error." })))
        .expect(2)
        .mount(&server)
        .await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let err = gateway.questions("Backend", false).await.unwrap_err();
    match &err {
        GatewayError::Server { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("Server Error."));
        }
        other => panic!("expected server error, got {:?}", other),
    }
    assert!(err.to_string().contains("500"));

    tokio_test::assert_err!(gateway.questions("Backend", false).await);
}

#[tokio::test]
async fn test_failed_categories_fetch_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Databases"])))
        .expect(1)
        .mount(&server)
        .await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let err = gateway.categories().await.unwrap_err();
    assert!(matches!(err, GatewayError::Server { status: 503, .. }));

    let categories = tokio_test::assert_ok!(gateway.categories().await);
    assert_eq!(*categories, vec!["Databases"]);
}

#[tokio::test]
async fn test_malformed_payload_is_parse_error() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", json!({ "questions": [] }), 1).await;
    mount_questions(&server, "Frontend", json!([{ "question": "no id", "category": "Frontend" }]), 1).await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let err = gateway.questions("Backend", false).await.unwrap_err();
    assert!(matches!(err, GatewayError::Parse(_)));
    assert!(err.to_string().starts_with("Invalid response"));

    let err = gateway.questions("Frontend", false).await.unwrap_err();
    assert!(matches!(err, GatewayError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let gateway = QuestionGateway::new(GatewayConfig::new(format!("http://127.0.0.1:{}", port))).unwrap();

    let err = gateway.categories().await.unwrap_err();
    assert!(err.is_network(), "{:?}", err);
    assert!(err.to_string().starts_with("Network error"));
}

#[tokio::test]
async fn test_records_are_normalized() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", backend_questions(), 1).await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let questions = gateway.questions("Backend", false).await.unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id, "65a000000000000000000001");
    assert_eq!(questions[0].difficulty, Difficulty::Easy);
    assert_eq!(questions[1].difficulty, Difficulty::Medium);
    assert_eq!(questions[1].tags, vec!["RPC"]);
}

#[tokio::test]
async fn test_empty_category_is_a_valid_result() {
    let server = MockServer::start().await;
    mount_questions(&server, "Quantum", json!([]), 1).await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let questions = gateway.questions("Quantum", false).await.unwrap();
    assert!(questions.is_empty());

    // Empty results are cached like any other
    gateway.questions("Quantum", false).await.unwrap();
}

#[tokio::test]
async fn test_other_spelling_does_not_reuse_entry() {
    let server = MockServer::start().await;
    mount_questions(&server, "Backend", backend_questions(), 1).await;
    mount_questions(&server, "backend", json!([]), 1).await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    assert_eq!(gateway.questions("Backend", false).await.unwrap().len(), 2);
    assert!(gateway.questions("backend", false).await.unwrap().is_empty());
    assert_eq!(gateway.stats().network_fetches, 2);
}

#[tokio::test]
async fn test_category_overview_joins_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Backend", "databases"])))
        .expect(1)
        .mount(&server)
        .await;
    mount_questions(&server, "Backend", backend_questions(), 1).await;
    mount_questions(
        &server,
        "databases",
        json!([{ "_id": "d1", "question": "What is ACID?", "answer": "...", "category": "databases" }]),
        1,
    )
    .await;
    let gateway = gateway(&server, Arc::new(ManualClock::new()));

    let overview = gateway.category_overview(&CategoryCatalog::default()).await.unwrap();
    assert_eq!(overview.len(), 6);

    let by_slug = |slug: &str| overview.iter().find(|e| e.slug == slug).unwrap().clone();

    let backend = by_slug("backend");
    assert_eq!(backend.api_name.as_deref(), Some("Backend"));
    assert_eq!(backend.question_count, 2);

    let databases = by_slug("databases");
    assert_eq!(databases.api_name.as_deref(), Some("databases"));
    assert_eq!(databases.question_count, 1);

    let frontend = by_slug("frontend");
    assert!(!frontend.is_available());
    assert_eq!(frontend.question_count, 0);
}

mod common;

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use common::{ScriptedGenerator, harness, harness_with, memory_cache};
use redislink::infrastructure::cache::{CacheService, MemoryCache, NullCache};
use redislink::routes::router;
use redislink::utils::code_generator::RandomCodeGenerator;

fn server(h: &common::Harness) -> TestServer {
    TestServer::new(router(h.state())).unwrap()
}

#[tokio::test]
async fn test_index_banner() {
    let h = harness();
    let response = server(&h).get("/").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["service"], "redislink");
    assert!(json["endpoints"].get("shorten").is_some());
}

#[tokio::test]
async fn test_favicon_is_empty() {
    let h = harness();
    server(&h)
        .get("/favicon.ico")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_shorten_creates_then_reports_existing() {
    let h = harness_with(
        memory_cache(),
        Arc::new(ScriptedGenerator::new(&["abc123XY"])),
        5,
    );
    let server = server(&h);

    let response = server
        .post("/url/shorten")
        .json(&json!({ "longUrl": "https://example.com/a" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["status"], true);
    assert_eq!(json["message"], "Short URL created successfully");
    assert_eq!(json["data"]["urlCode"], "abc123XY");
    assert_eq!(json["data"]["shortUrl"], "https://svc/abc123XY");
    assert_eq!(json["data"]["longUrl"], "https://example.com/a");

    let again = server
        .post("/url/shorten")
        .json(&json!({ "longUrl": "https://example.com/a" }))
        .await;

    again.assert_status_ok();
    assert_eq!(again.json::<Value>()["data"]["urlCode"], "abc123XY");
}

#[tokio::test]
async fn test_shorten_trims_whitespace() {
    let h = harness();

    let response = server(&h)
        .post("/url/shorten")
        .json(&json!({ "longUrl": "  https://example.com/a  " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["data"]["longUrl"],
        "https://example.com/a"
    );
}

#[tokio::test]
async fn test_shorten_rejects_bad_input() {
    let h = harness();
    let server = server(&h);

    let cases = [
        json!({}),
        json!({ "longUrl": "" }),
        json!({ "longUrl": "not a url" }),
        json!({ "longUrl": "ftp://example.com/file" }),
        json!({ "longUrl": "javascript:alert(1)" }),
        json!({ "longUrl": format!("https://example.com/{}", "a".repeat(2100)) }),
    ];

    for body in cases {
        let response = server.post("/url/shorten").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }

    assert!(h.repository.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_malformed_body() {
    let h = harness();

    let response = server(&h)
        .post("/url/shorten")
        .text("{not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_exhaustion_is_503() {
    let h = harness_with(memory_cache(), Arc::new(ScriptedGenerator::new(&["dup"])), 2);
    let server = server(&h);

    server
        .post("/url/shorten")
        .json(&json!({ "longUrl": "https://example.com/a" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/url/shorten")
        .json(&json!({ "longUrl": "https://example.com/b" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "code_allocation_failed"
    );
}

#[tokio::test]
async fn test_shorten_store_outage_hides_details() {
    let h = harness();
    h.repository.set_unavailable(true);

    let response = server(&h)
        .post("/url/shorten")
        .json(&json!({ "longUrl": "https://example.com/a" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn test_redirect_found() {
    let h = harness();
    let link = h
        .engine
        .create_short_link("https://example.com/a?x=1")
        .await
        .unwrap();

    let response = server(&h).get(&format!("/{}", link.code)).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION).to_str().unwrap(),
        "https://example.com/a?x=1"
    );
}

#[tokio::test]
async fn test_redirect_unknown_code_is_404() {
    let h = harness();

    let response = server(&h).get("/doesNotExist").await;

    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["code"], "doesNotExist");
}

#[tokio::test]
async fn test_redirect_reserved_paths_are_404() {
    let h = harness();
    let server = server(&h);

    for path in ["/robots.txt", "/sitemap.xml"] {
        server.get(path).await.assert_status_not_found();
    }
}

#[tokio::test]
async fn test_redirect_malformed_code_is_400() {
    let h = harness();

    server(&h)
        .get(&format!("/{}", "a".repeat(21)))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let h = harness();
    let server = server(&h);

    let response = server.get("/a/b").await;
    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "Route /a/b not found");

    let response = server.post("/x").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["details"]["path"], "/x");

    server
        .get("/url/shorten")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_health_healthy() {
    let h = harness();

    let response = server(&h).get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["backend"], "memory");
    assert_eq!(json["checks"]["cache"]["connected"], true);
    assert!(json.get("version").is_some());
    assert!(json["timestamp"].is_string());
    assert!(json["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_health_degraded_cache_is_still_200() {
    let cache = Arc::new(MemoryCache::new(100, 60, "test:"));
    cache.disconnect().await;
    let h = harness_with(cache, Arc::new(RandomCodeGenerator::default()), 5);

    let response = server(&h).get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["cache"]["status"], "error");
    assert_eq!(json["checks"]["cache"]["connected"], false);
}

#[tokio::test]
async fn test_health_disabled_cache() {
    let h = harness_with(
        Arc::new(NullCache::new()),
        Arc::new(RandomCodeGenerator::default()),
        5,
    );

    let response = server(&h).get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["cache"]["status"], "disabled");
}

#[tokio::test]
async fn test_health_store_down_is_503() {
    let h = harness();
    h.repository.set_unavailable(true);

    let response = server(&h).get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

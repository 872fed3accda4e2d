//! HTTP Translator Integration Tests
//!
//! Uses wiremock for HTTP mocking to test:
//! - Request formatting (JSON body, correlation header)
//! - Response parsing and source defaulting
//! - Rate limit, API error and timeout mapping
//! - Orchestrator cooldown driven by a server Retry-After

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::search::{OrchestratorConfig, RawQuery, SearchOptions, SearchOrchestrator, SearchOutcome};
use crate::core::translate::http::REQUEST_ID_HEADER;
use crate::core::translate::{
    HttpTranslator, Source, TranslateError, TranslationFilters, TranslationRequest, Translator,
};
use crate::tests::mocks::RecordingSink;

async fn translator_for(server: &MockServer, timeout: Duration) -> HttpTranslator {
    let endpoint = Url::parse(&format!("{}/api/translate", server.uri())).unwrap();
    HttpTranslator::new(endpoint, timeout).unwrap()
}

// =============================================================================
// Success Paths
// =============================================================================

#[tokio::test]
async fn test_successful_translation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(header_exists(REQUEST_ID_HEADER))
        .and(body_partial_json(json!({
            "query": "cheap elves",
            "filters": { "format": "pauper" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "grammarQuery": "t:elf mv<=3",
            "explanation": {
                "readable": "Cheap elves",
                "assumptions": [],
                "confidence": 0.9
            },
            "source": "pattern_match"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_secs(5)).await;
    let request = TranslationRequest::new("cheap elves").with_filters(TranslationFilters {
        format: Some("pauper".to_string()),
        ..Default::default()
    });
    let result = translator.translate(request).await.unwrap();

    assert_eq!(result.grammar_query, "t:elf mv<=3");
    assert_eq!(result.source, Source::PatternMatch);
    assert_eq!(result.explanation.readable, "Cheap elves");
}

#[tokio::test]
async fn test_missing_source_defaults_to_ai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "grammarQuery": "t:goblin"
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_secs(5)).await;
    let result = translator
        .translate(TranslationRequest::new("goblins"))
        .await
        .unwrap();
    assert_eq!(result.source, Source::Ai);
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_429_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "42"))
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_secs(5)).await;
    let err = translator
        .translate(TranslationRequest::new("elves"))
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "model crashed"
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_secs(5)).await;
    let err = translator
        .translate(TranslationRequest::new("elves"))
        .await
        .unwrap_err();

    match err {
        TranslateError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "model crashed");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsuccessful_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "No searchable terms"
        })))
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_secs(5)).await;
    let err = translator
        .translate(TranslationRequest::new("the"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Rejected(ref m) if m == "No searchable terms"));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "grammarQuery": "t:elf" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let translator = translator_for(&server, Duration::from_millis(100)).await;
    let err = translator
        .translate(TranslationRequest::new("elves"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Timeout));
}

// =============================================================================
// Orchestrator Over HTTP
// =============================================================================

#[tokio::test]
async fn test_retry_after_drives_orchestrator_cooldown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .expect(1)
        .mount(&server)
        .await;

    let translator = Arc::new(translator_for(&server, Duration::from_secs(5)).await);
    let sink = Arc::new(RecordingSink::new());
    let orchestrator = SearchOrchestrator::new(translator, sink.clone(), OrchestratorConfig::default());

    let outcome = orchestrator
        .search(RawQuery::new("elves"), SearchOptions::default())
        .await;
    assert_eq!(
        outcome,
        SearchOutcome::RateLimited {
            retry_after: Duration::from_secs(120)
        }
    );

    let blocked = orchestrator
        .search(RawQuery::new("goblins"), SearchOptions::default())
        .await;
    assert!(matches!(blocked, SearchOutcome::Blocked { .. }));
    assert!(sink.commits().is_empty());
}

//! Translate Server Integration Tests
//!
//! Runs the axum router on an ephemeral port with the embedded service
//! behind it, and talks to it through the HTTP translator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::core::server::{router, TRANSLATE_PATH};
use crate::core::translate::{
    HttpTranslator, ServiceConfig, Source, TranslationRequest, TranslationService, Translator,
};

async fn spawn_server(config: ServiceConfig) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(TranslationService::new(config)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpTranslator {
    let endpoint = Url::parse(&format!("http://{addr}{TRANSLATE_PATH}")).unwrap();
    HttpTranslator::new(endpoint, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_round_trip_and_cache() {
    let addr = spawn_server(ServiceConfig::default()).await;
    let translator = client(addr);

    let first = translator
        .translate(TranslationRequest::new("cheap blue counterspells"))
        .await
        .unwrap();
    assert_eq!(first.grammar_query, "otag:counterspell mv<=3 c:u");
    assert_eq!(first.source, Source::PatternMatch);
    assert_eq!(first.intent.unwrap().max_mana_value, Some(3));

    let second = translator
        .translate(TranslationRequest::new("cheap blue counterspells"))
        .await
        .unwrap();
    assert_eq!(second.source, Source::Cache);
    assert_eq!(second.grammar_query, first.grammar_query);
}

#[tokio::test]
async fn test_server_rate_limit_reaches_client() {
    let addr = spawn_server(ServiceConfig {
        requests_per_minute: 1,
        ..Default::default()
    })
    .await;
    let translator = client(addr);

    translator
        .translate(TranslationRequest::new("ramp"))
        .await
        .unwrap();
    let err = translator
        .translate(TranslationRequest::new("ramp"))
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert!(err.retry_after().is_some());
}

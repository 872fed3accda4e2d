//! Search Orchestrator Unit Tests
//!
//! Scenario tests on a paused tokio clock:
//! - Overlapping searches commit only the newest token
//! - Deadline and translator failures degrade to the fallback compiler
//! - Rate-limit cooldown blocks and then releases searches
//! - Duplicate suppression, user-edited sanitizing, edit-and-re-run, shutdown

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::core::search::types::MockSearchSink;
use crate::core::search::{
    FilterHints, Notice, OrchestratorConfig, RawQuery, RerunOutcome, SearchOptions,
    SearchOrchestrator, SearchOutcome,
};
use crate::core::translate::Source;
use crate::tests::mocks::{RecordingSink, Reply, ScriptedTranslator};

fn setup(
    translator: ScriptedTranslator,
) -> (Arc<SearchOrchestrator>, Arc<ScriptedTranslator>, Arc<RecordingSink>) {
    let translator = Arc::new(translator);
    let sink = Arc::new(RecordingSink::new());
    let orchestrator = Arc::new(SearchOrchestrator::new(
        translator.clone(),
        sink.clone(),
        OrchestratorConfig::default(),
    ));
    (orchestrator, translator, sink)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// =============================================================================
// Stale-Result Suppression
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_overlapping_searches_commit_only_the_newest() {
    let translator = ScriptedTranslator::new()
        .reply("q1", ms(500), Reply::Grammar("t:q1".to_string()))
        .reply("q2", ms(400), Reply::Grammar("t:q2".to_string()))
        .reply("q3", ms(300), Reply::Grammar("t:q3".to_string()))
        .reply("q4", ms(200), Reply::Grammar("t:q4".to_string()))
        .reply("q5", ms(100), Reply::Grammar("t:q5".to_string()));
    let (orchestrator, translator, sink) = setup(translator);

    let searches = ["q1", "q2", "q3", "q4", "q5"]
        .into_iter()
        .map(|q| orchestrator.search(RawQuery::new(q), SearchOptions::default()));
    let outcomes = join_all(searches).await;

    assert_eq!(translator.calls(), 5);
    let commits = sink.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].token, 5);
    assert_eq!(commits[0].grammar_query, "t:q5");
    assert_eq!(commits[0].natural_query.as_deref(), Some("q5"));

    let superseded = outcomes
        .iter()
        .filter(|o| matches!(o, SearchOutcome::Superseded { .. }))
        .count();
    assert_eq!(superseded, 4);
    assert!(!orchestrator.is_searching());
}

#[tokio::test(start_paused = true)]
async fn test_stale_fallback_is_discarded() {
    let translator = ScriptedTranslator::new()
        .reply("slow", Duration::from_secs(60), Reply::Grammar("t:slow".to_string()))
        .reply("fast", ms(10), Reply::Grammar("t:fast".to_string()));
    let (orchestrator, _, sink) = setup(translator);

    let first = orchestrator.search(RawQuery::new("slow"), SearchOptions::default());
    let second = orchestrator.search(RawQuery::new("fast"), SearchOptions::default());
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, SearchOutcome::Superseded { token: 1 });
    assert_eq!(second.commit().unwrap().grammar_query, "t:fast");
    assert_eq!(sink.commits().len(), 1);
    assert!(sink.notices().is_empty());
}

// =============================================================================
// Degraded Mode
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_uses_fallback_compiler() {
    let translator = ScriptedTranslator::new().reply(
        "cheap red creatures",
        Duration::from_secs(60),
        Reply::Grammar("unused".to_string()),
    );
    let (orchestrator, _, sink) = setup(translator);

    let outcome = orchestrator
        .search(RawQuery::new("cheap red creatures"), SearchOptions::default())
        .await;

    let commit = outcome.commit().unwrap();
    assert_eq!(commit.grammar_query, "c:r t:creature mv<=3");
    let result = commit.result.as_ref().unwrap();
    assert_eq!(result.source, Source::ClientFallback);
    assert!(result.explanation.assumptions[0].contains("timed out"));
    assert_eq!(sink.notices(), vec![Notice::TranslationTimedOut]);
    assert_eq!(orchestrator.history()[0].query, "cheap red creatures");
}

#[tokio::test(start_paused = true)]
async fn test_translator_error_uses_fallback_compiler() {
    let translator = ScriptedTranslator::new().reply(
        "board wipes",
        Duration::ZERO,
        Reply::Fail("upstream exploded".to_string()),
    );
    let (orchestrator, _, sink) = setup(translator);

    let outcome = orchestrator
        .search(RawQuery::new("board wipes"), SearchOptions::default())
        .await;

    let commit = outcome.commit().unwrap();
    assert_eq!(commit.grammar_query, "otag:board-wipe");
    assert_eq!(commit.result.as_ref().unwrap().source, Source::ClientFallback);
    assert!(matches!(
        sink.notices().as_slice(),
        [Notice::TranslatorUnavailable { .. }]
    ));
}

// =============================================================================
// Rate Limiting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limit_blocks_then_releases() {
    let translator =
        ScriptedTranslator::new().reply("elves", Duration::ZERO, Reply::RateLimited(None));
    let (orchestrator, translator, sink) = setup(translator);

    let outcome = orchestrator
        .search(RawQuery::new("elves"), SearchOptions::default())
        .await;
    assert_eq!(
        outcome,
        SearchOutcome::RateLimited {
            retry_after: Duration::from_secs(30)
        }
    );
    assert!(sink.commits().is_empty());
    assert_eq!(translator.calls(), 1);
    assert_eq!(orchestrator.history()[0].query, "elves");

    tokio::time::advance(Duration::from_secs(1)).await;
    let blocked = orchestrator
        .search(RawQuery::new("goblins"), SearchOptions::default())
        .await;
    assert_eq!(
        blocked,
        SearchOutcome::Blocked {
            retry_after: Duration::from_secs(29)
        }
    );
    assert_eq!(translator.calls(), 1);
    assert_eq!(orchestrator.current_token(), 1);
    assert_eq!(orchestrator.history().len(), 1);

    tokio::time::advance(Duration::from_secs(30)).await;
    let released = orchestrator
        .search(RawQuery::new("goblins"), SearchOptions::default())
        .await;
    assert_eq!(released.commit().unwrap().grammar_query, "o:\"goblins\"");
    assert_eq!(translator.calls(), 2);
    let queries: Vec<_> = orchestrator.history().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["goblins", "elves"]);

    assert_eq!(
        sink.notices(),
        vec![
            Notice::RateLimited { seconds: 30 },
            Notice::PleaseWait { seconds: 29 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_server_retry_after_extends_cooldown() {
    let translator =
        ScriptedTranslator::new().reply("elves", Duration::ZERO, Reply::RateLimited(Some(120)));
    let (orchestrator, _, _) = setup(translator);

    orchestrator
        .search(RawQuery::new("elves"), SearchOptions::default())
        .await;
    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(orchestrator.rate_limited_for(), Some(Duration::from_secs(60)));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_message_heuristic() {
    let translator = ScriptedTranslator::new().reply(
        "elves",
        Duration::ZERO,
        Reply::Fail("Please wait before trying again".to_string()),
    );
    let (orchestrator, _, sink) = setup(translator);

    let outcome = orchestrator
        .search(RawQuery::new("elves"), SearchOptions::default())
        .await;
    assert!(matches!(outcome, SearchOutcome::RateLimited { .. }));
    assert!(sink.commits().is_empty());
}

// =============================================================================
// Guards, Dedup and History
// =============================================================================

#[tokio::test]
async fn test_empty_query_is_ignored() {
    // No expectations: any sink call fails the test.
    let sink = MockSearchSink::new();
    let translator = Arc::new(ScriptedTranslator::new());
    let orchestrator =
        SearchOrchestrator::new(translator.clone(), Arc::new(sink), OrchestratorConfig::default());

    for query in ["", "   ", "\n\t "] {
        let outcome = orchestrator
            .search(RawQuery::new(query), SearchOptions::default())
            .await;
        assert_eq!(outcome, SearchOutcome::Ignored);
    }
    assert_eq!(translator.calls(), 0);
    assert_eq!(orchestrator.current_token(), 0);
    assert!(orchestrator.history().is_empty());
}

#[tokio::test]
async fn test_repeat_search_reuses_translation() {
    let (orchestrator, translator, sink) = setup(ScriptedTranslator::new());

    orchestrator
        .search(RawQuery::new("Elves"), SearchOptions::default())
        .await;
    let repeat = orchestrator
        .search(RawQuery::new("elves "), SearchOptions::default())
        .await;

    assert_eq!(translator.calls(), 1);
    assert_eq!(repeat.commit().unwrap().result.as_ref().unwrap().source, Source::Cache);

    let bypass = SearchOptions {
        bypass_cache: true,
        ..Default::default()
    };
    orchestrator.search(RawQuery::new("elves"), bypass).await;
    assert_eq!(translator.calls(), 2);
    assert!(translator.requests()[1].bypass_cache);

    assert_eq!(sink.commits().len(), 3);
    let history = orchestrator.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "elves");
}

#[tokio::test]
async fn test_format_is_sent_as_filter() {
    let (orchestrator, translator, _) = setup(ScriptedTranslator::new());
    let options = SearchOptions {
        format: Some("pauper".to_string()),
        cache_salt: Some("v2".to_string()),
        ..Default::default()
    };
    orchestrator.search(RawQuery::new("elves"), options).await;

    let request = &translator.requests()[0];
    assert_eq!(request.filters.as_ref().unwrap().format.as_deref(), Some("pauper"));
    assert_eq!(request.cache_salt.as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_user_edited_result_is_sanitized() {
    let translator = ScriptedTranslator::new().reply(
        "t:elf foo:bar",
        Duration::ZERO,
        Reply::Grammar("t:elf foo:bar".to_string()),
    );
    let (orchestrator, _, _) = setup(translator);

    let edited = SearchOptions {
        user_edited: true,
        ..Default::default()
    };
    let outcome = orchestrator
        .search(RawQuery::new("t:elf foo:bar"), edited)
        .await;

    let commit = outcome.commit().unwrap();
    assert_eq!(commit.grammar_query, "t:elf");
    assert_eq!(
        commit.result.as_ref().unwrap().validation_issues,
        vec!["Unknown search key(s): foo"]
    );
}

#[tokio::test]
async fn test_fresh_translation_is_trusted() {
    let translator = ScriptedTranslator::new().reply(
        "elves",
        Duration::ZERO,
        Reply::Grammar("t:elf foo:bar".to_string()),
    );
    let (orchestrator, _, _) = setup(translator);

    let outcome = orchestrator
        .search(RawQuery::new("elves"), SearchOptions::default())
        .await;
    assert_eq!(outcome.commit().unwrap().grammar_query, "t:elf foo:bar");
}

// =============================================================================
// Edit and Re-run
// =============================================================================

#[tokio::test]
async fn test_rerun_rejects_invalid_without_commit() {
    let mut sink = MockSearchSink::new();
    sink.expect_on_search().never();
    sink.expect_notify()
        .withf(|notice| matches!(notice, Notice::InvalidQuery { .. }))
        .times(1)
        .return_const(());
    let orchestrator = SearchOrchestrator::new(
        Arc::new(ScriptedTranslator::new()),
        Arc::new(sink),
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator.rerun_edited("t:goblin bogus:1", &FilterHints::default());
    assert_eq!(
        outcome,
        RerunOutcome::Rejected {
            issues: vec!["Unknown search key(s): bogus".to_string()],
            sanitized: "t:goblin".to_string(),
        }
    );
    assert_eq!(orchestrator.current_token(), 0);
}

#[tokio::test]
async fn test_rerun_commits_deterministic_with_hints() {
    let (orchestrator, translator, sink) = setup(ScriptedTranslator::new());
    orchestrator
        .search(RawQuery::new("goblins"), SearchOptions::default())
        .await;

    let hints = FilterHints {
        colors: vec!["r".to_string()],
        mana_value: Some((0, 2)),
        ..Default::default()
    };
    let RerunOutcome::Committed(commit) = orchestrator.rerun_edited("t:goblin", &hints) else {
        panic!("expected a commit");
    };

    assert_eq!(commit.grammar_query, "t:goblin c:r mv<=2");
    assert_eq!(commit.token, 2);
    assert_eq!(commit.natural_query.as_deref(), Some("goblins"));
    assert_eq!(commit.result.as_ref().unwrap().source, Source::Deterministic);
    assert_eq!(translator.calls(), 1);
    assert_eq!(sink.commits().len(), 2);
    assert_eq!(orchestrator.context().unwrap().grammar_query, "t:goblin c:r mv<=2");
}

#[tokio::test]
async fn test_rerun_with_multi_word_hint_commits_term_once() {
    let (orchestrator, _, _) = setup(ScriptedTranslator::new());
    let hints = FilterHints {
        types: vec!["legendary creature".to_string()],
        ..Default::default()
    };

    let RerunOutcome::Committed(commit) = orchestrator.rerun_edited("c:g", &hints) else {
        panic!("expected a commit");
    };

    assert_eq!(commit.grammar_query, r#"c:g t:"legendary creature""#);
    assert_eq!(
        commit.result.as_ref().unwrap().grammar_query,
        commit.grammar_query
    );
}

#[tokio::test]
async fn test_rerun_rejects_empty() {
    let (orchestrator, _, sink) = setup(ScriptedTranslator::new());
    let outcome = orchestrator.rerun_edited("   ", &FilterHints::default());
    assert!(matches!(outcome, RerunOutcome::Rejected { .. }));
    assert!(sink.commits().is_empty());
}

// =============================================================================
// Shutdown and In-flight Tracking
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_in_flight_search() {
    let translator = ScriptedTranslator::new().reply(
        "elves",
        Duration::from_secs(5),
        Reply::Grammar("t:elf".to_string()),
    );
    let (orchestrator, _, sink) = setup(translator);

    let handle = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move {
            orchestrator
                .search(RawQuery::new("elves"), SearchOptions::default())
                .await
        }
    });
    tokio::task::yield_now().await;
    assert!(orchestrator.is_searching());

    orchestrator.shutdown();
    assert_eq!(handle.await.unwrap(), SearchOutcome::Aborted);
    assert!(!orchestrator.is_searching());
    assert!(sink.commits().is_empty());

    let after = orchestrator
        .search(RawQuery::new("goblins"), SearchOptions::default())
        .await;
    assert_eq!(after, SearchOutcome::Aborted);
}

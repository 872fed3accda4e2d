//! Search Orchestration
//!
//! The stateful loop between the UI and the translator: duplicate
//! suppression, deadline and shutdown races, rate-limit cooldown, and a
//! single token-checked commit per search.

pub mod history;
pub mod orchestrator;
pub mod rate_limit;
pub mod types;

pub use history::{HistoryEntry, SearchContext, SearchHistory};
pub use orchestrator::SearchOrchestrator;
pub use rate_limit::RateLimitWindow;
pub use types::{
    FilterHints, Notice, OrchestratorConfig, RawQuery, RerunOutcome, SearchCommit, SearchOptions,
    SearchOutcome, SearchSink,
};

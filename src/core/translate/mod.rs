//! Query Translation
//!
//! Natural language to grammar: the translator boundary the orchestrator
//! calls, its remote (HTTP) and embedded implementations, the generative
//! backend and the local fallback compiler.

pub mod fallback;
pub mod generator;
pub mod http;
pub mod service;
pub mod translator;
pub mod types;

pub use fallback::FallbackCompiler;
pub use generator::{ChatCompletionsGenerator, GeneratorConfig, QueryGenerator};
pub use http::HttpTranslator;
pub use service::{ServiceConfig, TranslationService};
pub use translator::{
    Result, TranslateError, TranslationFilters, TranslationRequest, TranslationResponse,
    Translator,
};
pub use types::{Explanation, SearchIntent, Source, TranslationResult};

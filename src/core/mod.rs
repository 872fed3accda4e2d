pub mod logging;

// Query grammar: vocabulary, tokenizer, sanitizing validator
pub mod grammar;

// Natural language to grammar: pattern tables and resolver
pub mod semantic;

// Translator boundary, embedded service, generator, local fallback
pub mod translate;

// Search orchestration (dedup, deadline, cooldown, token-checked commit)
pub mod search;

// Translate endpoint (axum)
pub mod server;

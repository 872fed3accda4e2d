//! Query Grammar
//!
//! Known vocabulary, tokenizer and the sanitizing validator for the
//! card-search filter grammar.

pub mod tokenizer;
pub mod validator;
pub mod vocabulary;

pub use tokenizer::{tokenize, GrammarToken, Group, Term};
pub use validator::{validate, GrammarValidator, ValidationOutcome};

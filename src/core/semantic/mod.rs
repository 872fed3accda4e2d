//! Semantic Mapping Engine
//!
//! Priority-ordered pattern tables (slang, tag-first concepts, archetypes,
//! cards-like, keyword abilities) and the resolver that applies them.

pub mod resolver;
pub mod tables;

pub use resolver::{
    referenced_tags, resolve, MappingMatch, MatchKind, Resolution, SemanticEngine,
};

//! Unit tests
//!
//! Scenario tests for components with async or stateful behavior. Pure
//! components keep their tests inline.

mod orchestrator_tests;

//! Crate-internal test suites
//!
//! - `mocks`: scripted translator and recording sink
//! - `property`: proptest invariants
//! - `unit`: orchestrator scenarios on a paused clock
//! - `integration`: HTTP translator against wiremock, and a live translate server

mod integration;
mod mocks;
mod property;
mod unit;

//! Property-based tests
//!
//! Invariants that must hold for all inputs, checked with proptest.
//!
//! ## Test Modules
//!
//! - `validator_props`: Grammar validator
//!   - Idempotent on arbitrary and grammar-shaped input
//!   - Top-level OR runs fold into exactly one group
//!   - Unknown keys are removed with an issue
//!   - Balanced parentheses in sanitized output
//!
//! - `fallback_props`: Fallback compiler
//!   - Deterministic, never blank for non-blank input
//!   - Never emits unknown keys
//!
//! By default, proptest runs 256 cases per property. Override with
//! `PROPTEST_CASES`:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod fallback_props;
mod validator_props;

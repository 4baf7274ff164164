//! Shared test utilities for docdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated test execution with temp directories
//! - Builder patterns for configurations and form submissions

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;

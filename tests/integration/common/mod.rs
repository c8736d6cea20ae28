//! Common utilities for integration tests.
//!
//! This module provides shared test infrastructure for LocalStack-based
//! integration testing, including client setup and test archive generation.

pub mod localstack;

pub use localstack::{event_message, osxcollector_archive, unique_name, LocalStackTestContext};

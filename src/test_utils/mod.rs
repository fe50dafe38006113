//! Test utilities for unit testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - An in-memory session gateway standing in for the auth endpoints

mod factories;
mod session_mocks;

pub use factories::*;
pub use session_mocks::*;

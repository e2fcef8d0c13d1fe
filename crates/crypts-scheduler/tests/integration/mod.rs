//! Integration test infrastructure.

pub mod common;

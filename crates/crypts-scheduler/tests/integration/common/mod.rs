//! Shared fixtures for scheduler tests.

pub mod market_page;

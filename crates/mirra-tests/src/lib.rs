//! Integration test suite for Mirra.
//!
//! Exercises the scoring engine, metric generator and anti-cheat checks
//! together over realistic app-state histories.

pub mod helpers;

//! Shared test helpers for `ias-adapter-core` integration tests.
//!
//! Lightweight in-memory fakes for the core ports plus fixtures for building
//! tenant mapping notifications.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

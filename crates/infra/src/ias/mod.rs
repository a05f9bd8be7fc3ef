//! IAS integration

pub mod client;

pub use client::IasRestClient;

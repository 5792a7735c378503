//! Core library components.
//!
//! This module contains the reusable logic: payload encryption, the secret
//! aggregate, credential storage, key bootstrap and the API client.

pub mod cipher;
pub mod client;
pub mod config;
pub mod constants;
pub mod domain;
pub mod keys;
pub mod store;
pub mod types;

//! HTTP client building for calls to the identity provider.

mod client;

pub use client::{HttpClientBuilder, HttpClientConfig};

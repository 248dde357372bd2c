//! # gateway-auth
//!
//! OAuth 2.0 / OIDC building blocks for the PKCE login gateway:
//! - PKCE verifier and S256 challenge generation
//! - Handshake state packing for the short-lived `authstate` cookie, optionally HMAC signed
//! - Authorization URL construction
//! - Authorization code exchange against the provider's token endpoint
//! - HTTP client building with a bounded request timeout
//!
//! ## Architecture
//!
//! This crate knows nothing about HTTP servers or cookie headers. The `domain` crate drives
//! the handshake state machine with these pieces and `web` maps the outcome onto responses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gateway_auth::{
//!     oauth::{HandshakeCodec, HandshakeState, PkceVerifier, Provider},
//!     oauth::providers::oidc,
//!     http::HttpClientBuilder,
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod signing;

// Re-export commonly used types
pub use error::{Error, ErrorKind};

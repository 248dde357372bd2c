//! OAuth provider implementations.

pub mod oidc;

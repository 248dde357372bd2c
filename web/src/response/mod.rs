//! Response bodies returned by the auth endpoints.

pub(crate) mod auth;

//! Error types for the `domain` layer.
use gateway_auth::error::{Error as GatewayAuthError, ErrorKind as GatewayAuthErrorKind};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` depends on `domain` but not directly on `gateway-auth`; the
/// `error_kind`s are what `web` uses to pick HTTP status codes and client messages.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Authorization(AuthorizationErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Reasons a login callback was rejected before any call to the provider.
/// All of these reach the client as the same generic 401.
#[derive(Debug, PartialEq)]
pub enum AuthorizationErrorKind {
    /// `code` or `state` absent from the callback query.
    MissingParameter(&'static str),
    /// No handshake cookie, or it already expired.
    MissingHandshake,
    /// Query `state` differs from the handshake cookie's state.
    StateMismatch,
    /// The handshake cookie could not be parsed or failed signature verification.
    MalformedState,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
/// Both variants surface as a failed token exchange.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The provider answered but rejected the exchange or sent an unusable body.
    TokenExchange,
    /// The provider could not be reached or did not answer in time.
    Network,
}

impl Error {
    pub fn authorization(kind: AuthorizationErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Authorization(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `gateway-auth` layer to the `domain` layer.
impl From<GatewayAuthError> for Error {
    fn from(err: GatewayAuthError) -> Self {
        let error_kind = match &err.error_kind {
            GatewayAuthErrorKind::Handshake(_) => {
                DomainErrorKind::Authorization(AuthorizationErrorKind::MalformedState)
            }
            GatewayAuthErrorKind::OAuth(_) => {
                DomainErrorKind::External(ExternalErrorKind::TokenExchange)
            }
            GatewayAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

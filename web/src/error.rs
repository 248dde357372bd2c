use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

use crate::response::auth::ErrorMessage;

extern crate log;
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Message for every rejected callback, whichever check failed.
pub(crate) const INVALID_AUTHORIZATION_MESSAGE: &str = "Authorization request is invalid";
/// Message for a failed code exchange.
pub(crate) const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed";
const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug)]
pub struct Error(DomainError);

impl Error {
    /// An internal error raised by the web layer itself.
    pub(crate) fn internal(message: &str) -> Self {
        Self(DomainError {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(message.to_string())),
        })
    }
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// The specific cause was already logged where it was detected; clients only get a generic message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.error_kind {
            DomainErrorKind::Authorization(_) => {
                (StatusCode::UNAUTHORIZED, INVALID_AUTHORIZATION_MESSAGE)
            }
            DomainErrorKind::External(_) => (StatusCode::BAD_REQUEST, AUTHENTICATION_FAILED_MESSAGE),
            DomainErrorKind::Internal(internal_error_kind) => {
                error!("Internal error: {:?}", internal_error_kind);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        };

        (
            status,
            Json(ErrorMessage {
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

//! Cookie policy for the handshake and session cookies.
//!
//! Both cookies are `HttpOnly` + `Secure` + `SameSite=Lax`. Lax is the strictest mode that still
//! sends the handshake cookie on the provider's top-level redirect back to the callback.

use std::time::Duration;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use cookie::{time, Cookie, SameSite};
use domain::{HANDSHAKE_COOKIE_NAME, HANDSHAKE_MAX_AGE};
use log::*;
use service::config::Config;

use crate::error::Error;

/// Path the handshake cookie is scoped to; covers `/auth/login/callback`.
pub(crate) const HANDSHAKE_COOKIE_PATH: &str = "/auth/login";

/// The `authstate` cookie carrying packed handshake state for five minutes.
pub(crate) fn handshake_cookie(value: String) -> Cookie<'static> {
    Cookie::build((HANDSHAKE_COOKIE_NAME, value))
        .path(HANDSHAKE_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(to_cookie_duration(HANDSHAKE_MAX_AGE))
        .build()
}

/// Expires the handshake cookie immediately.
pub(crate) fn clear_handshake_cookie() -> Cookie<'static> {
    Cookie::build((HANDSHAKE_COOKIE_NAME, ""))
        .path(HANDSHAKE_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// The session cookie carrying the access token.
///
/// Without `max_age` the cookie lasts for the browser session.
pub(crate) fn session_cookie(
    config: &Config,
    access_token: String,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut builder = Cookie::build((config.cookie_name().to_string(), access_token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);

    if let Some(domain) = config.cookie_domain() {
        builder = builder.domain(domain.to_string());
    }
    if let Some(max_age) = max_age {
        builder = builder.max_age(to_cookie_duration(max_age));
    }

    builder.build()
}

/// Expires the session cookie immediately. Name, path and domain match `session_cookie`.
pub(crate) fn clear_session_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new(), None);
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// Read the value of cookie `name` from the request headers.
///
/// Values are percent-decoded. Malformed cookies are skipped.
pub(crate) fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(|cookie| match cookie {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                debug!("Ignoring malformed cookie: {e}");
                None
            }
        })
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Append `cookie` as a percent-encoded `Set-Cookie` header.
pub(crate) fn append(headers: &mut HeaderMap, cookie: &Cookie<'_>) -> Result<(), Error> {
    let value = HeaderValue::from_str(&cookie.encoded().to_string())
        .map_err(|_| Error::internal("Invalid Set-Cookie header value"))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

fn to_cookie_duration(duration: Duration) -> time::Duration {
    time::Duration::seconds(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
}

//! Controller for the PKCE login handshake.
//!
//! `login` hands the browser a handshake cookie and the provider's authorization URL,
//! `callback` authenticates the provider's redirect back and sets the session cookie,
//! `logout` drops the session cookie.
//!
//! These endpoints are reached through browser redirects, so responses are content-negotiated:
//! browsers get a page, API clients get JSON.

use crate::error::Error;
use crate::negotiate::ResponseFormat;
use crate::params::auth::{CallbackParams, LoginParams};
use crate::response::auth::{CallbackResponse, ErrorMessage, LoginResponse};
use crate::{cookies, views, AppState};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use domain::{callback, login, HANDSHAKE_COOKIE_NAME};
use log::*;
use secrecy::ExposeSecret;

/// GET start a login
#[utoipa::path(
    get,
    path = "/auth/login",
    params(LoginParams),
    responses(
        (status = 200, description = "Authorization URL to send the user to; sets the `authstate` cookie", body = LoginResponse),
        (status = 302, description = "Redirect to the identity provider when redirect mode is enabled"),
        (status = 500, description = "Internal Server Error", body = ErrorMessage),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    request_headers: HeaderMap,
    params: Result<Query<LoginParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params.unwrap_or_else(|rejection| {
        debug!("Ignoring unparsable login query: {rejection}");
        Query(LoginParams::default())
    });

    let start = login::begin(
        app_state.provider(),
        app_state.handshake_codec(),
        params.origin_url,
    )?;

    let mut headers = HeaderMap::new();
    cookies::append(&mut headers, &cookies::handshake_cookie(start.handshake_cookie))?;

    if app_state.config.login_redirect {
        return found(headers, &start.login_url);
    }

    Ok(match ResponseFormat::from_headers(&request_headers) {
        ResponseFormat::Html => (headers, Html(views::login_page(&start.login_url))).into_response(),
        ResponseFormat::Json => (
            headers,
            Json(LoginResponse {
                login_url: start.login_url,
            }),
        )
            .into_response(),
    })
}

/// GET the identity provider's redirect back after login
///
/// Every rejected callback, whatever the cause, gets the same 401 body.
#[utoipa::path(
    get,
    path = "/auth/login/callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Logged in; sets the session cookie", body = CallbackResponse),
        (status = 302, description = "Logged in; redirect to the origin URL captured at login"),
        (status = 400, description = "Code exchange with the identity provider failed", body = ErrorMessage),
        (status = 401, description = "Missing parameters, missing or expired handshake, or state mismatch", body = ErrorMessage),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    request_headers: HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params.unwrap_or_else(|rejection| {
        debug!("Ignoring unparsable callback query: {rejection}");
        Query(CallbackParams::default())
    });
    let handshake_cookie = cookies::read_cookie(&request_headers, HANDSHAKE_COOKIE_NAME);

    let outcome = callback::complete(
        app_state.provider(),
        app_state.handshake_codec(),
        params.into(),
        handshake_cookie.as_deref(),
    )
    .await;

    // The handshake is single use, whatever the outcome.
    let mut headers = HeaderMap::new();
    cookies::append(&mut headers, &cookies::clear_handshake_cookie())?;

    let grant = match outcome {
        Ok(grant) => grant,
        Err(e) => return Ok((headers, Error::from(e)).into_response()),
    };

    let config = &app_state.config;
    cookies::append(
        &mut headers,
        &cookies::session_cookie(
            config,
            grant.access_token.expose_secret().to_string(),
            grant.max_age,
        ),
    )?;

    if config.login_redirect && grant.origin_captured {
        return found(headers, &grant.redirect_url);
    }

    Ok(match ResponseFormat::from_headers(&request_headers) {
        ResponseFormat::Html => (
            headers,
            Html(views::callback_page(
                config.cookie_name(),
                &grant.redirect_url,
                &grant.infos,
            )),
        )
            .into_response(),
        ResponseFormat::Json => (
            headers,
            Json(CallbackResponse {
                infos: grant.infos,
                cookie_name: config.cookie_name().to_string(),
                redirect_url: grant.redirect_url,
            }),
        )
            .into_response(),
    })
}

/// GET end the session
///
/// Only clears the session cookie; the token is not revoked at the provider.
#[utoipa::path(
    get,
    path = "/auth/logout",
    responses(
        (status = 302, description = "Session cookie cleared, redirect to `/`"),
    )
)]
pub async fn logout(State(app_state): State<AppState>) -> Result<Response, Error> {
    let mut headers = HeaderMap::new();
    cookies::append(
        &mut headers,
        &cookies::clear_session_cookie(&app_state.config),
    )?;
    found(headers, "/")
}

fn found(mut headers: HeaderMap, location: &str) -> Result<Response, Error> {
    let location =
        HeaderValue::from_str(location).map_err(|_| Error::internal("Invalid redirect location"))?;
    headers.insert(LOCATION, location);
    Ok((StatusCode::FOUND, headers).into_response())
}

use crate::{cookies, views, AppState};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use domain::session;

/// GET the landing page
///
/// Shows the claims of the current session's access token when it is a JWT. The claims are
/// decoded for display only and never verified.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page", content_type = "text/html", body = String),
    )
)]
pub async fn index(State(app_state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let claims = cookies::read_cookie(&headers, app_state.config.cookie_name())
        .and_then(|token| session::decode_claims(&token));

    Html(views::home_page(claims.as_ref()))
}

use crate::controller::{auth_controller, health_check_controller, home_controller};
use crate::middleware::request_log::log_request;
use crate::response::auth::{CallbackResponse, ErrorMessage, LoginResponse};
use crate::AppState;

use axum::{
    http::{
        header::{self, HeaderValue},
        Method,
    },
    middleware::from_fn,
    routing::get,
    Router,
};
use log::*;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "PKCE Login Gateway"
        ),
        paths(
            auth_controller::login,
            auth_controller::callback,
            auth_controller::logout,
            home_controller::index,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                LoginResponse,
                CallbackResponse,
                ErrorMessage,
            )
        ),
        tags(
            (name = "pkce_gateway", description = "OAuth2 authorization code + PKCE login gateway")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let mut router = Router::new()
        .merge(auth_routes(app_state.clone()))
        .merge(home_routes(app_state.clone()))
        .merge(health_routes());

    if !app_state.config.is_production() {
        router = router
            .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"));
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(&app_state.config.allowed_origins))
        .layer(from_fn(log_request))
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", get(auth_controller::login))
        .route("/auth/login/callback", get(auth_controller::callback))
        .route("/auth/logout", get(auth_controller::logout))
        .with_state(app_state)
}

fn home_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home_controller::index))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .allow_credentials(true)
}

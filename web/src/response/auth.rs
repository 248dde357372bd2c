use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Body returned by `GET /auth/login` to non-HTML clients
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    /// Provider authorization URL to send the user to
    pub(crate) login_url: String,
}

/// Body returned by a successful `GET /auth/login/callback` to non-HTML clients
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallbackResponse {
    /// The identity provider's token response, unchanged
    #[schema(value_type = Object)]
    pub(crate) infos: Map<String, Value>,
    /// Name of the cookie now holding the access token
    pub(crate) cookie_name: String,
    /// Where the user should continue
    pub(crate) redirect_url: String,
}

/// Generic error body; never says which check failed
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorMessage {
    pub(crate) message: String,
}

use domain::callback::CallbackRequest;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for starting a login
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct LoginParams {
    /// Relative path to return to after a successful login
    #[serde(rename = "originUrl")]
    #[param(example = "/dashboard")]
    pub(crate) origin_url: Option<String>,
}

/// Query parameters the identity provider appends to the callback redirect
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackParams {
    /// Authorization code to exchange
    pub(crate) code: Option<String>,
    /// Anti-forgery state issued at login
    pub(crate) state: Option<String>,
    /// Error code sent instead of `code` when the login was aborted
    pub(crate) error: Option<String>,
    pub(crate) error_description: Option<String>,
}

impl From<CallbackParams> for CallbackRequest {
    fn from(params: CallbackParams) -> Self {
        CallbackRequest {
            code: params.code,
            state: params.state,
            error: params.error,
            error_description: params.error_description,
        }
    }
}

use crate::AppState;
use clap::Parser;
use service::config::Config;

pub(crate) const SIGNING_KEY: &str = "test-handshake-signing-key";

/// Gateway configuration pointing its token endpoint at `token_url`.
pub(crate) fn config(token_url: &str, extra: &[&str]) -> Config {
    let mut args = vec![
        "pkce_gateway",
        "--openid-client-id",
        "gateway-client",
        "--openid-redirect-url",
        "https://gateway.example.com/auth/login/callback",
        "--openid-auth-url",
        "https://idp.example.com/authorize",
        "--openid-token-url",
        token_url,
    ];
    args.extend_from_slice(extra);
    Config::parse_from(args)
}

pub(crate) fn app_state(config: Config) -> AppState {
    AppState::new(config).unwrap()
}

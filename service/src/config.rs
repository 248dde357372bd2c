use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default name of the cookie carrying the access token after a successful login.
pub const DEFAULT_COOKIE_NAME: &str = "access_token";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The OAuth client ID registered with the identity provider
    #[arg(long, env)]
    openid_client_id: String,

    /// The redirect URI registered with the identity provider; must route to /auth/login/callback
    #[arg(long, env)]
    openid_redirect_url: Url,

    /// The identity provider's authorization endpoint
    #[arg(long, env)]
    openid_auth_url: Url,

    /// The identity provider's token endpoint
    #[arg(long, env)]
    openid_token_url: Url,

    /// Space separated scopes requested at the authorization endpoint
    #[arg(long, env, default_value = "openid")]
    openid_scope: String,

    /// Name of the cookie that carries the access token after login
    #[arg(long, env, default_value = DEFAULT_COOKIE_NAME)]
    cookie_name: String,

    /// Domain the session cookie is scoped to. Host-only when unset.
    #[arg(long, env)]
    cookie_domain: Option<String>,

    /// Redirect the browser instead of returning the login URL / token details
    #[arg(long, env, default_value_t = false, action = clap::ArgAction::Set)]
    pub login_redirect: bool,

    /// Secret used to HMAC sign the handshake cookie. Unsigned when unset.
    #[arg(long, env, hide_env_values = true, value_parser = parse_secret)]
    handshake_signing_key: Option<SecretString>,

    /// Timeout in seconds for the authorization code exchange with the token endpoint
    #[arg(long, env, default_value_t = 10)]
    pub token_request_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn openid_client_id(&self) -> &str {
        &self.openid_client_id
    }

    pub fn openid_redirect_url(&self) -> &Url {
        &self.openid_redirect_url
    }

    pub fn openid_auth_url(&self) -> &Url {
        &self.openid_auth_url
    }

    pub fn openid_token_url(&self) -> &Url {
        &self.openid_token_url
    }

    pub fn openid_scope(&self) -> &str {
        &self.openid_scope
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain.as_deref()
    }

    /// Returns the handshake signing key, if configured.
    pub fn handshake_signing_key(&self) -> Option<&SecretString> {
        self.handshake_signing_key.as_ref()
    }

    pub fn token_request_timeout(&self) -> Duration {
        Duration::from_secs(self.token_request_timeout_secs)
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

fn parse_secret(value: &str) -> Result<SecretString, std::convert::Infallible> {
    Ok(SecretString::new(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const REQUIRED: [&str; 9] = [
        "pkce_gateway",
        "--openid-client-id",
        "gateway-client",
        "--openid-redirect-url",
        "https://gateway.example.com/auth/login/callback",
        "--openid-auth-url",
        "https://idp.example.com/authorize",
        "--openid-token-url",
        "https://idp.example.com/token",
    ];

    fn parse_with(extra: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(REQUIRED.iter().chain(extra.iter()))
    }

    #[test]
    fn test_required_provider_settings() {
        let config = parse_with(&[]).unwrap();
        assert_eq!(config.openid_client_id(), "gateway-client");
        assert_eq!(
            config.openid_redirect_url().as_str(),
            "https://gateway.example.com/auth/login/callback"
        );
        assert_eq!(config.openid_auth_url().path(), "/authorize");
        assert_eq!(config.openid_token_url().path(), "/token");
    }

    #[test]
    fn test_defaults() {
        let config = parse_with(&[]).unwrap();
        assert_eq!(config.openid_scope(), "openid");
        assert_eq!(config.cookie_name(), DEFAULT_COOKIE_NAME);
        assert_eq!(config.cookie_domain(), None);
        assert!(!config.login_redirect);
        assert!(config.handshake_signing_key().is_none());
        assert_eq!(config.token_request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_debug_output_redacts_signing_key() {
        let config = parse_with(&["--handshake-signing-key", "do-not-log-me"]).unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("do-not-log-me"));
        assert!(debug.contains("handshake_signing_key"));
    }

    #[test]
    fn test_overrides() {
        let config = parse_with(&[
            "--cookie-name",
            "session",
            "--cookie-domain",
            "example.com",
            "--login-redirect",
            "true",
            "--handshake-signing-key",
            "secret",
            "--token-request-timeout-secs",
            "3",
            "--runtime-env",
            "PRODUCTION",
            "--log-level-filter",
            "DEBUG",
        ])
        .unwrap();

        assert_eq!(config.cookie_name(), "session");
        assert_eq!(config.cookie_domain(), Some("example.com"));
        assert!(config.login_redirect);
        assert_eq!(
            config
                .handshake_signing_key()
                .map(|key| key.expose_secret().as_str()),
            Some("secret")
        );
        assert_eq!(config.token_request_timeout(), Duration::from_secs(3));
        assert!(config.is_production());
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_endpoint_url_is_rejected() {
        let result = Config::try_parse_from([
            "pkce_gateway",
            "--openid-client-id",
            "gateway-client",
            "--openid-redirect-url",
            "not a url",
            "--openid-auth-url",
            "https://idp.example.com/authorize",
            "--openid-token-url",
            "https://idp.example.com/token",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_runtime_env_from_str() {
        assert_eq!("Staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));
        assert_eq!(RustEnv::Production.to_string(), "production");
    }
}

use crate::models::TemplateVersion;
use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;
use std::str::FromStr;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub genai: GenaiConfig,
    pub analysis: AnalysisConfig,
    pub auth: AuthConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenaiConfig {
    pub provider: ProviderKind,
    pub api_key: Secret<String>,
    pub text_model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub template_version: TemplateVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Endpoint returning the user behind a bearer token (remote mode).
    pub user_url: Option<String>,
    /// Project key some identity backends require next to the bearer token.
    pub api_key: Option<Secret<String>>,
    /// HS256 secret for locally verified tokens (jwt mode).
    pub jwt_secret: Option<Secret<String>>,
    pub jwt_audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

/// Which generative model backend to call.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Mock,
}

/// How bearer credentials are verified.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Delegate to the identity backend's user endpoint.
    Remote,
    /// Verify HS256-signed tokens locally.
    Jwt,
}

impl AssessmentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let provider: ProviderKind = parse(get_env("GENAI_PROVIDER", Some("gemini"), is_prod)?)?;
        let api_key = match provider {
            ProviderKind::Gemini => get_env("GOOGLE_API_KEY", None, is_prod)?,
            ProviderKind::Mock => get_optional_env("GOOGLE_API_KEY").unwrap_or_default(),
        };

        let mode: AuthMode = parse(get_env("AUTH_MODE", Some("remote"), is_prod)?)?;
        let (user_url, jwt_secret) = match mode {
            AuthMode::Remote => (Some(get_env("AUTH_USER_URL", None, is_prod)?), None),
            AuthMode::Jwt => (
                None,
                Some(Secret::new(get_env("AUTH_JWT_SECRET", None, is_prod)?)),
            ),
        };

        Ok(AssessmentConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("psycheprep"), is_prod)?,
            },
            genai: GenaiConfig {
                provider,
                api_key: Secret::new(api_key),
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
            },
            analysis: AnalysisConfig {
                template_version: parse(get_env(
                    "ANALYSIS_TEMPLATE_VERSION",
                    Some("v2"),
                    is_prod,
                )?)?,
            },
            auth: AuthConfig {
                mode,
                user_url,
                api_key: get_optional_env("AUTH_API_KEY").map(Secret::new),
                jwt_secret,
                jwt_audience: get_optional_env("AUTH_JWT_AUDIENCE"),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(format!("Invalid GenAI provider: {}", s)),
        }
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(AuthMode::Remote),
            "jwt" => Ok(AuthMode::Jwt),
            _ => Err(format!("Invalid auth mode: {}", s)),
        }
    }
}

fn parse<T: FromStr<Err = String>>(value: String) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))
}

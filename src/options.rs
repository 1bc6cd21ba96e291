//! Client configuration: caller-facing options and the resolved, immutable config.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::client::ClientError;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SHUTTLEAI_API_KEY";
/// Environment variable holding the API base URL.
pub const API_BASE_ENV: &str = "SHUTTLEAI_API_BASE";
/// Base URL used when neither an explicit value nor the environment provides one.
pub const DEFAULT_API_BASE: &str = "https://api.shuttleai.com/v1";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const OFFICIAL_HOSTS: [&str; 2] = ["shuttleai.com", "shuttleai.app"];
const OPENAI_HOST: &str = "api.openai.com";

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Options supplied by the caller when constructing a client.
///
/// Every field is optional; anything left unset is filled in by
/// [`ClientConfig::resolve`] from the environment or the built-in defaults.
///
/// # Example
/// ```rust
/// use shuttleai::options::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .with_api_key("sk-...")
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// API key for authentication
    pub api_key: Option<SecretString>,

    /// Base URL for API endpoints, including the version prefix
    pub base_url: Option<String>,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// One default model per resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultModels {
    pub chat: String,
    pub image: String,
    pub video: String,
    pub audio_speech: String,
    pub audio_transcription: String,
    pub embedding: String,
    pub moderation: String,
}

impl DefaultModels {
    /// Models served by the ShuttleAI API itself.
    pub fn official() -> Self {
        Self {
            chat: "shuttle-3.5".to_string(),
            image: "shuttle-jaguar".to_string(),
            video: "sora".to_string(),
            audio_speech: "eleven_turbo_v2_5".to_string(),
            audio_transcription: "whisper-large-v3".to_string(),
            embedding: "text-embedding-3-small".to_string(),
            moderation: "text-moderation-latest".to_string(),
        }
    }

    /// Models for OpenAI-compatible services that are not ShuttleAI.
    pub fn compatible() -> Self {
        Self {
            chat: "gpt-4o-mini".to_string(),
            image: "dall-e-3".to_string(),
            audio_speech: "whisper-1".to_string(),
            audio_transcription: "whisper-1".to_string(),
            ..Self::official()
        }
    }

    /// Pick the default set matching the configured base URL.
    pub fn for_base_url(base_url: &str) -> Self {
        if is_official_base_url(base_url) {
            Self::official()
        } else {
            Self::compatible()
        }
    }
}

/// Diagnostic raised once at construction when the base URL is not the
/// official ShuttleAI endpoint. The call is never blocked by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlNotice {
    /// The OpenAI API itself; the official OpenAI SDK is the better fit there.
    OpenAi,
    /// Any other third-party host.
    Unverified,
}

impl BaseUrlNotice {
    pub fn for_base_url(base_url: &str) -> Option<Self> {
        if is_official_base_url(base_url) {
            None
        } else if base_url.contains(OPENAI_HOST) {
            Some(Self::OpenAi)
        } else {
            Some(Self::Unverified)
        }
    }
}

impl fmt::Display for BaseUrlNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUrlNotice::OpenAi => write!(
                f,
                "using the OpenAI API URL; this library is not meant to replace the OpenAI SDK \
                 (official ShuttleAI URL: {DEFAULT_API_BASE})"
            ),
            BaseUrlNotice::Unverified => write!(
                f,
                "using an unofficial, unverified non-ShuttleAI URL; requests and data go to a \
                 third party (official ShuttleAI URL: {DEFAULT_API_BASE})"
            ),
        }
    }
}

fn is_official_base_url(base_url: &str) -> bool {
    OFFICIAL_HOSTS.iter().any(|host| base_url.contains(host))
}

/// Fully resolved client configuration. Read-only after construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub extra_headers: HashMap<String, String>,
    pub default_models: DefaultModels,
    pub notice: Option<BaseUrlNotice>,
}

impl ClientConfig {
    /// Resolve options against the process environment.
    pub fn resolve(options: ClientOptions) -> Result<Self, ClientError> {
        Self::resolve_with(options, |key| std::env::var(key).ok())
    }

    /// Resolve options with an explicit environment lookup.
    ///
    /// Order is explicit option, then environment, then default. A missing
    /// API key fails here, before any network activity.
    pub fn resolve_with<F>(options: ClientOptions, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = options
            .api_key
            .filter(|key| !key.is_blank())
            .or_else(|| {
                lookup(API_KEY_ENV)
                    .map(SecretString::new)
                    .filter(|key| !key.is_blank())
            })
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "API key not provided; pass one explicitly or set {API_KEY_ENV}"
                ))
            })?;

        let base_url = options
            .base_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| lookup(API_BASE_ENV).filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            default_models: DefaultModels::for_base_url(&base_url),
            notice: BaseUrlNotice::for_base_url(&base_url),
            api_key,
            base_url,
            timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
            proxy: options.proxy,
            extra_headers: options.extra_headers.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = ClientConfig::resolve_with(ClientOptions::new(), no_env);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_blank_api_key_falls_back_to_env() {
        let options = ClientOptions::new().with_api_key("   ");
        let config = ClientConfig::resolve_with(options, |key| {
            (key == API_KEY_ENV).then(|| "env-key".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key.expose_secret(), "env-key");
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let options = ClientOptions::new()
            .with_api_key("explicit")
            .with_base_url("https://api.shuttleai.app/v1/");
        let config = ClientConfig::resolve_with(options, |key| match key {
            API_KEY_ENV => Some("env-key".to_string()),
            API_BASE_ENV => Some("https://example.com/v1".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_key.expose_secret(), "explicit");
        assert_eq!(config.base_url, "https://api.shuttleai.app/v1");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.notice, None);
    }

    #[test]
    fn test_default_base_url_uses_official_models() {
        let options = ClientOptions::new().with_api_key("key");
        let config = ClientConfig::resolve_with(options, no_env).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.default_models, DefaultModels::official());
        assert_eq!(config.default_models.chat, "shuttle-3.5");
    }

    #[test]
    fn test_third_party_base_url_switches_defaults_and_warns() {
        let options = ClientOptions::new()
            .with_api_key("key")
            .with_base_url("https://api.openai.com/v1");
        let config = ClientConfig::resolve_with(options, no_env).unwrap();
        assert_eq!(config.default_models.chat, "gpt-4o-mini");
        assert_eq!(config.default_models.image, "dall-e-3");
        assert_eq!(config.notice, Some(BaseUrlNotice::OpenAi));

        let notice = BaseUrlNotice::for_base_url("http://127.0.0.1:8080");
        assert_eq!(notice, Some(BaseUrlNotice::Unverified));
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let secret = SecretString::from("sk-live");
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
    }
}

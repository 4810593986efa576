//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_PROMO_CODE` - Promo code accepted at checkout (default: discount20)
//! - `STOREFRONT_PROMO_PERCENT` - Promo discount, 1-100 (default: 20)
//! - `STOREFRONT_PROMO_DELAY_MS` - Artificial promo check latency (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::pricing::{DEFAULT_PROMO_CODE, DEFAULT_PROMO_PERCENT, PromoPolicy};

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Checkout promo code
    pub promo: PromoConfig,
    /// Error tracking
    pub sentry: SentryConfig,
}

/// Promo code settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoConfig {
    pub code: String,
    /// Percentage off the subtotal, 1-100
    pub percent: u32,
    /// Simulated latency of the promo check
    pub delay: Duration,
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            code: DEFAULT_PROMO_CODE.to_string(),
            percent: DEFAULT_PROMO_PERCENT,
            delay: Duration::ZERO,
        }
    }
}

impl PromoConfig {
    /// Build the pricing policy for these settings.
    #[must_use]
    pub fn policy(&self) -> PromoPolicy {
        PromoPolicy::new(&self.code, self.percent).with_delay(self.delay)
    }
}

/// Sentry settings.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env.database_url("STOREFRONT_DATABASE_URL")?;
        let host: IpAddr = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port: u16 = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;
        let session_secret = env.validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let promo = PromoConfig::from_env(&env)?;
        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            promo,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be `Secure`.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl PromoConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let code = env.or_default("STOREFRONT_PROMO_CODE", DEFAULT_PROMO_CODE);
        if code.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PROMO_CODE".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let percent: u32 =
            env.parse_or("STOREFRONT_PROMO_PERCENT", &DEFAULT_PROMO_PERCENT.to_string())?;
        if !(1..=100).contains(&percent) {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PROMO_PERCENT".to_string(),
                format!("must be between 1 and 100 (got {percent})"),
            ));
        }

        let delay_ms: u64 = env.parse_or("STOREFRONT_PROMO_DELAY_MS", "0")?;

        Ok(Self {
            code,
            percent,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the typed accessors used while loading.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional environment variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a required environment variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an environment variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, using `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_source(|key| vars.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STOREFRONT_DATABASE_URL", "postgres://localhost/emerald"),
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("STOREFRONT_SESSION_SECRET", STRONG_SECRET),
        ]
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(&minimal()).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.promo, PromoConfig::default());
        assert!(config.sentry.dsn.is_none());
        assert!(!config.is_https());
    }

    #[test]
    fn test_database_url_fallback() {
        let vars = [
            ("DATABASE_URL", "postgres://fly/emerald"),
            ("STOREFRONT_BASE_URL", "https://shop.example.com"),
            ("STOREFRONT_SESSION_SECRET", STRONG_SECRET),
        ];
        let config = load(&vars).unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://fly/emerald");
        assert!(config.is_https());
    }

    #[test]
    fn test_missing_required_var() {
        let err = load(&minimal()[..2]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "STOREFRONT_SESSION_SECRET"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = minimal();
        vars.push(("STOREFRONT_PORT", "http"));
        assert!(matches!(load(&vars).unwrap_err(), ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_promo_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("STOREFRONT_PROMO_CODE", "SPRING"),
            ("STOREFRONT_PROMO_PERCENT", "15"),
            ("STOREFRONT_PROMO_DELAY_MS", "1000"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.promo.percent, 15);
        assert_eq!(config.promo.delay, Duration::from_secs(1));
        let policy = config.promo.policy();
        assert_eq!(policy.code(), "spring");
    }

    #[test]
    fn test_promo_percent_out_of_range() {
        for bad in ["0", "101"] {
            let mut vars = minimal();
            vars.push(("STOREFRONT_PROMO_PERCENT", bad));
            assert!(matches!(load(&vars).unwrap_err(), ConfigError::InvalidEnvVar(_, _)));
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-api-key-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let err = validate_secret_strength(&"a".repeat(33), "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(STRONG_SECRET, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_short_session_secret_rejected() {
        let mut vars = minimal();
        vars[2] = ("STOREFRONT_SESSION_SECRET", "aB3$xY9!mK2@nL5#");
        assert!(matches!(load(&vars).unwrap_err(), ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&minimal()).unwrap();
        let debug_output = format!("{config:?}");

        assert!(!debug_output.contains(STRONG_SECRET));
        assert!(!debug_output.contains("postgres://localhost/emerald"));
        assert!(debug_output.contains("http://localhost:3000"));
    }
}

use secrecy::{ExposeSecret, SecretString};
use service_core::config::Config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid environment: {}. Must be dev or prod",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_key: SecretString,
    pub signed_url_ttl_secs: u32,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub nlp_model: String,
    pub vision_model: String,
    pub transcribe_model: String,
    /// Per-request timeout for text completions.
    pub text_timeout_ms: u64,
    /// Per-request timeout for vision and transcription calls.
    pub media_timeout_ms: u64,
    pub stt_max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: SecretString,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub allowed_emails: Vec<String>,
    pub passphrase: SecretString,
    pub household_slug: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub nlp_per_minute: u32,
    pub scan_per_minute: u32,
    pub stt_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct FeatureFlags {
    pub scan_cache: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub common: Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub openai: OpenAiConfig,
    pub session: SessionConfig,
    pub login: LoginConfig,
    pub rate_limit: RateLimitConfig,
    pub features: FeatureFlags,
    pub security: SecurityConfig,
}

impl InventoryConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = Config::load()?;

        let environment = get_env("ENVIRONMENT", Some("dev"), false)?.parse::<Environment>()?;
        let is_prod = environment == Environment::Prod;

        // OPENAI_TIMEOUT_MS overrides both profiles; the defaults differ.
        let timeout_override = env::var("OPENAI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        let config = Self {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("inventory-service"), false)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            database: DatabaseConfig {
                url: get_env(
                    "DATABASE_URL",
                    Some("postgres://localhost:5432/inventory"),
                    is_prod,
                )?,
                max_connections: get_env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: get_env_parse("DATABASE_MIN_CONNECTIONS", 1)?,
            },
            storage: StorageConfig {
                url: get_env("STORAGE_URL", Some("http://localhost:54321"), is_prod)?,
                service_key: SecretString::new(get_env(
                    "STORAGE_SERVICE_KEY",
                    Some("dev-service-key"),
                    is_prod,
                )?),
                signed_url_ttl_secs: get_env_parse("STORAGE_SIGNED_URL_TTL_SECS", 300)?,
            },
            openai: OpenAiConfig {
                api_key: SecretString::new(get_env(
                    "OPENAI_API_KEY",
                    Some("dev-openai-key"),
                    is_prod,
                )?),
                base_url: get_env("OPENAI_BASE_URL", Some("https://api.openai.com/v1"), false)?,
                nlp_model: get_env("OPENAI_NLP_MODEL", Some("gpt-4o-mini"), false)?,
                vision_model: get_env("OPENAI_VISION_MODEL", Some("gpt-4o-mini"), false)?,
                transcribe_model: get_env(
                    "OPENAI_TRANSCRIBE_MODEL",
                    Some("gpt-4o-mini-transcribe"),
                    false,
                )?,
                text_timeout_ms: timeout_override.unwrap_or(15_000),
                media_timeout_ms: timeout_override.unwrap_or(20_000),
                stt_max_bytes: get_env_parse("STT_MAX_BYTES", 10_000_000)?,
            },
            session: SessionConfig {
                jwt_secret: SecretString::new(get_env(
                    "JWT_SECRET",
                    Some("dev-session-secret-change-me"),
                    is_prod,
                )?),
                ttl_hours: get_env_parse("SESSION_TTL_HOURS", 12)?,
            },
            login: LoginConfig {
                allowed_emails: split_email_list(&get_env("ALLOWED_EMAILS", Some(""), is_prod)?),
                passphrase: SecretString::new(get_env("LOGIN_PASSPHRASE", Some(""), is_prod)?),
                household_slug: get_env("HOUSEHOLD_SLUG", Some("old-rectory"), false)?,
            },
            rate_limit: RateLimitConfig {
                nlp_per_minute: get_env_parse("RATE_LIMIT_NLP_PER_MINUTE", 10)?,
                scan_per_minute: get_env_parse("RATE_LIMIT_SCAN_PER_MINUTE", 5)?,
                stt_per_minute: get_env_parse("RATE_LIMIT_STT_PER_MINUTE", 10)?,
            },
            features: FeatureFlags {
                scan_cache: parse_flag("FEATURE_SCAN_CACHE", true),
            },
            security: SecurityConfig {
                allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:8888"), false)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.session.ttl_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_TTL_HOURS must be positive"
            )));
        }
        if self.rate_limit.nlp_per_minute == 0
            || self.rate_limit.scan_per_minute == 0
            || self.rate_limit.stt_per_minute == 0
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Rate limits must be at least 1 per minute"
            )));
        }
        if self.openai.stt_max_bytes == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "STT_MAX_BYTES must be positive"
            )));
        }
        if self.environment == Environment::Prod {
            if self.session.jwt_secret.expose_secret().len() < 32 {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET must be at least 32 characters in production"
                )));
            }
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard ALLOWED_ORIGINS is not permitted in production"
                )));
            }
        }
        Ok(())
    }
}

/// Reads an environment variable. A missing variable falls back to the
/// default in dev and is an error in prod when no default is acceptable.
fn get_env(key: &str, default: Option<&str>, required: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => {
            if required {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Missing required environment variable: {}",
                    key
                )));
            }
            default.map(|d| d.to_string()).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Missing environment variable: {}",
                    key
                ))
            })
        }
    }
}

fn get_env_parse<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(value) if !value.is_empty() => value.parse::<T>().map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, value))
        }),
        _ => Ok(default),
    }
}

/// Boolean feature flags accept "true" or "1", case-insensitively.
fn parse_flag(key: &str, default_val: bool) -> bool {
    match env::var(key) {
        Ok(value) => {
            let value = value.to_lowercase();
            value == "true" || value == "1"
        }
        Err(_) => default_val,
    }
}

/// Allow-list entries may be separated by commas or whitespace.
fn split_email_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_returns_value_when_present() {
        env::set_var("INVENTORY_TEST_GET_ENV", "present");
        assert_eq!(
            get_env("INVENTORY_TEST_GET_ENV", Some("fallback"), false).unwrap(),
            "present"
        );
        env::remove_var("INVENTORY_TEST_GET_ENV");
    }

    #[test]
    fn get_env_falls_back_to_default() {
        assert_eq!(
            get_env("INVENTORY_TEST_MISSING_VAR", Some("fallback"), false).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn get_env_errors_when_required_and_missing() {
        let err = get_env("INVENTORY_TEST_REQUIRED_VAR", Some("fallback"), true);
        assert!(err.is_err());
    }

    #[test]
    fn parse_flag_accepts_true_and_one() {
        env::set_var("INVENTORY_TEST_FLAG_TRUE", "TRUE");
        env::set_var("INVENTORY_TEST_FLAG_ONE", "1");
        env::set_var("INVENTORY_TEST_FLAG_OFF", "false");
        assert!(parse_flag("INVENTORY_TEST_FLAG_TRUE", false));
        assert!(parse_flag("INVENTORY_TEST_FLAG_ONE", false));
        assert!(!parse_flag("INVENTORY_TEST_FLAG_OFF", true));
        assert!(parse_flag("INVENTORY_TEST_FLAG_UNSET", true));
        env::remove_var("INVENTORY_TEST_FLAG_TRUE");
        env::remove_var("INVENTORY_TEST_FLAG_ONE");
        env::remove_var("INVENTORY_TEST_FLAG_OFF");
    }

    #[test]
    fn email_list_splits_on_commas_and_whitespace() {
        let list = split_email_list("a@example.com, b@example.com\nc@example.com");
        assert_eq!(
            list,
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
        assert!(split_email_list("").is_empty());
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Prod
        );
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
        assert!("staging".parse::<Environment>().is_err());
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Longest accepted token lifetime: one year
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 525_600;

/// Input cap of OpenAI-compatible embeddings endpoints
pub const MAX_EMBEDDING_BATCH_SIZE: usize = 2048;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    #[serde(default)]
    pub service_account: ServiceAccountConfig,
}

/// Credentials accepted without a user row. Off unless explicitly enabled.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceAccountConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Most inputs sent in one embeddings request
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_faq_path")]
    pub path: PathBuf,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

// Default value functions
fn default_port() -> Option<u16> {
    Some(8000)
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("faq_users.db")
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_password_iterations() -> u32 {
    100_000
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_embedding_batch_size() -> usize {
    1000
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("question_database.json")
}

fn default_threshold() -> f32 {
    0.8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            unix_socket: None,
            num_threads: default_num_threads(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
            password_iterations: default_password_iterations(),
            service_account: ServiceAccountConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            completion_model: default_completion_model(),
            timeout_secs: default_timeout_secs(),
            embedding_batch_size: default_embedding_batch_size(),
        }
    }
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: default_faq_path(),
            threshold: default_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides and validate.
    ///
    /// A missing file is not an error: the built-in defaults are used and the
    /// environment is expected to supply the secrets.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_toml_file(path)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Override file values with environment variables.
    ///
    /// `lookup` is injected so tests do not have to mutate the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("SECRET_KEY") {
            self.auth.secret_key = secret;
        }

        if let Some(algorithm) = lookup("ALGORITHM") {
            self.auth.algorithm = algorithm;
        }

        if let Some(minutes) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.auth.access_token_expire_minutes = minutes
                .trim()
                .parse()
                .context(format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: '{}'", minutes))?;
        }

        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.provider.api_key = api_key;
        }

        if let Some(faq_path) = lookup("FAQ_PATH") {
            self.faq.path = PathBuf::from(faq_path);
        }

        if let Some(db_path) = lookup("DATABASE_PATH") {
            self.database.path = PathBuf::from(db_path);
        }

        if let (Some(name), Some(password)) = (
            lookup("SERVICE_ACCOUNT_NAME"),
            lookup("SERVICE_ACCOUNT_PASSWORD"),
        ) {
            self.auth.service_account = ServiceAccountConfig {
                enabled: true,
                name,
                password,
            };
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if let Some(port) = self.server.port {
            if port == 0 {
                bail!("Server port must be greater than 0");
            }
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        // Validate auth config
        if self.auth.secret_key.is_empty() {
            bail!("secret_key must not be empty (set auth.secret_key or SECRET_KEY)");
        }

        let valid_algorithms = ["HS256", "HS384", "HS512"];
        if !valid_algorithms.contains(&self.auth.algorithm.as_str()) {
            bail!(
                "Invalid signing algorithm '{}'. Must be one of: HS256, HS384, HS512",
                self.auth.algorithm
            );
        }

        if self.auth.access_token_expire_minutes <= 0 {
            bail!("access_token_expire_minutes must be greater than 0");
        }

        if self.auth.access_token_expire_minutes > MAX_ACCESS_TOKEN_EXPIRE_MINUTES {
            bail!(
                "access_token_expire_minutes must be at most {} (one year)",
                MAX_ACCESS_TOKEN_EXPIRE_MINUTES
            );
        }

        if self.auth.password_iterations == 0 {
            bail!("password_iterations must be greater than 0");
        }

        let account = &self.auth.service_account;
        if account.enabled && (account.name.is_empty() || account.password.is_empty()) {
            bail!("service_account is enabled but name or password is empty");
        }

        // Validate provider config
        if self.provider.api_key.is_empty() {
            bail!("api_key must not be empty (set provider.api_key or OPENAI_API_KEY)");
        }

        if self.provider.base_url.is_empty() {
            bail!("base_url must not be empty");
        }

        if self.provider.timeout_secs == 0 {
            bail!("timeout_secs must be greater than 0");
        }

        if !(1..=MAX_EMBEDDING_BATCH_SIZE).contains(&self.provider.embedding_batch_size) {
            bail!(
                "embedding_batch_size must be between 1 and {}",
                MAX_EMBEDDING_BATCH_SIZE
            );
        }

        // Validate FAQ config
        if !(-1.0..=1.0).contains(&self.faq.threshold) {
            bail!(
                "Invalid similarity threshold {}. Must be within [-1, 1]",
                self.faq.threshold
            );
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.auth.secret_key = "secret".to_string();
        config.provider.api_key = "sk-test".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server.port, Some(8000));
        assert_eq!(config.auth.algorithm, "HS256");
        assert_eq!(config.auth.access_token_expire_minutes, 30);
        assert!(!config.auth.service_account.enabled);
        assert_eq!(config.provider.embedding_model, "text-embedding-3-small");
        assert_eq!(config.provider.completion_model, "gpt-4o-mini");
        assert!((config.faq.threshold - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [auth]
            secret_key = "from-file"
            access_token_expire_minutes = 15

            [auth.service_account]
            enabled = true
            name = "svc"
            password = "svc-pass"

            [faq]
            threshold = 0.75
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.secret_key, "from-file");
        assert_eq!(config.auth.access_token_expire_minutes, 15);
        assert_eq!(config.auth.algorithm, "HS256");
        assert!(config.auth.service_account.enabled);
        assert_eq!(config.auth.service_account.name, "svc");
        assert!((config.faq.threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml_str("[auth]\nsecret_key = \"from-file\"\n").unwrap();

        config
            .apply_env(env(&[
                ("SECRET_KEY", "from-env"),
                ("ALGORITHM", "HS512"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", "45"),
                ("OPENAI_API_KEY", "sk-env"),
                ("FAQ_PATH", "/tmp/faq.json"),
            ]))
            .unwrap();

        assert_eq!(config.auth.secret_key, "from-env");
        assert_eq!(config.auth.algorithm, "HS512");
        assert_eq!(config.auth.access_token_expire_minutes, 45);
        assert_eq!(config.provider.api_key, "sk-env");
        assert_eq!(config.faq.path, PathBuf::from("/tmp/faq.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_service_account_needs_both_values() {
        let mut config = valid_config();
        config
            .apply_env(env(&[("SERVICE_ACCOUNT_NAME", "svc")]))
            .unwrap();
        assert!(!config.auth.service_account.enabled);

        config
            .apply_env(env(&[
                ("SERVICE_ACCOUNT_NAME", "svc"),
                ("SERVICE_ACCOUNT_PASSWORD", "pw"),
            ]))
            .unwrap();
        assert!(config.auth.service_account.enabled);
        assert_eq!(config.auth.service_account.password, "pw");
    }

    #[test]
    fn test_env_invalid_ttl() {
        let mut config = valid_config();
        let result = config.apply_env(env(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_ttl() {
        let mut config = valid_config();
        config
            .apply_env(env(&[("ACCESS_TOKEN_EXPIRE_MINUTES", &i64::MAX.to_string())]))
            .unwrap();
        assert!(config.validate().is_err());

        config.auth.access_token_expire_minutes = MAX_ACCESS_TOKEN_EXPIRE_MINUTES;
        assert!(config.validate().is_ok());

        config.auth.access_token_expire_minutes = MAX_ACCESS_TOKEN_EXPIRE_MINUTES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_embedding_batch_size() {
        let mut config = valid_config();
        assert_eq!(config.provider.embedding_batch_size, 1000);

        config.provider.embedding_batch_size = 0;
        assert!(config.validate().is_err());

        config.provider.embedding_batch_size = MAX_EMBEDDING_BATCH_SIZE + 1;
        assert!(config.validate().is_err());

        config.provider.embedding_batch_size = MAX_EMBEDDING_BATCH_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_secrets() {
        assert!(Config::default().validate().is_err());

        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.provider.api_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_asymmetric_algorithm() {
        let mut config = valid_config();
        config.auth.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = valid_config();
        config.faq.threshold = 1.5;
        assert!(config.validate().is_err());

        config.faq.threshold = -1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_enabled_service_account_without_password() {
        let mut config = valid_config();
        config.auth.service_account = ServiceAccountConfig {
            enabled: true,
            name: "svc".to_string(),
            password: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[auth]\nsecret_key = \"file-secret\"\n\n[provider]\napi_key = \"sk-file\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.auth.secret_key.is_empty());
        assert!(!config.provider.api_key.is_empty());
        assert_eq!(config.server.port, Some(8000));
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::from_toml_str("[auth\nsecret_key = 1").is_err());
    }
}

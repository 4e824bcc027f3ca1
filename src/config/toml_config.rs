use crate::core::session::DEFAULT_DEBOUNCE;
use crate::core::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SKILL_LABEL_LIMIT: usize = 3;
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub search: Option<SearchConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub debounce_ms: Option<u64>,
    pub skill_label_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>, // "compact" or "json"
    pub verbose: Option<bool>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_seconds: None,
            },
            search: None,
            logging: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        if let Some(search) = &self.search {
            if let Some(debounce) = search.debounce_ms {
                validation::validate_range("search.debounce_ms", debounce, 0, 5_000)?;
            }
            if let Some(limit) = search.skill_label_limit {
                validation::validate_positive_number("search.skill_label_limit", limit as u64, 1)?;
            }
        }

        validation::validate_one_of("logging.format", self.log_format(), &LOG_FORMATS)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }

    fn debounce(&self) -> Duration {
        self.search
            .as_ref()
            .and_then(|s| s.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    fn skill_label_limit(&self) -> usize {
        self.search
            .as_ref()
            .and_then(|s| s.skill_label_limit)
            .unwrap_or(DEFAULT_SKILL_LABEL_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[api]
base_url = "https://devs.example.com"
timeout_seconds = 10

[search]
debounce_ms = 250
skill_label_limit = 5

[logging]
format = "json"
verbose = true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(FULL_CONFIG).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.api_base_url(), "https://devs.example.com");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.skill_label_limit(), 5);
        assert_eq!(config.log_format(), "json");
        assert!(config.verbose());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("[api]\nbase_url = \"http://localhost:8000\"\n").unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.debounce(), DEFAULT_DEBOUNCE);
        assert_eq!(config.skill_label_limit(), DEFAULT_SKILL_LABEL_LIMIT);
        assert_eq!(config.log_format(), "compact");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DEV_FINDER_TEST_API_URL", "https://staging.example.com");
        let config =
            TomlConfig::from_toml_str("[api]\nbase_url = \"${DEV_FINDER_TEST_API_URL}\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.com");

        let unresolved =
            TomlConfig::from_toml_str("[api]\nbase_url = \"${DEV_FINDER_TEST_MISSING}\"\n").unwrap();
        assert_eq!(unresolved.api.base_url, "${DEV_FINDER_TEST_MISSING}");
        assert!(unresolved.validate().is_err());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut config = TomlConfig::from_toml_str(FULL_CONFIG).unwrap();
        config.logging = Some(LoggingConfig {
            format: Some("xml".to_string()),
            verbose: None,
        });
        assert!(config.validate().is_err());

        let mut config = TomlConfig::from_toml_str(FULL_CONFIG).unwrap();
        config.api.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[api\nbase_url=").unwrap_err();
        assert!(matches!(err, FinderError::ConfigError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.skill_label_limit(), 5);

        assert!(matches!(
            TomlConfig::from_file("/nonexistent/dev-finder.toml"),
            Err(FinderError::IoError(_))
        ));
    }
}

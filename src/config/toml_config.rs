use crate::adapters::DEFAULT_API_BASE;
use crate::config::{DEFAULT_SPECIES_COUNT, DEFAULT_TIMEOUT_SECONDS};
use crate::core::identifier::FAVORITE_ID;
use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub identifiers: IdentifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub species_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifierConfig {
    pub favorite_id: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            species_count: None,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
    })
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${POKEVIEW_API_BASE})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        &self.catalog.base_url
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn species_count(&self) -> u32 {
        self.catalog.species_count.unwrap_or(DEFAULT_SPECIES_COUNT)
    }

    fn favorite_id(&self) -> u32 {
        self.identifiers.favorite_id.unwrap_or(FAVORITE_ID)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("catalog.base_url", &self.catalog.base_url)?;
        if let Some(timeout) = self.catalog.timeout_seconds {
            validate_positive_number("catalog.timeout_seconds", timeout, 1)?;
        }
        if let Some(count) = self.catalog.species_count {
            validate_positive_number("catalog.species_count", u64::from(count), 1)?;
        }
        if let Some(favorite) = self.identifiers.favorite_id {
            validate_range("identifiers.favorite_id", favorite, 1, self.species_count())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[catalog]
base_url = "https://catalog.example.com/api/v2"
timeout_seconds = 3
species_count = 151

[identifiers]
favorite_id = 133
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_base(), "https://catalog.example.com/api/v2");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.species_count(), 151);
        assert_eq!(config.favorite_id(), 133);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.species_count(), DEFAULT_SPECIES_COUNT);
        assert_eq!(config.favorite_id(), FAVORITE_ID);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("POKEVIEW_TEST_API_BASE", "https://mirror.example.com/api/v2");

        let toml_content = r#"
[catalog]
base_url = "${POKEVIEW_TEST_API_BASE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.base_url, "https://mirror.example.com/api/v2");

        std::env::remove_var("POKEVIEW_TEST_API_BASE");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[catalog]
base_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[catalog]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_favorite_outside_species_count_is_invalid() {
        let config = TomlConfig::from_toml_str(
            "[catalog]\nspecies_count = 151\n\n[identifiers]\nfavorite_id = 200\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidConfigValueError { ref field, .. } if field == "identifiers.favorite_id"
        ));

        let config = TomlConfig::from_toml_str("[identifiers]\nfavorite_id = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[catalog\nbase_url = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[identifiers]\nfavorite_id = 7\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.favorite_id(), 7);
    }
}

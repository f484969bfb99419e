use crate::adapters::DEFAULT_DATA_FILE;
use crate::utils::error::{GradebookError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "gradebook.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub grading: GradingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: String,
    pub pretty: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            pretty: true,
        }
    }
}

/// Accepted score range for grades entered through the console or the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            max_score: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GradebookError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise `gradebook.toml` if present, otherwise defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GradebookError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRADEBOOK_DATA})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GradebookError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.data_file", &self.storage.data_file)?;

        if !(self.grading.min_score < self.grading.max_score) {
            return Err(GradebookError::ValidationError {
                field: "grading".to_string(),
                value: format!("{}..{}", self.grading.min_score, self.grading.max_score),
                reason: "min_score must be lower than max_score".to_string(),
            });
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
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
data_file = "data/grades.json"
pretty = false

[grading]
min_score = 0.0
max_score = 20.0

[logging]
level = "debug"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.data_file, "data/grades.json");
        assert!(!config.storage.pretty);
        assert_eq!(config.grading.max_score, 20.0);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.storage.data_file, "grade_data.json");
        assert!(config.storage.pretty);
        assert_eq!(config.grading.min_score, 0.0);
        assert_eq!(config.grading.max_score, 100.0);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GRADEBOOK_TEST_DATA_FILE", "/tmp/gradebook-test.json");

        let config = AppConfig::from_toml_str(
            r#"
[storage]
data_file = "${GRADEBOOK_TEST_DATA_FILE}"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.data_file, "/tmp/gradebook-test.json");

        std::env::remove_var("GRADEBOOK_TEST_DATA_FILE");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[grading]
min_score = 100.0
max_score = 0.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[storage]\ndata_file = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = AppConfig::from_toml_str("[storage\n").unwrap_err();
        assert!(matches!(err, GradebookError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_file = \"file-test.json\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.data_file, "file-test.json");
    }
}

use crate::core::{ConfigProvider, StoreBackend};
use crate::utils::error::{BarError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SITE_TITLE: &str = "Bar Registry";
pub const DATABASE_URL_SCHEMES: &[&str] = &["postgres", "postgresql"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub database: Option<DatabaseSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub site_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub backend: Option<StoreBackend>,
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BarError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BarError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATABASE_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BarError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn host(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn site_title(&self) -> Option<&str> {
        self.server.as_ref().and_then(|s| s.site_title.as_deref())
    }

    pub fn backend(&self) -> Option<StoreBackend> {
        self.database.as_ref().and_then(|d| d.backend)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", self.host())?;
        validation::validate_range("server.port", self.port(), 1, u16::MAX)?;

        if let Some(url) = self.database_url() {
            validation::validate_url("database.url", url, DATABASE_URL_SCHEMES)?;
        }

        validation::validate_range("database.max_connections", self.max_connections(), 1, 100)?;

        if self.store_backend() == StoreBackend::Postgres {
            validation::validate_required_field(
                "database.url",
                &self.database.as_ref().and_then(|d| d.url.clone()),
            )?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }

    fn store_backend(&self) -> StoreBackend {
        self.backend().unwrap_or(StoreBackend::Memory)
    }

    fn database_url(&self) -> Option<&str> {
        self.database.as_ref().and_then(|d| d.url.as_deref())
    }

    fn max_connections(&self) -> u32 {
        self.database
            .as_ref()
            .and_then(|d| d.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

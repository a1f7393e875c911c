use crate::core::hiscores::CRAFTING_SKILL_INDEX;
use crate::core::methods::default_method_table;
use crate::core::ConfigProvider;
use crate::domain::model::MethodRequirement;
use crate::utils::error::{CraftError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "craft-calc.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoints: EndpointsConfig,
    pub hiscores: HiscoresConfig,
    pub log: LogConfig,
    pub methods: Vec<MethodRequirement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub prices: String,
    pub wiki: String,
    pub hiscores: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HiscoresConfig {
    pub skill_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            hiscores: HiscoresConfig::default(),
            log: LogConfig::default(),
            methods: default_method_table(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            prices: "https://prices.runescape.wiki/api/v1/osrs".to_string(),
            wiki: "https://oldschool.runescape.wiki".to_string(),
            hiscores: "https://secure.runescape.com/m=hiscore_oldschool/index_lite.ws".to_string(),
            user_agent: format!("craft-calc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for HiscoresConfig {
    fn default() -> Self {
        Self {
            skill_index: CRAFTING_SKILL_INDEX,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "crafting_log.txt".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CraftError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CraftError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// An explicit path must exist; otherwise the default file is used when
    /// present and built-in defaults when not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${WIKI_BASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CraftError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("endpoints.prices", &self.endpoints.prices)?;
        validation::validate_url("endpoints.wiki", &self.endpoints.wiki)?;
        validation::validate_url("endpoints.hiscores", &self.endpoints.hiscores)?;
        validation::validate_non_empty_string("endpoints.user_agent", &self.endpoints.user_agent)?;
        validation::validate_range("hiscores.skill_index", self.hiscores.skill_index, 0, 99)?;

        if self.log.enabled {
            validation::validate_path("log.path", &self.log.path)?;
        }

        for method in &self.methods {
            validation::validate_non_empty_string("methods.name", &method.name)?;
            validation::validate_range("methods.level", method.level, 1, 99)?;
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn prices_endpoint(&self) -> &str {
        &self.endpoints.prices
    }

    fn wiki_endpoint(&self) -> &str {
        &self.endpoints.wiki
    }

    fn hiscores_endpoint(&self) -> &str {
        &self.endpoints.hiscores
    }

    fn user_agent(&self) -> &str {
        &self.endpoints.user_agent
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

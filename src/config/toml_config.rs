use crate::core::{ConfigProvider, IpRange};
use crate::utils::error::{EvalError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub period: PeriodConfig,
    #[serde(default)]
    pub tenant: TenantConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

/// 評分區間 (含頭尾)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

/// 租戶的信任狀態快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default)]
    pub whitelisted_ranges: Vec<String>,
    #[serde(default)]
    pub approved_devices: Vec<String>,
    #[serde(default)]
    pub unverified_devices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub checkins: String,
    pub leaves: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EvalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EvalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OFFICE_RANGE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EvalError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 解析白名單網段
    pub fn parsed_ranges(&self) -> Result<Vec<IpRange>> {
        self.tenant
            .whitelisted_ranges
            .iter()
            .map(|spec| IpRange::parse(spec))
            .collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_date_order("period", self.period.start, self.period.end)?;

        for spec in &self.tenant.whitelisted_ranges {
            IpRange::parse(spec).map_err(|e| EvalError::InvalidConfigValueError {
                field: "tenant.whitelisted_ranges".to_string(),
                value: spec.clone(),
                reason: e.to_string(),
            })?;
        }

        for device in self
            .tenant
            .approved_devices
            .iter()
            .chain(self.tenant.unverified_devices.iter())
        {
            validation::validate_non_empty_string("tenant devices", device)?;
        }

        validation::validate_path("input.checkins", &self.input.checkins)?;
        if let Some(leaves) = &self.input.leaves {
            validation::validate_path("input.leaves", leaves)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_output_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn whitelisted_ranges(&self) -> Result<Vec<IpRange>> {
        self.parsed_ranges()
    }

    fn approved_devices(&self) -> &[String] {
        &self.tenant.approved_devices
    }

    fn unverified_devices(&self) -> &[String] {
        &self.tenant.unverified_devices
    }

    fn period(&self) -> (NaiveDate, NaiveDate) {
        (self.period.start, self.period.end)
    }

    fn holidays(&self) -> &[NaiveDate] {
        &self.period.holidays
    }

    fn checkins_path(&self) -> &str {
        &self.input.checkins
    }

    fn leaves_path(&self) -> &str {
        // 沒有假單檔案時回傳空字串，由 pipeline 略過
        self.input.leaves.as_deref().unwrap_or("")
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

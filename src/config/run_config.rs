use crate::config::connection_profile::RunDefaults;
use crate::utils::error::{FabricError, Result};
use crate::utils::validation::{
    validate_integer, validate_non_empty_string, validate_one_of, validate_path_segment, Validate,
};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_KEY: &str = "john";
pub const DEFAULT_INITIAL_VALUE: &str = "100";

/// 步驟失敗時的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 只有前置步驟失敗才跳過依賴它的步驟
    #[default]
    Continue,
    /// 第一個失敗就停止
    Stop,
}

impl FailurePolicy {
    pub const VALUES: [&'static str; 2] = ["continue", "stop"];
}

impl FromStr for FailurePolicy {
    type Err = FabricError;

    fn from_str(s: &str) -> Result<Self> {
        validate_one_of("failure_policy", s, &Self::VALUES)?;
        match s {
            "stop" => Ok(FailurePolicy::Stop),
            _ => Ok(FailurePolicy::Continue),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Stop => write!(f, "stop"),
        }
    }
}

/// 命令列或環境變數提供的覆蓋值
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub channel: Option<String>,
    pub chaincode: Option<String>,
    pub user: Option<String>,
    pub secret: Option<String>,
    pub key: Option<String>,
    pub initial_value: Option<String>,
    pub failure_policy: Option<String>,
    pub list_installed: bool,
}

#[derive(Clone, PartialEq)]
pub struct RunConfig {
    pub channel: String,
    pub chaincode_id: String,
    pub user: String,
    pub secret: String,
    pub key: String,
    pub initial_value: String,
    pub failure_policy: FailurePolicy,
    pub list_installed: bool,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("channel", &self.channel)
            .field("chaincode_id", &self.chaincode_id)
            .field("user", &self.user)
            .field("secret", &"***")
            .field("key", &self.key)
            .field("initial_value", &self.initial_value)
            .field("failure_policy", &self.failure_policy)
            .field("list_installed", &self.list_installed)
            .finish()
    }
}

impl RunConfig {
    /// 合併覆蓋值與設定檔預設值，並立即驗證
    pub fn resolve(overrides: RunOverrides, defaults: RunDefaults) -> Result<Self> {
        fn pick(field: &str, value: Option<String>, fallback: Option<String>) -> Result<String> {
            value
                .or(fallback)
                .ok_or_else(|| FabricError::MissingConfigError {
                    field: field.to_string(),
                })
        }

        let failure_policy = match overrides.failure_policy.as_deref() {
            Some(policy) => policy.parse()?,
            None => FailurePolicy::default(),
        };

        let config = Self {
            channel: pick("channel", overrides.channel, defaults.channel)?,
            chaincode_id: pick("chaincode", overrides.chaincode, defaults.chaincode)?,
            user: pick("user", overrides.user, defaults.user)?,
            secret: pick("secret", overrides.secret, defaults.secret)?,
            key: overrides
                .key
                .or(defaults.key)
                .unwrap_or_else(|| DEFAULT_KEY.to_string()),
            initial_value: overrides
                .initial_value
                .or(defaults.initial_value)
                .unwrap_or_else(|| DEFAULT_INITIAL_VALUE.to_string()),
            failure_policy,
            list_installed: overrides.list_installed || defaults.list_installed.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        // 這三個名稱會出現在閘道 URL 與憑證檔名中
        validate_path_segment("channel", &self.channel)?;
        validate_path_segment("chaincode", &self.chaincode_id)?;
        validate_path_segment("user", &self.user)?;
        validate_non_empty_string("secret", &self.secret)?;
        validate_non_empty_string("key", &self.key)?;
        validate_integer("initial_value", &self.initial_value)?;

        // 未替換的 ${VAR} 代表環境變數沒有設定
        if self.secret.starts_with("${") && self.secret.ends_with('}') {
            return Err(FabricError::InvalidConfigValueError {
                field: "secret".to_string(),
                value: "***".to_string(),
                reason: format!("Environment variable {} is not set", self.secret),
            });
        }

        Ok(())
    }
}

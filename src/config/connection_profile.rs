use crate::utils::error::{FabricError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CREDENTIAL_STORE: &str = "./credentials";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    pub version: Option<String>,
    pub client: ClientConfig,
    pub organizations: HashMap<String, OrganizationConfig>,
    pub certificate_authorities: HashMap<String, CertificateAuthorityConfig>,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub channels: HashMap<String, ChannelDefinition>,
    #[serde(default)]
    pub peers: HashMap<String, NodeConfig>,
    #[serde(default)]
    pub orderers: HashMap<String, NodeConfig>,
    pub run: Option<RunDefaults>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub organization: String,
    pub credential_store: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    pub msp_id: String,
    #[serde(default)]
    pub certificate_authorities: Vec<String>,
    #[serde(default)]
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateAuthorityConfig {
    pub url: String,
    pub ca_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDefinition {
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default)]
    pub orderers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub url: String,
}

/// `[run]` 區段：執行預設值，可被命令列或環境變數覆蓋
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDefaults {
    pub channel: Option<String>,
    pub chaincode: Option<String>,
    pub user: Option<String>,
    pub secret: Option<String>,
    pub key: Option<String>,
    pub initial_value: Option<String>,
    pub list_installed: Option<bool>,
}

impl ConnectionProfile {
    /// 從 TOML 檔案載入連線設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| FabricError::InitializationError {
                message: format!("cannot read connection profile '{}': {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FabricError::InitializationError {
            message: format!("connection profile parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FABRIC_SECRET})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FabricError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_profile(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("name", &self.name)?;
        crate::utils::validation::validate_url("gateway.url", &self.gateway.url)?;
        crate::utils::validation::validate_path("client.credential_store", self.credential_store())?;

        if let Some(timeout) = self.client.timeout_seconds {
            crate::utils::validation::validate_positive_number(
                "client.timeout_seconds",
                timeout,
                1,
            )?;
        }

        let organization = self.organization()?;
        if organization.certificate_authorities.is_empty() {
            return Err(FabricError::ConfigValidationError {
                field: format!("organizations.{}.certificate_authorities", self.client.organization),
                message: "Organization must reference at least one certificate authority"
                    .to_string(),
            });
        }

        for ca_name in &organization.certificate_authorities {
            let ca = self.certificate_authorities.get(ca_name).ok_or_else(|| {
                FabricError::ConfigValidationError {
                    field: format!("organizations.{}.certificate_authorities", self.client.organization),
                    message: format!("Certificate authority '{}' not defined", ca_name),
                }
            })?;
            crate::utils::validation::validate_url(
                &format!("certificate_authorities.{}.url", ca_name),
                &ca.url,
            )?;
        }

        crate::utils::validation::validate_path_segment(
            &format!("organizations.{}.msp_id", self.client.organization),
            &organization.msp_id,
        )?;

        for peer in &organization.peers {
            crate::utils::validation::validate_path_segment(
                &format!("organizations.{}.peers", self.client.organization),
                peer,
            )?;
            if !self.peers.contains_key(peer) {
                return Err(FabricError::ConfigValidationError {
                    field: format!("organizations.{}.peers", self.client.organization),
                    message: format!("Peer '{}' not defined", peer),
                });
            }
        }

        Ok(())
    }

    /// 客戶端所屬組織
    pub fn organization(&self) -> Result<&OrganizationConfig> {
        self.organizations
            .get(&self.client.organization)
            .ok_or_else(|| FabricError::ConfigValidationError {
                field: "client.organization".to_string(),
                message: format!(
                    "Organization '{}' not found in organizations",
                    self.client.organization
                ),
            })
    }

    pub fn msp_id(&self) -> Result<&str> {
        Ok(&self.organization()?.msp_id)
    }

    /// 組織的第一個 CA
    pub fn certificate_authority(&self) -> Result<&CertificateAuthorityConfig> {
        let organization = self.organization()?;
        organization
            .certificate_authorities
            .first()
            .and_then(|name| self.certificate_authorities.get(name))
            .ok_or_else(|| FabricError::MissingConfigError {
                field: format!("organizations.{}.certificate_authorities", self.client.organization),
            })
    }

    pub fn credential_store(&self) -> &str {
        self.client
            .credential_store
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_STORE)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.client.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelDefinition> {
        self.channels.get(name)
    }

    pub fn run_defaults(&self) -> RunDefaults {
        self.run.clone().unwrap_or_default()
    }
}

impl Validate for ConnectionProfile {
    fn validate(&self) -> Result<()> {
        self.validate_profile()
    }
}

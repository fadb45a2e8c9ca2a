use crate::domain::model::SigningIdentity;
use crate::domain::ports::{CredentialStore, MspClient};
use crate::utils::error::{FabricError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EnrollRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    caname: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EnrollResponse {
    #[serde(default)]
    success: bool,
    result: Option<EnrollResult>,
    #[serde(default)]
    errors: Vec<CaMessage>,
}

#[derive(Debug, Deserialize)]
struct EnrollResult {
    #[serde(rename = "Cert")]
    cert: String,
}

#[derive(Debug, Deserialize)]
struct CaMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl EnrollResponse {
    fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "CA reported failure without details".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Fabric CA 客戶端，身份保存在本地存放區
pub struct CaMspClient<S: CredentialStore> {
    store: S,
    client: Client,
    ca_url: String,
    ca_name: Option<String>,
    msp_id: String,
    timeout: Duration,
}

impl<S: CredentialStore> CaMspClient<S> {
    pub fn new(
        store: S,
        client: Client,
        ca_url: &str,
        ca_name: Option<String>,
        msp_id: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            client,
            ca_url: ca_url.trim_end_matches('/').to_string(),
            ca_name,
            msp_id: msp_id.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl<S: CredentialStore> MspClient for CaMspClient<S> {
    async fn get_signing_identity(&self, user: &str) -> Result<SigningIdentity> {
        tracing::debug!("🔑 Looking up identity for {}@{}", user, self.msp_id);
        self.store
            .load_identity(user, &self.msp_id)
            .await?
            .ok_or_else(|| FabricError::UserNotFound {
                user: user.to_string(),
            })
    }

    async fn enroll(&self, user: &str, secret: &str) -> Result<SigningIdentity> {
        let url = format!("{}/api/v1/enroll", self.ca_url);
        tracing::info!("🔑 Enrolling {} with CA at {}", user, url);

        let response = self
            .client
            .post(&url)
            .basic_auth(user, Some(secret))
            .json(&EnrollRequest {
                caname: self.ca_name.as_deref(),
            })
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let parsed: Option<EnrollResponse> = serde_json::from_slice(&body).ok();

        let cert = match parsed {
            Some(EnrollResponse {
                success: true,
                result: Some(result),
                ..
            }) if status.is_success() => result.cert,
            Some(failed) => {
                return Err(FabricError::EnrollmentError {
                    user: user.to_string(),
                    message: format!("HTTP {}: {}", status.as_u16(), failed.error_summary()),
                })
            }
            None => {
                return Err(FabricError::EnrollmentError {
                    user: user.to_string(),
                    message: format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        String::from_utf8_lossy(&body)
                    ),
                })
            }
        };

        let identity = SigningIdentity {
            user: user.to_string(),
            msp_id: self.msp_id.clone(),
            certificate: cert,
            enrolled_at: Utc::now(),
        };
        self.store.store_identity(&identity).await?;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_summary_joins_messages() {
        let response: EnrollResponse = serde_json::from_str(
            r#"{"success": false, "result": null, "errors": [
                {"code": 20, "message": "Authentication failure"},
                {"code": 71, "message": "Identity is not registered"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            response.error_summary(),
            "[20] Authentication failure; [71] Identity is not registered"
        );
    }

    #[test]
    fn test_enroll_request_omits_missing_ca_name() {
        let body = serde_json::to_value(EnrollRequest { caname: None }).unwrap();
        assert_eq!(body, serde_json::json!({}));

        let body = serde_json::to_value(EnrollRequest {
            caname: Some("ca-org1"),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"caname": "ca-org1"}));
    }
}

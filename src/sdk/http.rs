use crate::utils::error::{FabricError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

pub const USER_HEADER: &str = "X-Fabric-User";
pub const MSP_HEADER: &str = "X-Fabric-MspId";

/// REST 閘道的共用請求設定
#[derive(Debug, Clone)]
pub struct GatewayTransport {
    client: Client,
    base_url: String,
    headers: HashMap<String, String>,
    timeout: Duration,
}

impl GatewayTransport {
    pub fn new(
        client: Client,
        base_url: &str,
        headers: HashMap<String, String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            timeout,
        }
    }

    /// 附加呼叫者身份標頭
    pub fn with_identity(&self, user: &str, msp_id: &str) -> Self {
        let mut transport = self.clone();
        transport
            .headers
            .insert(USER_HEADER.to_string(), user.to_string());
        transport
            .headers
            .insert(MSP_HEADER.to_string(), msp_id.to_string());
        transport
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request.timeout(self.timeout)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("📡 {}: GET {}", operation, url);

        let response = self.prepare(self.client.get(&url)).send().await?;
        Self::read_json(operation, response).await
    }

    pub async fn post_json<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("📡 {}: POST {}", operation, url);

        let response = self.prepare(self.client.post(&url)).json(body).send().await?;
        Self::read_json(operation, response).await
    }

    async fn read_json<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("📡 {}: response status {}", operation, status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FabricError::GatewayError {
                operation: operation.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

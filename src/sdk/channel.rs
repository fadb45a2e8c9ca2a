use crate::domain::model::{ChaincodeRequest, ChaincodeResponse};
use crate::domain::ports::ChannelClient;
use crate::sdk::http::GatewayTransport;
use crate::utils::error::{FabricError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChaincodeCallBody {
    fcn: String,
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChaincodeResponseBody {
    #[serde(default)]
    tx_id: String,
    #[serde(default = "default_status")]
    chaincode_status: i32,
    #[serde(default)]
    payload: String,
}

fn default_status() -> i32 {
    200
}

/// 鏈碼狀態碼 400 以上視為錯誤
const CHAINCODE_ERROR_THRESHOLD: i32 = 400;

pub struct GatewayChannelClient {
    transport: GatewayTransport,
    channel: String,
}

impl GatewayChannelClient {
    pub fn new(transport: GatewayTransport, channel: &str) -> Self {
        Self {
            transport,
            channel: channel.to_string(),
        }
    }

    async fn call(&self, action: &str, request: ChaincodeRequest) -> Result<ChaincodeResponse> {
        let path = format!(
            "channels/{}/chaincodes/{}/{}",
            self.channel, request.chaincode_id, action
        );
        let body = ChaincodeCallBody {
            fcn: request.fcn.clone(),
            args: request.string_args(),
        };

        let response: ChaincodeResponseBody = self.transport.post_json(action, &path, &body).await?;

        if response.chaincode_status >= CHAINCODE_ERROR_THRESHOLD {
            return Err(FabricError::ChaincodeError {
                fcn: request.fcn,
                message: format!(
                    "status {}: {}",
                    response.chaincode_status, response.payload
                ),
            });
        }

        Ok(ChaincodeResponse {
            transaction_id: response.tx_id,
            chaincode_status: response.chaincode_status,
            payload: response.payload.into_bytes(),
        })
    }
}

#[async_trait]
impl ChannelClient for GatewayChannelClient {
    async fn query(&self, request: ChaincodeRequest) -> Result<ChaincodeResponse> {
        self.call("query", request).await
    }

    async fn execute(&self, request: ChaincodeRequest) -> Result<ChaincodeResponse> {
        let response = self.call("invoke", request).await?;
        tracing::debug!("📝 {}: committed tx {}", self.channel, response.transaction_id);
        Ok(response)
    }
}

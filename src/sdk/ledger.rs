use crate::domain::model::{BlockchainInfo, ChannelConfig, LedgerInfo};
use crate::domain::ports::LedgerClient;
use crate::sdk::http::GatewayTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerInfoBody {
    height: u64,
    #[serde(default)]
    current_block_hash: String,
    #[serde(default)]
    previous_block_hash: String,
    #[serde(default)]
    endorser: String,
    #[serde(default)]
    status: i32,
}

#[derive(Debug, Deserialize)]
struct ChannelConfigBody {
    id: String,
    #[serde(default)]
    orderers: Vec<String>,
    #[serde(default)]
    versions: serde_json::Value,
}

pub struct GatewayLedgerClient {
    transport: GatewayTransport,
    channel: String,
}

impl GatewayLedgerClient {
    pub fn new(transport: GatewayTransport, channel: &str) -> Self {
        Self {
            transport,
            channel: channel.to_string(),
        }
    }
}

#[async_trait]
impl LedgerClient for GatewayLedgerClient {
    async fn query_info(&self) -> Result<LedgerInfo> {
        let body: LedgerInfoBody = self
            .transport
            .get_json("query_info", &format!("channels/{}/ledger", self.channel))
            .await?;

        tracing::debug!("📦 {}: ledger height {}", self.channel, body.height);
        Ok(LedgerInfo {
            bci: BlockchainInfo {
                height: body.height,
                current_block_hash: body.current_block_hash,
                previous_block_hash: body.previous_block_hash,
            },
            endorser: body.endorser,
            status: body.status,
        })
    }

    async fn query_config(&self) -> Result<ChannelConfig> {
        let body: ChannelConfigBody = self
            .transport
            .get_json("query_config", &format!("channels/{}/config", self.channel))
            .await?;

        Ok(ChannelConfig {
            id: body.id,
            orderers: body.orderers,
            versions: body.versions,
        })
    }
}

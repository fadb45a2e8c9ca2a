use crate::domain::model::InstalledChaincode;
use crate::domain::ports::ResourceClient;
use crate::sdk::http::GatewayTransport;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 查詢組織 peer 上已安裝的鏈碼
pub struct GatewayResourceClient {
    transport: GatewayTransport,
    peers: Vec<String>,
}

impl GatewayResourceClient {
    pub fn new(transport: GatewayTransport, peers: Vec<String>) -> Self {
        Self { transport, peers }
    }
}

#[async_trait]
impl ResourceClient for GatewayResourceClient {
    async fn query_installed_chaincodes(&self) -> Result<Vec<InstalledChaincode>> {
        let mut installed = Vec::new();

        for peer in &self.peers {
            let chaincodes: Vec<InstalledChaincode> = self
                .transport
                .get_json(
                    "query_installed_chaincodes",
                    &format!("peers/{}/chaincodes/installed", peer),
                )
                .await?;
            tracing::debug!("{}: {} chaincodes installed", peer, chaincodes.len());

            for chaincode in chaincodes {
                if !installed.contains(&chaincode) {
                    installed.push(chaincode);
                }
            }
        }

        Ok(installed)
    }
}

use crate::domain::model::{
    ChaincodeRequest, ChaincodeResponse, ChannelConfig, ChannelContext, InstalledChaincode,
    LedgerInfo, SigningIdentity,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 本地身份存放區
pub trait CredentialStore: Send + Sync {
    fn load_identity(
        &self,
        user: &str,
        msp_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<SigningIdentity>>> + Send;
    fn store_identity(
        &self,
        identity: &SigningIdentity,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait MspClient: Send + Sync {
    /// 找不到身份時回傳 `FabricError::UserNotFound`
    async fn get_signing_identity(&self, user: &str) -> Result<SigningIdentity>;
    async fn enroll(&self, user: &str, secret: &str) -> Result<SigningIdentity>;
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn query_info(&self) -> Result<LedgerInfo>;
    async fn query_config(&self) -> Result<ChannelConfig>;
}

#[async_trait]
pub trait ChannelClient: Send + Sync {
    async fn query(&self, request: ChaincodeRequest) -> Result<ChaincodeResponse>;
    async fn execute(&self, request: ChaincodeRequest) -> Result<ChaincodeResponse>;
}

#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn query_installed_chaincodes(&self) -> Result<Vec<InstalledChaincode>>;
}

/// SDK 句柄：依需要建立各種客戶端
pub trait SdkProvider: Send + Sync {
    fn msp_client(&self) -> Result<Box<dyn MspClient>>;
    fn ledger_client(&self, context: &ChannelContext) -> Result<Box<dyn LedgerClient>>;
    fn channel_client(&self, context: &ChannelContext) -> Result<Box<dyn ChannelClient>>;
    fn resource_client(&self, user: &str) -> Result<Box<dyn ResourceClient>>;
}

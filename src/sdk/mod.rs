//! HTTP-backed SDK: Fabric CA for enrollment, a REST gateway for ledger,
//! channel and peer administration calls.

pub mod channel;
pub mod http;
pub mod ledger;
pub mod msp;
pub mod resmgmt;

use crate::config::connection_profile::ConnectionProfile;
use crate::config::credential_store::FileCredentialStore;
use crate::domain::model::ChannelContext;
use crate::domain::ports::{ChannelClient, LedgerClient, MspClient, ResourceClient, SdkProvider};
use crate::utils::error::{FabricError, Result};
use crate::utils::validation::Validate;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use self::channel::GatewayChannelClient;
use self::http::GatewayTransport;
use self::ledger::GatewayLedgerClient;
use self::msp::CaMspClient;
use self::resmgmt::GatewayResourceClient;

/// SDK 句柄，建立後持有連線設定與 HTTP 客戶端，離開作用域時關閉
pub struct FabricSdk {
    profile: ConnectionProfile,
    client: Client,
    closed: AtomicBool,
}

impl FabricSdk {
    /// 驗證連線設定並建立共用 HTTP 客戶端；設定無效時回傳 InitializationError
    pub fn new(profile: ConnectionProfile) -> Result<Self> {
        profile
            .validate()
            .map_err(|e| FabricError::InitializationError {
                message: e.to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(profile.timeout_seconds()))
            .user_agent(concat!("fabric-counter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FabricError::InitializationError {
                message: format!("cannot build HTTP client: {}", e),
            })?;

        tracing::info!(
            "🔌 SDK initialized for network '{}' (organization {})",
            profile.name,
            profile.client.organization
        );

        Ok(Self {
            profile,
            client,
            closed: AtomicBool::new(false),
        })
    }

    /// 關閉 SDK，重複呼叫無副作用
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("🔌 SDK closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(FabricError::SdkClosed);
        }
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.profile.timeout_seconds())
    }

    fn gateway_for(&self, user: &str) -> Result<GatewayTransport> {
        let headers = self.profile.gateway.headers.clone().unwrap_or_default();
        let transport = GatewayTransport::new(
            self.client.clone(),
            &self.profile.gateway.url,
            headers,
            self.timeout(),
        );
        Ok(transport.with_identity(user, self.profile.msp_id()?))
    }

    fn warn_unknown_channel(&self, channel: &str) {
        if self.profile.channel(channel).is_none() {
            tracing::warn!(
                "⚠️ Channel '{}' is not described in the connection profile",
                channel
            );
        }
    }
}

impl Drop for FabricSdk {
    fn drop(&mut self) {
        self.close();
    }
}

impl SdkProvider for FabricSdk {
    fn msp_client(&self) -> Result<Box<dyn MspClient>> {
        self.ensure_open()?;
        let ca = self.profile.certificate_authority()?;
        let store = FileCredentialStore::new(self.profile.credential_store());

        Ok(Box::new(CaMspClient::new(
            store,
            self.client.clone(),
            &ca.url,
            ca.ca_name.clone(),
            self.profile.msp_id()?,
            self.timeout(),
        )))
    }

    fn ledger_client(&self, context: &ChannelContext) -> Result<Box<dyn LedgerClient>> {
        self.ensure_open()?;
        self.warn_unknown_channel(&context.channel);
        Ok(Box::new(GatewayLedgerClient::new(
            self.gateway_for(&context.user)?,
            &context.channel,
        )))
    }

    fn channel_client(&self, context: &ChannelContext) -> Result<Box<dyn ChannelClient>> {
        self.ensure_open()?;
        self.warn_unknown_channel(&context.channel);
        Ok(Box::new(GatewayChannelClient::new(
            self.gateway_for(&context.user)?,
            &context.channel,
        )))
    }

    fn resource_client(&self, user: &str) -> Result<Box<dyn ResourceClient>> {
        self.ensure_open()?;
        let peers = self.profile.organization()?.peers.clone();
        Ok(Box::new(GatewayResourceClient::new(
            self.gateway_for(user)?,
            peers,
        )))
    }
}

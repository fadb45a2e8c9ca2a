use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已註冊的簽章身份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningIdentity {
    pub user: String,
    pub msp_id: String,
    pub certificate: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockchainInfo {
    pub height: u64,
    pub current_block_hash: String,
    pub previous_block_hash: String,
}

/// 帳本查詢結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub bci: BlockchainInfo,
    pub endorser: String,
    pub status: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub orderers: Vec<String>,
    pub versions: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChaincodeRequest {
    pub chaincode_id: String,
    pub fcn: String,
    pub args: Vec<Vec<u8>>,
}

impl ChaincodeRequest {
    pub fn new(chaincode_id: &str, fcn: &str, args: &[&str]) -> Self {
        Self {
            chaincode_id: chaincode_id.to_string(),
            fcn: fcn.to_string(),
            args: args.iter().map(|a| a.as_bytes().to_vec()).collect(),
        }
    }

    /// 以 UTF-8 字串形式取得參數
    pub fn string_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChaincodeResponse {
    pub transaction_id: String,
    pub chaincode_status: i32,
    pub payload: Vec<u8>,
}

impl ChaincodeResponse {
    pub fn payload_string(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledChaincode {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub path: String,
}

/// 通道上下文：通道名稱與使用者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContext {
    pub channel: String,
    pub user: String,
}

impl ChannelContext {
    pub fn new(channel: &str, user: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user: user.to_string(),
        }
    }
}

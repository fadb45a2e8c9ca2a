use crate::config::connection_profile::ConnectionProfile;
use crate::config::run_config::{RunConfig, RunOverrides};
use crate::core::orchestrator::{Orchestrator, RunReport};
use crate::sdk::FabricSdk;
use crate::utils::error::Result;
use std::path::Path;

/// 載入設定、建立 SDK 並執行完整序列
///
/// 設定檔、執行設定或 SDK 初始化失敗時直接回傳錯誤，不會發出任何網路呼叫。
pub async fn execute<P: AsRef<Path>>(profile_path: P, overrides: RunOverrides) -> Result<RunReport> {
    println!("Reading connection profile..");
    let profile = ConnectionProfile::from_file(profile_path)?;

    let config = RunConfig::resolve(overrides, profile.run_defaults())?;
    tracing::debug!("Run config: {:?}", config);

    let sdk = FabricSdk::new(profile)?;
    let report = Orchestrator::new(&sdk, config).run().await;
    sdk.close();

    Ok(report)
}

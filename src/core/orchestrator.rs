use crate::config::run_config::{FailurePolicy, RunConfig};
use crate::core::counter::next_counter_value;
use crate::domain::model::{ChaincodeRequest, ChannelContext};
use crate::domain::ports::{ChannelClient, LedgerClient, SdkProvider};
use crate::utils::error::{FabricError, Result};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

pub const SET_FCN: &str = "set";
pub const QUERY_FCN: &str = "query";

/// 執行序列中的步驟，依宣告順序執行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ResolveIdentity,
    QueryInstalledChaincodes,
    OpenLedgerClient,
    QueryChannelInfo,
    QueryChannelConfig,
    OpenChannelClient,
    InvokeInitial,
    QueryCounter,
    InvokeIncrement,
    QueryFinal,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::ResolveIdentity => "resolve_identity",
            Step::QueryInstalledChaincodes => "query_installed_chaincodes",
            Step::OpenLedgerClient => "open_ledger_client",
            Step::QueryChannelInfo => "query_channel_info",
            Step::QueryChannelConfig => "query_channel_config",
            Step::OpenChannelClient => "open_channel_client",
            Step::InvokeInitial => "invoke_initial",
            Step::QueryCounter => "query_counter",
            Step::InvokeIncrement => "invoke_increment",
            Step::QueryFinal => "query_final",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Step::ResolveIdentity => "resolve user identity",
            Step::QueryInstalledChaincodes => "query installed cc",
            Step::OpenLedgerClient => "create ledger client",
            Step::QueryChannelInfo => "queryInfo",
            Step::QueryChannelConfig => "queryConfig",
            Step::OpenChannelClient => "create channel client",
            Step::InvokeInitial | Step::InvokeIncrement => "invoke",
            Step::QueryCounter | Step::QueryFinal => "query",
        }
    }

    /// 前置步驟失敗時，依賴它的步驟一律跳過
    pub fn is_prerequisite(&self) -> bool {
        matches!(
            self,
            Step::ResolveIdentity | Step::OpenLedgerClient | Step::OpenChannelClient
        )
    }

    pub fn dependencies(&self) -> &'static [Step] {
        match self {
            Step::ResolveIdentity => &[],
            Step::QueryInstalledChaincodes | Step::OpenLedgerClient | Step::OpenChannelClient => {
                &[Step::ResolveIdentity]
            }
            Step::QueryChannelInfo | Step::QueryChannelConfig => {
                &[Step::ResolveIdentity, Step::OpenLedgerClient]
            }
            Step::InvokeInitial | Step::QueryCounter | Step::InvokeIncrement | Step::QueryFinal => {
                &[Step::ResolveIdentity, Step::OpenChannelClient]
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Succeeded,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub duration: Duration,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOutcome {
    AlreadyEnrolled,
    Enrolled,
}

/// 一次執行的完整結果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub execution_id: String,
    pub steps: Vec<StepReport>,
    pub identity: Option<IdentityOutcome>,
    pub observed_value: Option<String>,
    /// 遞增呼叫送出的值；步驟被跳過時為 None
    pub next_value: Option<String>,
    pub final_value: Option<String>,
}

impl RunReport {
    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.status)
    }

    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|r| r.status == StepStatus::Succeeded)
    }

    pub fn failed_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Failed(_)))
            .map(|r| r.step)
            .collect()
    }

    pub fn skipped_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Skipped(_)))
            .map(|r| r.step)
            .collect()
    }

    /// 0 全部成功；1 前置步驟失敗；2 其他步驟失敗
    pub fn exit_code(&self) -> i32 {
        let failed = self.failed_steps();
        if failed.iter().any(|s| s.is_prerequisite()) {
            1
        } else if !failed.is_empty() {
            2
        } else {
            0
        }
    }

    pub fn summary(&self) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let count = |pred: fn(&StepStatus) -> bool| self.steps.iter().filter(|r| pred(&r.status)).count();
        let total_duration: Duration = self.steps.iter().map(|r| r.duration).sum();

        summary.insert(
            "execution_id".to_string(),
            serde_json::Value::String(self.execution_id.clone()),
        );
        summary.insert(
            "total_steps".to_string(),
            serde_json::Value::Number(self.steps.len().into()),
        );
        summary.insert(
            "succeeded".to_string(),
            serde_json::Value::Number(count(|s| *s == StepStatus::Succeeded).into()),
        );
        summary.insert(
            "failed".to_string(),
            serde_json::Value::Number(count(|s| matches!(s, StepStatus::Failed(_))).into()),
        );
        summary.insert(
            "skipped".to_string(),
            serde_json::Value::Number(count(|s| matches!(s, StepStatus::Skipped(_))).into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let executed: Vec<serde_json::Value> = self
            .steps
            .iter()
            .filter(|r| !matches!(r.status, StepStatus::Skipped(_)))
            .map(|r| serde_json::Value::String(r.step.name().to_string()))
            .collect();
        summary.insert(
            "executed_steps".to_string(),
            serde_json::Value::Array(executed),
        );

        let failed: Vec<serde_json::Value> = self
            .failed_steps()
            .into_iter()
            .map(|s| serde_json::Value::String(s.name().to_string()))
            .collect();
        summary.insert("failed_steps".to_string(), serde_json::Value::Array(failed));

        summary.insert(
            "counter".to_string(),
            serde_json::json!({
                "observed": self.observed_value,
                "next": self.next_value,
                "final": self.final_value,
            }),
        );

        summary
    }
}

/// 記錄步驟結果並套用失敗策略
struct StepTracker {
    policy: FailurePolicy,
    reports: Vec<StepReport>,
    halted_by: Option<Step>,
}

impl StepTracker {
    fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            reports: Vec::new(),
            halted_by: None,
        }
    }

    fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.reports
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.status)
    }

    fn skip_reason(&self, step: Step) -> Option<String> {
        if let Some(failed) = self.halted_by {
            return Some(format!("sequence stopped after '{}' failed", failed));
        }

        step.dependencies()
            .iter()
            .find(|dep| self.status_of(**dep) != Some(&StepStatus::Succeeded))
            .map(|dep| format!("prerequisite '{}' did not succeed", dep))
    }

    async fn attempt<T, F, Fut>(&mut self, step: Step, action: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(T, Option<String>)>>,
    {
        if let Some(reason) = self.skip_reason(step) {
            tracing::warn!("⏭️ Skipping {}: {}", step, reason);
            self.reports.push(StepReport {
                step,
                status: StepStatus::Skipped(reason),
                duration: Duration::ZERO,
                detail: None,
            });
            return None;
        }

        let start_time = Instant::now();
        let outcome = action().await;
        let duration = start_time.elapsed();

        match outcome {
            Ok((value, detail)) => {
                tracing::debug!("✅ {} completed in {:?}", step, duration);
                self.reports.push(StepReport {
                    step,
                    status: StepStatus::Succeeded,
                    duration,
                    detail,
                });
                Some(value)
            }
            Err(e) => {
                tracing::error!("❌ Failed to {}: {}", step.description(), e);
                if self.policy == FailurePolicy::Stop && self.halted_by.is_none() {
                    self.halted_by = Some(step);
                }
                self.reports.push(StepReport {
                    step,
                    status: StepStatus::Failed(e.to_string()),
                    duration,
                    detail: None,
                });
                None
            }
        }
    }
}

fn require<'c, C: ?Sized>(client: Option<&'c C>, step: Step) -> Result<&'c C> {
    client.ok_or_else(|| FabricError::StepSkipped {
        step: step.name().to_string(),
        reason: "client unavailable".to_string(),
    })
}

/// 依固定順序呼叫 SDK：身份、帳本、通道設定、鏈碼計數器
pub struct Orchestrator<'a> {
    sdk: &'a dyn SdkProvider,
    config: RunConfig,
    execution_id: String,
}

impl<'a> Orchestrator<'a> {
    pub fn new(sdk: &'a dyn SdkProvider, config: RunConfig) -> Self {
        Self {
            sdk,
            config,
            execution_id: format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")),
        }
    }

    pub fn with_execution_id(mut self, execution_id: String) -> Self {
        self.execution_id = execution_id;
        self
    }

    pub async fn run(&self) -> RunReport {
        tracing::info!(
            "🚀 Starting run {} (channel {}, chaincode {}, policy {})",
            self.execution_id,
            self.config.channel,
            self.config.chaincode_id,
            self.config.failure_policy
        );

        let mut tracker = StepTracker::new(self.config.failure_policy);
        let context = ChannelContext::new(&self.config.channel, &self.config.user);

        let identity = tracker
            .attempt(Step::ResolveIdentity, || self.resolve_identity())
            .await;

        if self.config.list_installed {
            tracker
                .attempt(Step::QueryInstalledChaincodes, || self.query_installed())
                .await;
        }

        println!("\n===== Channel: {} ===== ", self.config.channel);
        let ledger = tracker
            .attempt(Step::OpenLedgerClient, || self.open_ledger_client(&context))
            .await;
        tracker
            .attempt(Step::QueryChannelInfo, || {
                self.query_channel_info(ledger.as_deref())
            })
            .await;
        tracker
            .attempt(Step::QueryChannelConfig, || {
                self.query_channel_config(ledger.as_deref())
            })
            .await;

        println!("\n====== Chaincode =========");
        let channel = tracker
            .attempt(Step::OpenChannelClient, || self.open_channel_client(&context))
            .await;
        let channel = channel.as_deref();

        tracker
            .attempt(Step::InvokeInitial, || {
                self.invoke_counter(channel, Step::InvokeInitial, &self.config.initial_value)
            })
            .await;

        let observed = tracker
            .attempt(Step::QueryCounter, || {
                self.query_counter(channel, Step::QueryCounter)
            })
            .await;

        // 查詢失敗時以空字串計算，等同從 0 開始
        let next_value = next_counter_value(observed.as_deref().unwrap_or_default());
        tracker
            .attempt(Step::InvokeIncrement, || {
                self.invoke_counter(channel, Step::InvokeIncrement, &next_value)
            })
            .await;
        // 只有實際送出的遞增值才記錄
        let next_value = match tracker.status_of(Step::InvokeIncrement) {
            Some(StepStatus::Skipped(_)) | None => None,
            Some(_) => Some(next_value),
        };

        let final_value = tracker
            .attempt(Step::QueryFinal, || self.query_counter(channel, Step::QueryFinal))
            .await;

        println!("===============");
        println!("Done.");

        let report = RunReport {
            execution_id: self.execution_id.clone(),
            steps: tracker.reports,
            identity,
            observed_value: observed,
            next_value,
            final_value,
        };

        tracing::info!(
            "🏁 Run {} finished: {} steps, {} failed, {} skipped",
            report.execution_id,
            report.steps.len(),
            report.failed_steps().len(),
            report.skipped_steps().len()
        );

        report
    }

    async fn resolve_identity(&self) -> Result<(IdentityOutcome, Option<String>)> {
        let msp = self.sdk.msp_client()?;
        let user = &self.config.user;

        match msp.get_signing_identity(user).await {
            Ok(identity) => {
                println!("User {} already enrolled, skip enrollment.", user);
                Ok((IdentityOutcome::AlreadyEnrolled, Some(identity.msp_id)))
            }
            Err(e) if e.is_user_not_found() => {
                println!("Going to enroll user");
                let identity = msp.enroll(user, &self.config.secret).await?;
                println!("Success enroll user: {}", user);
                Ok((IdentityOutcome::Enrolled, Some(identity.msp_id)))
            }
            Err(e) => Err(e),
        }
    }

    async fn query_installed(&self) -> Result<((), Option<String>)> {
        let resources = self.sdk.resource_client(&self.config.user)?;
        let installed = resources.query_installed_chaincodes().await?;

        let listed: Vec<String> = installed
            .iter()
            .map(|cc| format!("{}:{}", cc.name, cc.version))
            .collect();
        println!("Installed cc:  {:?}", listed);
        Ok(((), Some(format!("{} installed", installed.len()))))
    }

    async fn open_ledger_client(
        &self,
        context: &ChannelContext,
    ) -> Result<(Box<dyn LedgerClient>, Option<String>)> {
        Ok((self.sdk.ledger_client(context)?, None))
    }

    async fn query_channel_info(
        &self,
        ledger: Option<&dyn LedgerClient>,
    ) -> Result<((), Option<String>)> {
        let info = require(ledger, Step::QueryChannelInfo)?.query_info().await?;

        println!(
            "BlockChainInfo: height={} currentBlockHash={} previousBlockHash={}",
            info.bci.height, info.bci.current_block_hash, info.bci.previous_block_hash
        );
        println!("Endorser: {}", info.endorser);
        println!("Status: {}", info.status);
        Ok(((), Some(format!("height {}", info.bci.height))))
    }

    async fn query_channel_config(
        &self,
        ledger: Option<&dyn LedgerClient>,
    ) -> Result<((), Option<String>)> {
        let config = require(ledger, Step::QueryChannelConfig)?
            .query_config()
            .await?;

        println!("ChannelID:  {}", config.id);
        println!("Channel Orderers:  {:?}", config.orderers);
        println!("Channel Versions:  {}", config.versions);
        Ok(((), Some(config.id)))
    }

    async fn open_channel_client(
        &self,
        context: &ChannelContext,
    ) -> Result<(Box<dyn ChannelClient>, Option<String>)> {
        Ok((self.sdk.channel_client(context)?, None))
    }

    async fn invoke_counter(
        &self,
        channel: Option<&dyn ChannelClient>,
        step: Step,
        value: &str,
    ) -> Result<((), Option<String>)> {
        let client = require(channel, step)?;
        println!("Invoke cc with new value: {}", value);

        let request =
            ChaincodeRequest::new(&self.config.chaincode_id, SET_FCN, &[self.config.key.as_str(), value]);
        let response = client.execute(request).await?;
        Ok(((), Some(response.transaction_id)))
    }

    async fn query_counter(
        &self,
        channel: Option<&dyn ChannelClient>,
        step: Step,
    ) -> Result<(String, Option<String>)> {
        let client = require(channel, step)?;

        let request = ChaincodeRequest::new(&self.config.chaincode_id, QUERY_FCN, &[self.config.key.as_str()]);
        let response = client.query(request).await?;

        let payload = response.payload_string();
        println!("Chaincode status:  {}", response.chaincode_status);
        println!("Payload:  {}", payload);
        Ok((payload.clone(), Some(payload)))
    }
}

pub mod connection_profile;
pub mod credential_store;
pub mod run_config;

#[cfg(feature = "cli")]
use crate::config::run_config::{FailurePolicy, RunOverrides};
#[cfg(feature = "cli")]
use crate::utils::logger::LOG_LEVELS;
#[cfg(feature = "cli")]
use clap::builder::PossibleValuesParser;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fabric-counter")]
#[command(about = "Enroll a user, inspect a channel and bump a chaincode counter")]
pub struct CliConfig {
    /// Path to the connection profile
    #[arg(long, env = "FABRIC_PROFILE", default_value = "./connection-profile.toml")]
    pub profile: String,

    #[arg(long, env = "FABRIC_CHANNEL")]
    pub channel: Option<String>,

    #[arg(long, env = "FABRIC_CHAINCODE")]
    pub chaincode: Option<String>,

    #[arg(long, env = "FABRIC_USER")]
    pub user: Option<String>,

    #[arg(long, env = "FABRIC_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Ledger key holding the counter
    #[arg(long, env = "FABRIC_KEY")]
    pub key: Option<String>,

    #[arg(long, env = "FABRIC_INITIAL_VALUE")]
    pub initial_value: Option<String>,

    /// What to do after a failed step
    #[arg(long, env = "FABRIC_FAILURE_POLICY", value_parser = PossibleValuesParser::new(FailurePolicy::VALUES))]
    pub failure_policy: Option<String>,

    /// Log level for the SDK subsystems
    #[arg(
        long,
        env = "FABRIC_SDK_LOG_LEVEL",
        default_value = "info",
        value_parser = PossibleValuesParser::new(LOG_LEVELS)
    )]
    pub sdk_log_level: String,

    /// Also list chaincodes installed on the organization's peers
    #[arg(long)]
    pub list_installed: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json_summary: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn run_overrides(&self) -> RunOverrides {
        RunOverrides {
            channel: self.channel.clone(),
            chaincode: self.chaincode.clone(),
            user: self.user.clone(),
            secret: self.secret.clone(),
            key: self.key.clone(),
            initial_value: self.initial_value.clone(),
            failure_policy: self.failure_policy.clone(),
            list_installed: self.list_installed,
        }
    }
}

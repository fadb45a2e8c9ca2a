pub mod config;
pub mod core;
pub mod domain;
pub mod sdk;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::connection_profile::ConnectionProfile;
pub use config::credential_store::FileCredentialStore;
pub use config::run_config::{FailurePolicy, RunConfig, RunOverrides};
pub use crate::core::orchestrator::{Orchestrator, RunReport, Step, StepStatus};
pub use sdk::FabricSdk;
pub use utils::error::{FabricError, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// SDK 子系統的日誌目標
pub const SDK_TARGETS: [&str; 5] = [
    "fabric_counter::sdk",
    "fabric_counter::sdk::msp",
    "fabric_counter::sdk::ledger",
    "fabric_counter::sdk::channel",
    "fabric_counter::sdk::resmgmt",
];

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 為 SDK 子系統產生 EnvFilter 指令
pub fn sdk_directives(level: &str) -> Vec<String> {
    SDK_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect()
}

fn default_filter(verbose: bool, sdk_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let base = if verbose {
            "fabric_counter=debug,info"
        } else {
            "fabric_counter=info"
        };
        let mut directives = vec![base.to_string()];
        directives.extend(sdk_directives(sdk_level));
        EnvFilter::new(directives.join(","))
    })
}

pub fn init_cli_logger(verbose: bool, sdk_level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, sdk_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, sdk_level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, sdk_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

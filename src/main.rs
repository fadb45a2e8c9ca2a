use clap::Parser;
use fabric_counter::core::app;
use fabric_counter::utils::logger;
use fabric_counter::CliConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose, &config.sdk_log_level);
    } else {
        logger::init_cli_logger(config.verbose, &config.sdk_log_level);
    }

    tracing::info!("Starting fabric-counter");
    if config.verbose {
        tracing::debug!("CLI config: profile={}", config.profile);
    }

    let report = match app::execute(&config.profile, config.run_overrides()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                "❌ Run aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let summary = report.summary();
    if config.json_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "📊 Steps: {} succeeded, {} failed, {} skipped",
            summary.get("succeeded").cloned().unwrap_or_default(),
            summary.get("failed").cloned().unwrap_or_default(),
            summary.get("skipped").cloned().unwrap_or_default()
        );
        for step in &report.steps {
            if let fabric_counter::StepStatus::Failed(reason) = &step.status {
                println!("   ❌ {}: {}", step.step, reason);
            }
        }
    }

    let exit_code = report.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

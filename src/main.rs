use clap::Parser;
use workforce_eval::core::ConfigProvider;
use workforce_eval::utils::error::ErrorSeverity;
use workforce_eval::utils::{logger, validation::Validate};
use workforce_eval::{CliConfig, CsvPipeline, EvaluationEngine, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting workforce-eval");
    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 命令列覆蓋設定
    if let Some(output_path) = &args.output_path {
        config.output.path = output_path.clone();
        tracing::info!("Output path overridden to: {}", output_path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("DRY RUN MODE - no output will be written");
        return Ok(());
    }

    let storage = LocalStorage::new(args.root.clone());
    let pipeline = CsvPipeline::new(storage, config);
    let engine = EvaluationEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Evaluation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Evaluation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &CliConfig) {
    let (start, end) = config.period();
    tracing::info!("Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("Period: {} .. {} ({} holidays)", start, end, config.holidays().len());
    tracing::info!(
        "Trust snapshot: {} whitelisted ranges, {} approved devices, {} unverified devices",
        config.tenant.whitelisted_ranges.len(),
        config.approved_devices().len(),
        config.unverified_devices().len()
    );
    tracing::info!("Check-ins: {}/{}", args.root, config.checkins_path());
    if !config.leaves_path().is_empty() {
        tracing::info!("Leaves: {}/{}", args.root, config.leaves_path());
    }
    tracing::info!(
        "Output: {}/{} ({})",
        args.root,
        config.output_path(),
        config.output_formats().join(", ")
    );
}

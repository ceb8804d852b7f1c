use clap::Parser;
use std::collections::{HashMap, HashSet};
use workforce_eval::core::{AttendanceValidationInput, ConfigProvider};
use workforce_eval::utils::{logger, validation::Validate};
use workforce_eval::{normalize_client_ip, resolve_client_ip, validate_attendance, TomlConfig};

#[derive(Parser)]
#[command(name = "verify-checkin")]
#[command(about = "Classify a single check-in against a tenant's trust configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "workforce-eval.toml")]
    config: String,

    /// Client address; takes precedence over --header. IPv6 values are mapped like header values
    #[arg(long)]
    ip: Option<String>,

    /// Request header as "Name: value", may be repeated
    #[arg(long = "header")]
    headers: Vec<String>,

    /// Device identifier presented with the check-in
    #[arg(short, long, default_value = "")]
    device: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_headers(raw: &[String]) -> HashMap<String, String> {
    raw.iter()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = TomlConfig::from_file(&args.config)?;
    config.validate()?;

    let ip = match &args.ip {
        Some(ip) => normalize_client_ip(ip),
        None => resolve_client_ip(&parse_headers(&args.headers)),
    };

    let input = AttendanceValidationInput {
        ip,
        device_id: args.device.clone(),
        approved_device_ids: config.approved_devices().iter().cloned().collect::<HashSet<_>>(),
        unverified_device_ids: config.unverified_devices().iter().cloned().collect(),
        whitelisted_ip_ranges: config.whitelisted_ranges()?,
    };

    match validate_attendance(&input) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            tracing::warn!("{}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }

    Ok(())
}

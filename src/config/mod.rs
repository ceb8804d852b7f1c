pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "workforce-eval")]
#[command(about = "Batch evaluation of check-in trust, performance scores and leave demand")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "workforce-eval.toml")]
    pub config: String,

    /// Directory that input and output paths are resolved against
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Override the output path from the configuration file
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show what would be evaluated without writing any output
    #[arg(long)]
    pub dry_run: bool,
}

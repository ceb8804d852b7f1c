pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::EvaluationEngine,
    forecast::predict_next_month_leaves,
    ip::{ip_to_int, normalize_client_ip, resolve_client_ip},
    pipeline::CsvPipeline,
    scoring::calculate_performance_score,
    verifier::validate_attendance,
};
pub use crate::utils::error::{EvalError, Result};

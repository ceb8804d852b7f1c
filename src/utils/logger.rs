use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Covers the library and the
/// `verify-checkin` binary target.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "workforce_eval=debug,verify_checkin=debug,info"
    } else {
        "workforce_eval=info,verify_checkin=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// One JSON object per event. Event fields such as `ip`, `device_id` and
/// `status` from the verifier are flattened to the top level, and the target
/// is kept so review tooling can separate verifier events from pipeline ones.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_target(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();
}

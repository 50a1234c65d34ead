//! Tracing subscriber setup.
//!
//! Priority: `RUST_LOG` > `--log-level` > config `log_level` > "info".
//! Output goes to stderr so replies on stdout stay clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_LEVEL: &str = "info";
const CRATES: &[&str] = &[
    "ryan",
    "ryan_core",
    "ryan_infrastructure",
    "ryan_interaction",
    "ryan_application",
];

/// Directives applying `level` to Ryan's crates and `warn` to dependencies.
fn default_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

pub fn init_telemetry(level: Option<&str>) {
    let level = level.map(str::trim).filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LOG_LEVEL);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives(DEFAULT_LOG_LEVEL)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

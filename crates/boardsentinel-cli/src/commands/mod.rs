pub mod analyze;
pub mod components;
pub mod monitor;
pub mod sample;
pub mod server;

use std::time::Duration;

use boardsentinel_core::SentinelConfig;

/// Command-line values that take precedence over the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub history: Option<usize>,
    pub interval_ms: Option<u64>,
}

/// Apply overrides on top of an environment-derived config and re-validate.
pub fn apply_overrides(
    mut config: SentinelConfig,
    overrides: Overrides,
) -> boardsentinel_core::Result<SentinelConfig> {
    if let Some(model) = overrides.model {
        config.model = model.trim().to_string();
    }
    if let Some(history) = overrides.history {
        config.history_capacity = history;
    }
    if let Some(ms) = overrides.interval_ms {
        config.tick_interval = Duration::from_millis(ms);
    }
    config.validate()?;
    Ok(config)
}

/// Load configuration from the environment plus overrides, exiting on error.
pub fn load_config(overrides: Overrides) -> SentinelConfig {
    match SentinelConfig::from_env().and_then(|c| apply_overrides(c, overrides)) {
        Ok(config) => {
            log::debug!("config: {config:?}");
            config
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Initialise `env_logger`. With `muted`, logging stays off unless
/// `RUST_LOG` asks for it.
pub fn init_logging(muted: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if muted && std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Off);
    }
    let _ = builder.try_init();
}

/// Build a tokio runtime for commands that talk to the network.
pub fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    }
}

/// Seconds (as typed on the command line) to whole milliseconds.
pub fn secs_to_millis(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}

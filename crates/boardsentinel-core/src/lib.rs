//! # boardsentinel-core
//!
//! **Forensic motherboard stability analysis, on simulated hardware.**
//!
//! `boardsentinel-core` generates synthetic VRM telemetry (core voltage,
//! ripple, VRM/CPU/chipset temperatures, load), scores its stability, and
//! turns a window of readings into a natural-language diagnostic report via
//! a remote text-generation model, with deterministic local fallbacks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use boardsentinel_core::{DiagnosticReporter, OfflineGenerator, TelemetryFeed};
//!
//! # async fn demo() -> boardsentinel_core::Result<()> {
//! // The host owns the feed and decides when to tick it.
//! let mut feed = TelemetryFeed::with_capacity(50, Some(42));
//! feed.fill(10);
//!
//! let reporter = DiagnosticReporter::new(Box::new(OfflineGenerator), "gemini-3-flash-preview");
//! let report = reporter.analyze(&feed.history().snapshot()).await?;
//! println!("[{}] {}", report.risk_level, report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Ticker (host) → [`TelemetryFeed`] → [`TelemetryHistory`] → [`DiagnosticReporter`] → report
//!
//! - [`telemetry`]: reading derivation and the stability score.
//! - [`components`]: the static hardware catalog.
//! - [`diagnostics`]: window statistics, prompt, response parsing, fallbacks.
//! - [`remote`]: the [`TextGenerator`] seam and its Gemini implementation.

pub mod components;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feed;
pub mod history;
pub mod indicators;
pub mod remote;
pub mod telemetry;

pub use components::{ComponentStatus, HardwareComponent, find_component, list_components};
pub use config::SentinelConfig;
pub use diagnostics::{
    DiagnosticReport, DiagnosticReporter, MIN_ANALYSIS_READINGS, RECENT_WINDOW, ReportFields,
    RiskLevel, WindowStats, offline_report, parse_response,
};
pub use error::{Error, Result};
pub use feed::TelemetryFeed;
pub use history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY, TelemetryHistory};
pub use remote::{
    GeminiClient, GenerationRequest, OfflineGenerator, TextGenerator, generator_from_config,
};
pub use telemetry::{
    TelemetryGenerator, TelemetryReading, generate_reading, reading_for_load, stability_score,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a reporter from configuration: Gemini when a credential is set,
/// offline otherwise.
pub fn reporter_from_config(config: &SentinelConfig) -> Result<DiagnosticReporter> {
    let generator = generator_from_config(config)?;
    Ok(DiagnosticReporter::new(generator, config.model.clone()))
}

//! CLI for BoardSentinel: forensic motherboard stability monitoring.

mod commands;
mod tui;

use boardsentinel_core::MAX_HISTORY_CAPACITY;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "boardsentinel")]
#[command(about = "boardsentinel: forensic motherboard stability monitor with AI diagnostics")]
#[command(version = boardsentinel_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive stability dashboard (TUI)
    Monitor {
        /// Refresh rate in seconds (default: BOARDSENTINEL_INTERVAL_MS or 1.0)
        #[arg(long)]
        refresh: Option<f64>,

        /// Rolling history size (default: BOARDSENTINEL_HISTORY or 50)
        #[arg(long)]
        history: Option<usize>,

        /// Seed the telemetry generator for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Remote model identifier (default: BOARDSENTINEL_MODEL)
        #[arg(long)]
        model: Option<String>,
    },

    /// Print synthetic telemetry readings
    Sample {
        /// Number of readings to generate
        #[arg(
            long,
            short = 'n',
            default_value = "10",
            value_parser = clap::value_parser!(u64).range(..=MAX_HISTORY_CAPACITY as u64)
        )]
        count: u64,

        /// Seed the telemetry generator
        #[arg(long)]
        seed: Option<u64>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the motherboard component catalog
    Components {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate a telemetry window and run a diagnostic report over it.
    /// Without GEMINI_API_KEY the local fallback report is produced.
    Analyze {
        /// Readings to generate before analysis (at least 5)
        #[arg(
            long,
            default_value = "20",
            value_parser = clap::value_parser!(u64).range(5..=MAX_HISTORY_CAPACITY as u64)
        )]
        readings: u64,

        /// Seed the telemetry generator
        #[arg(long)]
        seed: Option<u64>,

        /// Remote model identifier (default: BOARDSENTINEL_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start an HTTP telemetry server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8042")]
        port: u16,

        /// Seed the telemetry generator
        #[arg(long)]
        seed: Option<u64>,

        /// Rolling history size (default: BOARDSENTINEL_HISTORY or 50)
        #[arg(long)]
        history: Option<usize>,

        /// Tick interval in milliseconds (default: BOARDSENTINEL_INTERVAL_MS or 1000)
        #[arg(long)]
        interval: Option<u64>,

        /// Remote model identifier (default: BOARDSENTINEL_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal; log lines would tear the alternate screen.
    commands::init_logging(matches!(cli.command, Commands::Monitor { .. }));

    match cli.command {
        Commands::Monitor {
            refresh,
            history,
            seed,
            model,
        } => commands::monitor::run(
            commands::Overrides {
                model,
                history,
                interval_ms: refresh.map(commands::secs_to_millis),
            },
            seed,
        ),
        Commands::Sample { count, seed, json } => commands::sample::run(count as usize, seed, json),
        Commands::Components { json } => commands::components::run(json),
        Commands::Analyze {
            readings,
            seed,
            model,
            json,
        } => commands::analyze::run(
            commands::Overrides {
                model,
                ..Default::default()
            },
            readings as usize,
            seed,
            json,
        ),
        Commands::Server {
            host,
            port,
            seed,
            history,
            interval,
            model,
        } => commands::server::run(
            commands::Overrides {
                model,
                history,
                interval_ms: interval,
            },
            &host,
            port,
            seed,
        ),
    }
}

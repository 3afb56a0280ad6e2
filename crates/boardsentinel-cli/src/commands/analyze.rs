use boardsentinel_core::{DiagnosticReport, TelemetryFeed, WindowStats, reporter_from_config};

pub fn run(overrides: super::Overrides, readings: usize, seed: Option<u64>, json: bool) {
    let config = super::load_config(overrides);
    let reporter = match reporter_from_config(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut feed = TelemetryFeed::with_capacity(config.history_capacity.max(readings), seed);
    feed.fill(readings);
    let history = feed.history().snapshot();

    if !json {
        if let Ok(stats) = WindowStats::from_history(&history) {
            println!(
                "Telemetry window (last {} of {} readings)",
                stats.samples,
                history.len()
            );
            println!("  avg stability   {:.1}%", stats.avg_stability);
            println!("  max ripple      {}mV", stats.max_ripple);
            println!("  max VRM temp    {}°C", stats.max_temp);
            println!("  current load    {}%", stats.latest_load);
            println!();
            println!(
                "Analyzing with {} via {}...",
                reporter.model(),
                reporter.generator_name()
            );
            println!();
        }
    }

    let rt = super::runtime();
    let report = match rt.block_on(reporter.analyze(&history)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_report(&report);
    }
}

fn print_report(report: &DiagnosticReport) {
    println!(
        "Risk level: {}",
        report.risk_level.to_string().to_uppercase()
    );
    println!();
    println!("{}", report.summary);
    println!();
    println!("Recommendations:");
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. {rec}", i + 1);
    }
}

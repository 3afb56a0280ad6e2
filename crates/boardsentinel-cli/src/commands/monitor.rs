use boardsentinel_core::{TelemetryFeed, reporter_from_config};

pub fn run(overrides: super::Overrides, seed: Option<u64>) {
    let config = super::load_config(overrides);
    let reporter = match reporter_from_config(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let feed = TelemetryFeed::with_capacity(config.history_capacity, seed);

    let mut app =
        crate::tui::app::App::new(feed, reporter, super::runtime(), config.tick_interval);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}

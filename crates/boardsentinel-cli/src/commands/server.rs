pub fn run(overrides: super::Overrides, host: &str, port: u16, seed: Option<u64>) {
    let config = super::load_config(overrides);

    let base = format!("http://{host}:{port}");
    let mode = if config.has_credential() {
        "remote"
    } else {
        "offline (set GEMINI_API_KEY for AI reports)"
    };

    println!("BoardSentinel Server v{}", boardsentinel_core::VERSION);
    println!("   {base}");
    println!(
        "   tick every {}ms, {} readings kept",
        config.tick_interval.as_millis(),
        config.history_capacity
    );
    println!("   diagnostics: {} [{mode}]", config.model);
    println!();
    println!("   Endpoints:");
    println!("     GET  /                  API index (try: curl {base})");
    println!("     GET  /health            Window and generator status");
    println!("     GET  /telemetry         Rolling history (?limit=N)");
    println!("     GET  /telemetry/latest  Latest reading with indicators");
    println!("     GET  /components        Hardware component catalog");
    println!("     GET  /components/{{id}}   One catalog entry (try: {base}/components/vrm-01)");
    println!("     POST /analyze           Diagnostic report over the recent window");
    println!();

    let rt = super::runtime();
    if let Err(e) = rt.block_on(boardsentinel_server::run_server(config, host, port, seed)) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

use boardsentinel_core::TelemetryFeed;
use boardsentinel_core::indicators::clock_time;

pub fn run(count: usize, seed: Option<u64>, json: bool) {
    let mut feed = TelemetryFeed::with_capacity(count.max(1), seed);
    feed.fill(count);
    let readings = feed.history().snapshot();

    if json {
        match serde_json::to_string_pretty(&readings) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{:<10} {:>5} {:>7} {:>8} {:>6} {:>6} {:>6} {:>6} {:>7} {:>5}",
        "TIME", "LOAD", "VCORE", "RIPPLE", "DRAM", "VRM", "CPU", "PCH", "CLOCK", "SCORE"
    );
    println!("{}", "-".repeat(80));
    for r in &readings {
        println!(
            "{:<10} {:>4}% {:>7.3} {:>6}mV {:>6.3} {:>6} {:>6} {:>6} {:>7} {:>4}%",
            clock_time(r.timestamp),
            r.load,
            r.vcore,
            r.vcore_ripple,
            r.dram,
            r.vrm_temp,
            r.cpu_temp,
            r.chipset_temp,
            r.clock_speed,
            r.stability_score
        );
    }
}

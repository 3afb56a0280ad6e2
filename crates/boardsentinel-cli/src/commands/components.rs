use boardsentinel_core::list_components;

pub fn run(json: bool) {
    let components = list_components();

    if json {
        match serde_json::to_string_pretty(components) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Hardware inventory: {} components", components.len());
    println!();
    println!(
        "  {:<9} {:<22} {:<9} {:<6} DETAILS",
        "ID", "COMPONENT", "STATUS", "ADDR"
    );
    println!("  {}", "-".repeat(76));
    for c in components {
        println!(
            "  {:<9} {:<22} {:<9} {:<6} {}",
            c.id,
            c.name,
            c.status.to_string().to_uppercase(),
            c.address,
            c.details
        );
    }
}

use std::path::PathBuf;

pub fn run(groups_file: Option<PathBuf>) {
    let universe = match super::load_universe(groups_file) {
        Ok(universe) => universe,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("📋 Configured indices\n");
    for index in &universe.indices {
        println!("   {:<12} {} tickers", index.name, index.tickers.len());
    }
}

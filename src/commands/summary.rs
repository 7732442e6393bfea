use std::path::PathBuf;

use crate::analysis::AoSummary;
use crate::services::{Screener, YahooFinanceClient};

pub fn run(csv_path: Option<PathBuf>, groups_file: Option<PathBuf>) {
    let universe = match super::load_universe(groups_file) {
        Ok(universe) => universe,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "📊 Daily AO < 0 Count Summary (last {} days, {} indices)\n",
        crate::constants::SUMMARY_DAYS,
        universe.index_count()
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = runtime.block_on(async {
        let client = YahooFinanceClient::new()?;
        let screener = Screener::new(client);
        screener.summary(&universe).await
    });

    let (summary, diagnostics) = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ Summary failed: {}", e);
            std::process::exit(1);
        }
    };

    for diagnostic in &diagnostics {
        println!("⚠️  {}", diagnostic);
    }
    if !diagnostics.is_empty() {
        println!();
    }

    if summary.is_empty() {
        println!("ℹ️  No daily AO data available.");
        return;
    }

    print_table(&summary);

    if let Some(path) = csv_path {
        match summary.write_csv(&path) {
            Ok(()) => println!("\n💾 Saved summary to {}", path.display()),
            Err(e) => {
                eprintln!("❌ Failed to write CSV: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_table(summary: &AoSummary) {
    print!("{:<12}", "Date");
    for column in summary.columns() {
        print!(" {:>12}", column);
    }
    println!();

    for &date in summary.dates() {
        print!("{:<12}", date.format("%Y-%m-%d"));
        for column in summary.columns() {
            match summary.count(date, column) {
                Some(count) => print!(" {:>12}", count),
                None => print!(" {:>12}", "-"),
            }
        }
        println!();
    }
}

use std::path::PathBuf;

use crate::services::{Screener, YahooFinanceClient};

pub fn run(index_name: String, groups_file: Option<PathBuf>) {
    let universe = match super::load_universe(groups_file) {
        Ok(universe) => universe,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let Some(index) = universe.get(&index_name).cloned() else {
        eprintln!("❌ Unknown index: {}", index_name);
        eprintln!("   Available: {}", universe.names().join(", "));
        std::process::exit(1);
    };

    println!("🔎 Scanning {} ({} tickers)...\n", index.name, index.tickers.len());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let report = runtime.block_on(async {
        let client = YahooFinanceClient::new()?;
        let screener = Screener::new(client);
        screener.scan(&index).await
    });

    match report {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("❌ Scan failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &crate::services::ScanReport) {
    println!(
        "Tickers with latest Daily AO < 0 ({} of {}): {}",
        report.negative.len(),
        report.member_count,
        report.negative.join(", ")
    );

    for diagnostic in &report.diagnostics {
        println!("⚠️  {}", diagnostic);
    }

    if report.triggers.is_empty() {
        println!("\nℹ️  No H1 EMA20 cross-up triggers found.");
        return;
    }

    println!("\n📈 H1 EMA20 Cross-Up Triggers (Daily AO < 0)\n");
    println!(
        "{:<12} {:<10} {:<10} {:<32} {:>12}",
        "Date", "Time", "Ticker", "Name", "Price"
    );

    for event in &report.triggers {
        let name = report
            .names
            .get(&event.ticker)
            .map(String::as_str)
            .unwrap_or(event.ticker.as_str());
        println!(
            "{:<12} {:<10} {:<10} {:<32} {:>12.4}",
            event.date.format("%Y-%m-%d"),
            event.time.format("%H:%M:%S"),
            event.ticker,
            name,
            event.price
        );
    }

    println!("\n✅ {} trigger(s) found", report.triggers.len());
}

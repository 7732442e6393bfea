use crate::constants::PRICE_DECIMALS;

/// Round a price to the display precision used for trigger rows
pub fn round_price(value: f64) -> f64 {
    let factor = 10_f64.powi(PRICE_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Get the market data API base URL from environment variable or use default
pub fn api_base_url() -> String {
    std::env::var("AOSCREENER_API_BASE")
        .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string())
}

//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a cedi amount, e.g. `GH₵12.50`
pub fn format_cedi(amount: Decimal) -> String {
    format!("GH₵{:.2}", amount.round_dp(2))
}

/// Format a coin count with its unit
pub fn format_coins(coins: u64) -> String {
    if coins == 1 {
        "1 coin".to_string()
    } else {
        format!("{} coins", coins)
    }
}

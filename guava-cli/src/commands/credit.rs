//! Credit command - add coins to the signed-in balance

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::get_context;
use crate::output::{self, format_coins};

pub fn run(amount: u64, json: bool) -> Result<()> {
    let ctx = get_context()?;

    match ctx.session_service.credit(amount)? {
        Some(balance) => {
            if json {
                println!("{}", json!({ "credited": amount, "balance": balance }));
            } else {
                println!(
                    "{} Credited {}. Balance: {}",
                    "✓".green(),
                    format_coins(amount),
                    format_coins(balance).bold()
                );
            }
        }
        None => {
            if json {
                println!("{}", json!({ "credited": 0, "balance": null }));
            } else {
                output::warning("Not signed in, nothing was credited. Run `gv login` first.");
            }
        }
    }

    Ok(())
}

//! Wallet commands - balance dashboard and withdrawal requests

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;
use crate::output::{self, format_cedi};

pub fn summary(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summary = ctx.wallet_service.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Wallet".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Coins".to_string(), summary.coins.to_string()]);
    table.add_row(vec!["Cedi value".to_string(), format_cedi(summary.cedi)]);
    table.add_row(vec![
        "Approved uploads".to_string(),
        format!("{} of {}", summary.approved_uploads, summary.total_uploads),
    ]);
    table.add_row(vec![
        "Total earnings".to_string(),
        format!("{} coins", summary.total_earnings),
    ]);
    println!("{}", table);

    if summary.can_withdraw {
        println!("{}", "Ready to withdraw. Run `gv withdraw <mobile-number>`.".green());
    } else {
        println!("{}", "Withdrawals open at GH₵10.00.".dimmed());
    }
    Ok(())
}

pub fn withdraw(mobile_number: &str, force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summary = ctx.wallet_service.summary()?;

    if summary.can_withdraw
        && !force
        && !json
        && !Confirm::new()
            .with_prompt(format!(
                "Withdraw {} to {}?",
                format_cedi(summary.cedi),
                mobile_number.trim()
            ))
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let receipt = ctx.wallet_service.withdraw(mobile_number)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    println!(
        "\n{} Withdrawal of {} requested to {}",
        "✓".green(),
        format_cedi(receipt.amount).bold(),
        receipt.mobile_number
    );
    println!("{}\n", "Funds arrive by mobile money within 24 hours.".dimmed());
    Ok(())
}

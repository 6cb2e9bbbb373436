//! Session commands - login, logout and whoami

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use serde_json::json;

use guava_core::domain::wallet::coins_to_cedi;
use guava_core::Session;

use super::{block_on, get_context, spinner};
use crate::output::{self, format_cedi, format_coins};

fn session_json(session: &Session) -> serde_json::Value {
    let identity = session.identity();
    json!({
        "signed_in": true,
        "id": identity.id,
        "name": identity.name,
        "email": identity.email,
        "avatar": identity.avatar,
        "coins": session.coins(),
    })
}

pub fn login(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let pb = spinner(
        &format!("Signing in with {}...", ctx.session_service.provider_name()),
        json,
    );
    let result = block_on(ctx.session_service.sign_in())?;
    pb.finish_and_clear();
    let session = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session_json(&session))?);
        return Ok(());
    }

    println!(
        "\n{} Signed in as {} <{}>",
        "✓".green(),
        session.identity().name.bold(),
        session.identity().email
    );
    println!("  Balance: {}\n", format_coins(session.coins()));
    Ok(())
}

pub fn logout(force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let was_signed_in = ctx.session_service.is_signed_in();
    if was_signed_in
        && !force
        && !json
        && !Confirm::new()
            .with_prompt("Sign out?")
            .default(true)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    ctx.session_service.sign_out()?;

    if json {
        println!("{}", json!({ "signed_out": true, "was_signed_in": was_signed_in }));
    } else if was_signed_in {
        output::success("Signed out");
    } else {
        output::info("Not signed in");
    }
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let session = match ctx.session_service.current() {
        Some(session) => session,
        None => {
            if json {
                println!("{}", json!({ "signed_in": false }));
            } else {
                output::info("Not signed in. Run `gv login` to start.");
            }
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session_json(&session))?);
        return Ok(());
    }

    let identity = session.identity();
    let mut table = output::create_table();
    table.add_row(vec!["Name", identity.name.as_str()]);
    table.add_row(vec!["Email", identity.email.as_str()]);
    table.add_row(vec!["Avatar", identity.avatar.as_str()]);
    table.add_row(vec!["Coins".to_string(), session.coins().to_string()]);
    table.add_row(vec![
        "Value".to_string(),
        format_cedi(coins_to_cedi(session.coins())),
    ]);
    println!("{}", table);
    Ok(())
}

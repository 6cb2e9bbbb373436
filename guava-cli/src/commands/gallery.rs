//! Gallery commands - browse community images and vote

use anyhow::Result;
use colored::Colorize;

use guava_core::Vote;

use super::get_context;
use crate::output;

fn vote_marker(vote: Option<Vote>) -> String {
    match vote {
        Some(Vote::Up) => "▲".green().to_string(),
        Some(Vote::Down) => "▼".red().to_string(),
        None => String::new(),
    }
}

pub fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let entries = ctx.gallery_service.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Community Gallery".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Image", "Up", "Down", "Score", "Your vote"]);
    for entry in &entries {
        table.add_row(vec![
            entry.image.id.clone(),
            entry.image.label.clone(),
            entry.image.upvotes.to_string(),
            entry.image.downvotes.to_string(),
            entry.image.score().to_string(),
            vote_marker(entry.my_vote),
        ]);
    }
    println!("{}", table);

    if !ctx.session_service.is_signed_in() {
        println!("{}", "Sign in with `gv login` to vote.".dimmed());
    }
    Ok(())
}

pub fn vote(image_id: &str, direction: &str, json: bool) -> Result<()> {
    let vote: Vote = direction.parse()?;
    let ctx = get_context()?;
    let entry = ctx.gallery_service.vote(image_id, vote)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    println!(
        "{} Voted {} on {} ({} up, {} down)",
        "✓".green(),
        vote,
        entry.image.label.bold(),
        entry.image.upvotes,
        entry.image.downvotes
    );
    Ok(())
}

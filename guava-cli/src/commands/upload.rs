//! Upload commands - submit an image and review upload history

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use guava_core::domain::FieldError;
use guava_core::{Category, Error, ImageFile, UploadStatus, UploadSubmission};

use super::{block_on, get_context, spinner};
use crate::output::{self, format_coins};

/// Form fields collected from the command line
pub struct UploadArgs<'a> {
    pub file: &'a Path,
    pub name: &'a str,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub consent: bool,
}

fn read_image(path: &Path) -> Result<ImageFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageFile::new(file_name, bytes))
}

fn print_field_errors(errors: &[FieldError]) {
    output::error("Upload rejected:");
    for e in errors {
        eprintln!("  {} {}", format!("{}:", e.field).red(), e.message);
    }
}

pub fn submit(args: UploadArgs<'_>, json: bool) -> Result<()> {
    let category = args.category.map(str::parse::<Category>).transpose()?;
    let submission = UploadSubmission {
        file: Some(read_image(args.file)?),
        name: args.name.to_string(),
        category,
        description: args.description.unwrap_or_default().to_string(),
        location: args.location.unwrap_or_default().to_string(),
        consent: args.consent,
    };

    let ctx = get_context()?;

    let pb = spinner("Uploading...", json);
    let result = block_on(ctx.upload_service.submit(&submission))?;
    pb.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(Error::InvalidUpload(errors)) if !json => {
            print_field_errors(&errors);
            bail!("{} field(s) need attention", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "\n{} Uploaded {} and earned {}",
        "✓".green(),
        outcome.record.name.bold(),
        format_coins(outcome.record.coins)
    );
    println!("  Balance: {}\n", format_coins(outcome.balance));
    Ok(())
}

fn status_cell(status: UploadStatus) -> String {
    match status {
        UploadStatus::Approved => status.as_str().green().to_string(),
        UploadStatus::Pending => status.as_str().yellow().to_string(),
        UploadStatus::Rejected => status.as_str().red().to_string(),
    }
}

pub fn history(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let records = ctx.upload_service.history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No uploads yet. Use `gv upload` to contribute an image.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Name", "Category", "Status", "Coins"]);
    for record in &records {
        table.add_row(vec![
            record.date.to_string(),
            record.name.clone(),
            record.category.map(|c| c.label().to_string()).unwrap_or_default(),
            status_cell(record.status),
            record.coins.to_string(),
        ]);
    }
    println!("{}", table);

    let stats = ctx.upload_service.stats()?;
    println!(
        "{} uploads: {} approved, {} pending, {} rejected. Earned {}.",
        stats.total,
        stats.approved,
        stats.pending,
        stats.rejected,
        format_coins(stats.coins_earned)
    );
    Ok(())
}

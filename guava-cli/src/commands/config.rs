//! Config command - view and change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use guava_core::config::Config;

use super::get_guava_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings (environment overrides applied)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting: storage, signInLatencyMs or uploadLatencyMs
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

fn config_json(config: &Config) -> serde_json::Value {
    json!({
        "storage": config.storage.as_str(),
        "signInLatencyMs": config.sign_in_latency.as_millis() as u64,
        "uploadLatencyMs": config.upload_latency.as_millis() as u64,
    })
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let guava_dir = get_guava_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&guava_dir)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&config_json(&config))?);
                return Ok(());
            }

            println!("{}", "Settings".bold());
            println!();

            let mut table = output::create_table();
            table.add_row(vec!["storage".to_string(), config.storage.to_string()]);
            table.add_row(vec![
                "signInLatencyMs".to_string(),
                config.sign_in_latency.as_millis().to_string(),
            ]);
            table.add_row(vec![
                "uploadLatencyMs".to_string(),
                config.upload_latency.as_millis().to_string(),
            ]);
            println!("{}", table);
            println!("{}", format!("Data directory: {}", guava_dir.display()).dimmed());
        }
        ConfigCommands::Set { key, value } => {
            std::fs::create_dir_all(&guava_dir)?;
            let mut config = Config::load_saved(&guava_dir)?;
            config.set(&key, &value)?;
            config.save(&guava_dir)?;

            output::success(&format!("Set {} = {}", key, value.trim()));
            if key == "storage" {
                output::warning("Slots already saved in the other backend are not moved.");
            }
        }
    }

    Ok(())
}

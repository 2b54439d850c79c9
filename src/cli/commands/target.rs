use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TargetCommands {
    #[command(about = "Remember the platform to prune")]
    Set {
        #[arg(help = "Platform base URL")]
        url: String,
        #[arg(long, help = "Platform API key")]
        api_key: Option<String>,
        #[arg(long, help = "Username whose sample projects are also removed")]
        user: Option<String>,
    },

    #[command(about = "Show the stored platform target")]
    Show,

    #[command(about = "Forget the stored platform target")]
    Clear,
}

pub fn handle(cmd: TargetCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TargetCommands::Set { url, api_key, user } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;

            let target = TargetConfig::new(url, api_key, user);
            save_target_config(&target)?;

            output_success(
                &output_format,
                &format!("Target set to {}", target.url),
                Some(json!({ "url": target.url })),
            )
        }
        TargetCommands::Show => {
            let target = load_target_config()?;

            match output_format {
                OutputFormat::Json => {
                    let value = target.map(|t| {
                        json!({
                            "url": t.url,
                            "api_key_set": t.api_key.is_some(),
                            "username": t.username,
                            "added_at": t.added_at
                        })
                    });
                    println!("{}", serde_json::to_string_pretty(&json!({ "target": value }))?);
                }
                OutputFormat::Text => match target {
                    Some(t) => {
                        println!("URL: {}", t.url);
                        println!("API key: {}", if t.api_key.is_some() { "set" } else { "not set" });
                        if let Some(user) = &t.username {
                            println!("User: {}", user);
                        }
                        println!("Added: {}", t.added_at.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                    None => println!("No target set"),
                },
            }

            Ok(())
        }
        TargetCommands::Clear => {
            if !clear_target_config()? {
                return Err(anyhow::anyhow!("No target set"));
            }
            output_success(&output_format, "Target cleared", None)
        }
    }
}

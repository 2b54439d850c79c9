pub mod commands;
pub mod config;
pub mod utils;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "prune")]
#[command(about = "Remove prefix-named test resources from a platform")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Delete every resource whose name starts with the prefix")]
    Run(commands::run::RunArgs),

    #[command(about = "Show the resource kinds swept by a run")]
    Kinds {
        #[command(flatten)]
        flags: FlagArgs,
    },

    #[command(about = "Stored platform target management")]
    Target {
        #[command(subcommand)]
        cmd: commands::target::TargetCommands,
    },
}

/// Flags that switch whole resource kinds off
#[derive(Args, Debug, Clone, Default)]
pub struct FlagArgs {
    #[arg(long, help = "The platform has no teams support")]
    pub teams_disabled: bool,

    #[arg(long, help = "Target is OpenShift Online (no admin resources)")]
    pub openshift_online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Run(args) => commands::run::handle(args, output_format).await,
        Commands::Kinds { flags } => commands::kinds::handle(flags, output_format),
        Commands::Target { cmd } => commands::target::handle(cmd, output_format),
    }
}

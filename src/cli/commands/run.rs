use std::sync::Arc;

use clap::Args;

use crate::cli::config::{apply_target, load_target_config};
use crate::cli::utils::output_run_report;
use crate::cli::{FlagArgs, OutputFormat};
use crate::config::AppConfig;
use crate::platform::PlatformClient;
use crate::prune::Orchestrator;
use crate::types::RunConfig;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(help = "Name prefix of the resources to delete (case-insensitive)")]
    pub prefix: String,

    #[command(flatten)]
    pub flags: FlagArgs,

    #[arg(long, help = "OpenShift token passed to environment deletion")]
    pub token: Option<String>,

    #[arg(long, help = "Username whose sample projects are also removed")]
    pub user: Option<String>,

    #[arg(long, help = "Platform base URL")]
    pub url: Option<String>,

    #[arg(long, help = "Platform API key")]
    pub api_key: Option<String>,
}

/// CLI flags override the environment, which overrides the stored target
pub fn resolve_config(args: &RunArgs, base: AppConfig) -> anyhow::Result<(AppConfig, RunConfig)> {
    let mut app = base;
    if let Some(url) = &args.url {
        app.platform.base_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(key) = &args.api_key {
        app.platform.api_key = Some(key.clone());
    }
    if let Some(user) = &args.user {
        app.platform.username = Some(user.clone());
    }

    let run = RunConfig::new(&args.prefix)?
        .with_teams_disabled(args.flags.teams_disabled || app.defaults.teams_disabled)
        .with_openshift_online(args.flags.openshift_online || app.defaults.openshift_online)
        .with_auth_token(args.token.clone().or_else(|| app.defaults.openshift_token.clone()));

    Ok((app, run))
}

pub async fn handle(args: RunArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let target = load_target_config()?;
    let base = apply_target(AppConfig::from_env(), target.as_ref());
    let (app, run_config) = resolve_config(&args, base)?;

    let client = Arc::new(PlatformClient::new(&app.platform)?);
    tracing::info!("Pruning '{}' on {}", run_config.prefix, client.base_url());

    let orchestrator = Orchestrator::new(client.clone(), client);
    let result = orchestrator.execute(&run_config).await;

    output_run_report(&output_format, &result)?;

    result.into_result()?;
    Ok(())
}

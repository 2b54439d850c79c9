use crate::cli::utils::output_catalogue;
use crate::cli::{FlagArgs, OutputFormat};
use crate::prune::catalogue;
use crate::types::RunConfig;

pub fn handle(flags: FlagArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    // Placeholder prefix; only the flags matter for the table
    let config = RunConfig::new("*")?
        .with_teams_disabled(flags.teams_disabled)
        .with_openshift_online(flags.openshift_online);

    output_catalogue(&output_format, &catalogue(), &config)
}

use clap::Parser;

use push_relay::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = cli::load_and_merge_config(&cli)?;

    if cli.is_serve() {
        cli::init_logger_from_settings(&settings)?;
    }

    cli::execute_command(&cli, settings, environment).await?;

    Ok(())
}

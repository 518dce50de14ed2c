use clap::Parser;

use warden_cli::{App, Cli};
use warden_infra::AuthConfig;

fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let cli = Cli::parse();
    let config = AuthConfig::load(cli.config.as_deref())?;

    let app = App::bootstrap(&config)?;
    let output = app.execute(&cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

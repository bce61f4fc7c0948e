use anyhow::Result;
use clap::Parser;
use walletd::cli::Cli;
use walletd::config::load_env_file;

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file()?;
    let cli = Cli::parse();
    cli.run().await
}

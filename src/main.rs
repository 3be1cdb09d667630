use clap::Parser;
use user_directory::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Migrate(args) => cli::migrate::run(args).await,
    }
}

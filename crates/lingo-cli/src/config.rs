use clap::{Parser, Subcommand};

use crate::commands::{create_language::CreateLanguageCmd, seed::SeedCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for lingo - manages dictionary data directly in the database."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Loads languages and translations, built-in demo set is used without a file
    Seed(SeedCmd),
    CreateLanguage(CreateLanguageCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Seed(cmd) => cmd.run().await,
            Command::CreateLanguage(cmd) => cmd.run().await,
        }
    }
}

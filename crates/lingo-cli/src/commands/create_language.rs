use clap::Parser;
use lingo_dal::language::{CreateLanguage, LanguageRepository};
use lingo_types::config::BackendConfig;

use crate::commands::{open_database, Executor};

#[derive(Parser, Debug)]
pub struct CreateLanguageCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Language name, e.g. english")]
    name: String,
    #[arg(short, long, help = "Language code, e.g. en")]
    code: String,
}

impl Executor for CreateLanguageCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_database(&self.backend).await?;
        let repository = LanguageRepository::new(pool);
        let language = repository
            .create(CreateLanguage {
                name: self.name,
                code: self.code,
            })
            .await?;
        println!("Created language {} ({})", language.name, language.code);
        Ok(())
    }
}

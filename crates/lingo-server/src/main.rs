use lingo_server::{config::ServerConfig, logging::init_logging, run::run, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerConfig::load()?;
    init_logging(args.mode)?;
    run(args).await
}

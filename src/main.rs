use clap::Parser;
use schemasync::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    cli::run(cli).await?;

    Ok(())
}

use std::io;

use clap::Parser;
use gallery_cli::{args, commands, logging, Cli, Command, Services, Session};
use tokio::io::BufReader;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let config = args::resolve_config(&cli.global)?;
    debug!(base_url = %config.base_url, culture = %config.culture, page_size = config.page_size, "configuration resolved");
    let services = Services::from_config(&config)?;

    match cli.command {
        Command::Search { query, pages } => {
            commands::search(&services, query, pages, &mut io::stdout()).await
        }
        Command::Detail { id } => commands::detail(&services, id, &mut io::stdout()).await,
        Command::Browse { query } => {
            let mut session = Session::new(services, query, io::stdout());
            session.run(BufReader::new(tokio::io::stdin())).await
        }
    }
}

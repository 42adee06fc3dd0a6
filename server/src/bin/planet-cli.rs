mod cli;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands, MessagePrinter};
use planet_shared::Action;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut printer = MessagePrinter::new(cli.json);

    let action = match cli.command {
        Commands::Watch {
            name,
            keep_alive_ms,
        } => {
            return cli::watch_ws(
                &cli.server,
                name,
                Duration::from_millis(keep_alive_ms),
                &mut printer,
            )
            .await;
        }
        Commands::Join { name } => Action::Join { player_id: name },
        Commands::Start => Action::Start,
        Commands::Stop => Action::Stop,
        Commands::Drop { kind, angle, y } => Action::Drop { kind, angle, y },
        Commands::Destroy { id } => Action::Destroy { item_id: id },
    };

    cli::run_once_ws(&cli.server, vec![action], cli.wait_ms, &mut printer).await
}

mod cli;
mod commands;
mod logger;

use belle_client::{BelleClient, ClientConfig, SessionEvent};
use clap::Parser;
use cli::{Cli, Command};
use tokio::sync::broadcast::{self, error::TryRecvError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Guard must outlive every log call
    let _log_guard = logger::init_logger(cli.log_dir.as_deref())?;

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(path) = cli.session_file {
        config = config.with_session_file(path);
    }
    tracing::debug!(base_url = %config.base_url, timeout = config.timeout, "Client configured");

    let client = BelleClient::new(config)?;
    let mut events = client.session().subscribe();

    let as_json = cli.json;
    let result = match cli.command {
        Command::Login { username, password } => {
            commands::login(&client, username, password, as_json).await
        }
        Command::Logout => commands::logout(&client).await,
        Command::Whoami => commands::whoami(&client, as_json).await,
        Command::Sales(command) => commands::sales(&client, command, as_json).await,
        Command::Users(command) => commands::users(&client, command, as_json).await,
        Command::Products(command) => commands::products(&client, command, as_json).await,
        Command::Charts(args) => commands::charts(&client, args, as_json).await,
    };

    report_session_events(&mut events);
    result
}

/// Print a hint when the backend rejected the stored token during the command.
fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::LoginRequired) => {
                eprintln!("Sessão expirada. Execute `belle login` para entrar novamente.");
            }
            Ok(event) => tracing::debug!(?event, "Session event"),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Session events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

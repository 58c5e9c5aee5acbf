//! `mailtriage` - review and delete POP3 spam in batches from the terminal.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod setup;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use mailtriage_core::{Config, Error, Session, SessionOptions, connect_and_login};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the tables
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Fatal: {e:?}");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let path = Config::default_path();
    let config = setup::load_or_create(&path).await?;
    let password = setup::password(&config)?;

    let creds = &config.credentials;
    info!("Connecting to {} as {}", creds.pop_domain, creds.username);
    let mailbox =
        match connect_and_login(&config.pop3_config(), &creds.username, &password.secret).await {
            Ok(mailbox) => mailbox,
            Err(e) => {
                if matches!(e, Error::Authentication(_)) {
                    setup::forget(&config, &password);
                }
                return Err(e.into());
            }
        };
    setup::remember(&config, &password);

    let stdout = io::stdout();
    let options = SessionOptions {
        styled: stdout.is_terminal(),
        ..SessionOptions::from(&config.prefs)
    };
    let mut session = Session::start(mailbox, &options, io::stdin().lock(), stdout.lock()).await?;
    session.run().await?;

    // Deletions only take effect once the server sees QUIT
    session.close().await?;
    info!("Session finished");
    Ok(())
}

/// Short explanation for the operator; details are in the log.
fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(Error::Connection(detail)) => format!("Connection to the server failed: {detail}"),
        Some(Error::Authentication(_)) => "Invalid credentials".to_string(),
        Some(Error::ProtocolTimeout(detail)) => {
            format!("The server stopped responding ({detail}); no deletions were committed")
        }
        _ => format!("Error: {err:#}"),
    }
}

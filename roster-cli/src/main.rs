//! roster - interactive shell for the employee record API
//!
//! Reads one command per line from stdin and prints the active view after
//! each one. Configuration comes from the environment (or `.env`):
//! `ROSTER_API_URL`, `ROSTER_TIMEOUT_SECS`, `ROSTER_SESSION_PATH`.

mod command;
mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use roster_client::{ActionError, App, ClientConfig, Route};
use tokio::io::{AsyncBufReadExt, BufReader};

use command::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr, the view goes to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_client=info,roster_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("invalid configuration")?;
    tracing::info!(api = %config.base_url, "Starting roster");

    let mut app = App::from_config(&config)?;
    app.sync().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{}> ", render::screen(&app.render()));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let cmd = match command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if let Err(e) = run(&mut app, cmd).await {
            // view errors are already part of the rendered screen
            if !matches!(e.downcast_ref::<ActionError>(), Some(ActionError::View(_))) {
                println!("{e:#}");
            }
        }
    }

    tracing::info!("Bye");
    Ok(())
}

async fn run(app: &mut App, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Login { username, password } => app.login(&username, &password).await?,
        Command::Register {
            username,
            password,
            role,
        } => {
            if app.route() == &Route::Login {
                app.show_register()?;
            }
            app.register(&username, &password, role).await?;
        }
        Command::Back => app.back().await?,
        Command::Open(id) => app.select(id).await?,
        Command::New => app.create()?,
        Command::Edit => app.edit().await?,
        Command::Set { field, value } => app.set_field(&field, &value)?,
        Command::Save => {
            let employee = app.save().await?;
            println!("Saved employee {} ({})", employee.id, employee.name());
        }
        Command::Cancel => app.cancel().await?,
        Command::Delete => app.delete().await?,
        Command::Pdf(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let path = app.download_pdf(&dir).await?;
            println!("PDF saved to {}", path.display());
        }
        Command::Refresh => app.refresh().await?,
        Command::Dismiss => app.dismiss_error(),
        Command::Logout => app.logout(),
        Command::Help => println!("{}", command::HELP),
        Command::Quit => {}
    }
    Ok(())
}

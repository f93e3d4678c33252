//! calreport CLI entry point.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{debug, error};

use calreport_cli::cli::{Cli, Command, ConfigAction};
use calreport_cli::commands;
use calreport_cli::config::ClientConfig;
use calreport_cli::error::ClientResult;
use calreport_core::{daily_cutoff, init_tracing, TracingConfig};
use calreport_providers::google::{GoogleCalendarClient, GoogleSession};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };

    let debug = cli.debug || config.as_ref().is_ok_and(|c| c.debug);
    let mut tracing_config = TracingConfig::cli(debug).with_format(cli.log_format.into());
    if let Some(ref filter) = cli.log_filter {
        tracing_config = tracing_config.with_env_filter(filter);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    match &cli.command {
        Command::ShowOwner => {
            let client = connect(&cli, &config).await?;
            print_report(&commands::report::show_owner(&client).await?);
        }
        Command::ShowEvents { calendar_id } => {
            let client = connect(&cli, &config).await?;
            let out = commands::report::show_events(&client, calendar_id, &config.report).await?;
            print_report(&out);
        }
        Command::ShowDailyUpdatedEvents { calendar_id } => {
            let client = connect(&cli, &config).await?;
            let cutoff = daily_cutoff(Utc::now());
            debug!("daily cutoff: {}", cutoff);
            let out =
                commands::report::show_daily_updated(&client, calendar_id, cutoff, &config.report)
                    .await?;
            print_report(&out);
        }
        Command::Auth { force, sign_out } => {
            let session = session(&cli, &config)?;
            if *sign_out {
                commands::auth::sign_out(&session)?;
            } else {
                commands::auth::google(&session, *force).await?;
            }
        }
        Command::Config { action } => {
            let path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
            match action {
                ConfigAction::Dump => commands::config::dump(&config, &path)?,
                ConfigAction::Validate => {
                    commands::config::validate(&config, &cli.credential_overrides())?
                }
                ConfigAction::Path => commands::config::path(&path)?,
            }
        }
    }
    Ok(())
}

fn session(cli: &Cli, config: &ClientConfig) -> ClientResult<GoogleSession> {
    let google = config.google_config(&cli.credential_overrides())?;
    Ok(GoogleSession::new(google)?)
}

async fn connect(cli: &Cli, config: &ClientConfig) -> ClientResult<GoogleCalendarClient> {
    Ok(session(cli, config)?.client().await?)
}

/// Prints a report with a blank line before and after it.
fn print_report(report: &str) {
    println!();
    print!("{}", report);
    println!();
}

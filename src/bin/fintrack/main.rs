//! A command-line client for a personal-finance REST API.

use std::{fs::OpenOptions, path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use fintrack::{
    ApiClient, AppState, ClientConfig, Error, SessionStore, capitalise_first_char,
    config::ConfigOverrides,
};

mod commands;
mod output;

use commands::Command;
use output::Output;

/// Track accounts, categories and transactions, and see where the money goes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the REST API. Overrides FINTRACK_BACKEND_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// The file the login is saved in between runs. Overrides
    /// FINTRACK_SESSION_PATH.
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,

    /// The canonical timezone used to work out today's date, e.g.
    /// "Asia/Kolkata". Overrides FINTRACK_TIMEZONE.
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let config = ClientConfig::resolve(ConfigOverrides {
        base_url: args.base_url,
        session_path: args.session_path,
        timezone: args.timezone,
    })
    .inspect_err(|error| print_error(error))?;

    let session = SessionStore::open(&config.session_path).inspect_err(|error| {
        print_error(format!(
            "could not open the session file at {:?}: {error}",
            config.session_path
        ))
    })?;
    let api = ApiClient::new(&config.base_url).inspect_err(|error| print_error(error))?;
    let mut state = AppState::restore(api, &session).inspect_err(|error| print_error(error))?;

    let output = Output::new(args.json, config.currency.clone());
    let result = commands::execute(args.command, &mut state, &config, &output).await;

    let notices = state.take_notices();
    for notice in &notices {
        output.notice(notice);
    }

    // Errors that were not already reported as a notice, e.g. not being logged in.
    if let Err(error) = &result
        && notices.iter().all(|notice| !notice.is_error())
    {
        print_error(error);
    }

    state
        .persist(&session)
        .inspect_err(|error| print_error(format!("could not save the session: {error}")))?;

    result
}

fn setup_logging() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let debug_log = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
    {
        Ok(log_file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(LevelFilter::DEBUG),
        ),
        Err(error) => {
            eprintln!("Could not open debug.log, debug logging is disabled: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_log)
        .with(debug_log)
        .init();
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

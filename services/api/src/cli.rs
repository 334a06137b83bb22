use crate::preview::{run_preview, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use freight_quote::config::{AppConfig, ConfigError};
use freight_quote::error::AppError;
use freight_quote::quotes::SqliteQuoteStore;

#[derive(Parser, Debug)]
#[command(
    name = "Freight Quote Intake",
    about = "Receive freight quote requests, record them, and notify the operations inbox",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Create the quotes table if it does not exist
    Migrate(MigrateArgs),
    /// Validate a JSON payload file and print the notification it would send
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MigrateArgs {
    /// SQLite URL, e.g. sqlite://quotes.db (defaults to DATABASE_URL)
    #[arg(long)]
    pub(crate) database_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Migrate(args) => run_migrate(args).await,
        Command::Preview(args) => run_preview(args),
    }
}

async fn run_migrate(args: MigrateArgs) -> Result<(), AppError> {
    let url = match args.database_url {
        Some(url) => url,
        None => AppConfig::load()?
            .storage
            .database_url
            .ok_or(ConfigError::MissingDatabaseUrl)?,
    };

    SqliteQuoteStore::connect(&url).await?;
    println!("quotes table ready at {url}");
    Ok(())
}

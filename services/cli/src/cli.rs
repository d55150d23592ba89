use crate::property::{run_transform, TransformArgs};
use crate::session::{run_kyc, run_login, run_logout, run_show, KycArgs, LoginArgs};
use clap::{Parser, Subcommand};
use propertyhub::config::AppConfig;
use propertyhub::error::AppError;
use propertyhub::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "propertyhub",
    about = "Inspect the marketplace session store and shape listings for display",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the persisted sign-in session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Work with listings API records
    Property {
        #[command(subcommand)]
        command: PropertyCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Print the stored session, if any
    Show,
    /// Store a session as if the user had just signed in
    Login(LoginArgs),
    /// Sign out and clear per-user reminder records
    Logout,
    /// Report whether an identity verification prompt is due
    Kyc(KycArgs),
}

#[derive(Subcommand, Debug)]
enum PropertyCommand {
    /// Convert a record (or array of records) into display form
    Transform(TransformArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, "configuration loaded");

    match cli.command {
        Command::Session { command } => match command {
            SessionCommand::Show => run_show(&config).await,
            SessionCommand::Login(args) => run_login(&config, args).await,
            SessionCommand::Logout => run_logout(&config).await,
            SessionCommand::Kyc(args) => run_kyc(&config, args).await,
        },
        Command::Property {
            command: PropertyCommand::Transform(args),
        } => run_transform(args),
    }
}

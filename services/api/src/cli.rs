use crate::demo::{run_demo, run_payout_date, run_withholding, DemoArgs, PayoutDateArgs, WithholdingArgs};
use crate::server;
use campaign_engine::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Campaign Engine",
    about = "Run the campaign application and settlement engine or inspect its payout rules",
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
    /// Print the payout date a withdrawal requested on a given day is scheduled for
    PayoutDate(PayoutDateArgs),
    /// Print the withholding breakdown for a withdrawal amount
    Withholding(WithholdingArgs),
    /// Walk one applicant from application to withdrawal against in-memory stores
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Campaign directory CSV export loaded at start-up
    #[arg(long)]
    pub(crate) campaigns: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::PayoutDate(args) => run_payout_date(args),
        Command::Withholding(args) => run_withholding(args),
        Command::Demo(args) => run_demo(args),
    }
}

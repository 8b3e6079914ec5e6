use crate::commands::{run_explain, run_predict, run_train, ExplainArgs, PredictArgs, TrainArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_guard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "loan-guard",
    about = "Train the loan screening model and score applications from the command line",
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
    /// Fit the encoders, scaler, and forest from a loan CSV and write the artifacts
    Train(TrainArgs),
    /// Score one applicant with the trained model
    Predict(PredictArgs),
    /// List the rule-based risk advisories for one applicant
    Explain(ExplainArgs),
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Train(args) => run_train(args),
        Command::Predict(args) => run_predict(args),
        Command::Explain(args) => run_explain(args),
    }
}

use crate::demo::{run_criteria, run_demo, CriteriaArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use imobireview::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ImobiReview",
    about = "Run the ImobiReview review service or walk through the review flow from the command line",
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
    /// Print the rating criteria for a reviewer and, optionally, one reviewee role
    Criteria(CriteriaArgs),
    /// Run a scripted review from verification through the published reputation
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Criteria(args) => run_criteria(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs, ScoreKind};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pyme360::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PyME360 Scoring",
    about = "Serve and demonstrate PyME360 credit and trust scoring from the command line",
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
    /// Score a profile document and print the result as JSON
    Score {
        #[command(subcommand)]
        command: ScoreCommand,
    },
    /// Score a built-in sample business and print a readable report
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoreCommand {
    /// Compute the 300-850 credit score
    Credit(ScoreArgs),
    /// Compute the 0-100 trust score
    Trust(ScoreArgs),
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
        Command::Score {
            command: ScoreCommand::Credit(args),
        } => run_score(ScoreKind::Credit, args),
        Command::Score {
            command: ScoreCommand::Trust(args),
        } => run_score(ScoreKind::Trust, args),
        Command::Demo(args) => run_demo(args),
    }
}

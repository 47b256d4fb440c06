use crate::demo::{run_demo, run_recommendations, DemoArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use preventiva::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hoja de Vida Preventiva",
    about = "Run the preventive-care recommendation service from the command line",
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
    /// Compute recommendations for an ad-hoc profile and print them
    Recommend(RecommendArgs),
    /// Run an end-to-end CLI demo covering intake and recommendations
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
        Command::Recommend(args) => run_recommendations(args),
        Command::Demo(args) => run_demo(args),
    }
}

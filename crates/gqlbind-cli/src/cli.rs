use clap::CommandFactory;
use crate::commands;

#[derive(clap::Parser, Debug)]
#[command(name = "gqlbind", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        help="Enable verbose output.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) async fn run_default(self) -> std::process::ExitCode {
        match Self::command().print_help() {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(err) => {
                log::error!("Failed to print help: {err}");
                std::process::ExitCode::FAILURE
            },
        }
    }
}

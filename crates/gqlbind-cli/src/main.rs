mod cli;
mod client_config;
mod command;
mod command_result;
mod commands;
mod output_utils;
mod request_file;
#[cfg(test)]
mod tests;

use clap::Parser;
pub(crate) use cli::Cli;
pub(crate) use client_config::ClientConfig;
pub(crate) use command::RunnableCommand;
pub(crate) use command_result::CommandResult;

const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::INFO;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> std::process::ExitCode {
    let mut cli = Cli::parse();
    setup_logger(&cli);

    if let Some(command) = cli.cmd.take() {
        let result = command.run(cli).await;
        if let Some(stdout) = result.stdout {
            println!("{stdout}");
        }
        if let Some(stderr) = result.stderr {
            eprintln!("{stderr}")
        }
        result.exit_code
    } else {
        cli.run_default().await
    }
}

/// Map a `LOG_LEVEL` value onto a tracing level. `VERBOSE` is an alias for
/// `DEBUG`.
pub(crate) fn parse_log_level(value: &str) -> Option<tracing::Level> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" | "VERBOSE" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logger(cli: &Cli) {
    let env_level = std::env::var("LOG_LEVEL").ok();
    let parsed_env_level = env_level.as_deref().map(parse_log_level);
    let log_level = match (cli.verbose, parsed_env_level) {
        (true, _) => tracing::Level::DEBUG,
        (false, Some(Some(level))) => level,
        (false, _) => DEFAULT_LOG_LEVEL,
    };

    // Logs go to stderr so `exec` output on stdout stays pipeable JSON.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    log::trace!("Logging at `{log_level}`.");

    if let (Some(raw), Some(None)) = (&env_level, parsed_env_level) {
        log::warn!("Ignoring unrecognized `LOG_LEVEL` value `{raw}`.");
    }
}

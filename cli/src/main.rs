mod commands;
mod terminal;

use std::process::ExitCode;

use commands::CommandLine;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLine::parse_args();
    let cfg = cli.config();

    let _log_guard = logging::init_logging(&cfg);
    print::banner(cfg.no_banner, cfg.quiet);

    match commands::run(cli.command, &cfg).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

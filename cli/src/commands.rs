pub mod blacklists;
pub mod check;
pub mod ip;
pub mod mac;
pub mod tor;
pub mod validate;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use unveil_common::config::{Config, DEFAULT_CONCURRENCY};
use unveil_common::network::target::Target;

#[derive(Parser)]
#[command(name = "unveil", version)]
#[command(
    about = "Check IP reputation against DNS blacklists, look up your public IP and MAC vendors."
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show inconclusive results and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reduce output, repeat for results only
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Append plain-text results to a file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Do not listen for 'q' while a scan runs
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether an IP is listed on DNS blacklists
    #[command(alias = "c")]
    Check {
        /// IPv4 address to check, your public IP if omitted
        ip: Option<Target>,
        /// Seconds allowed for a single DNS attempt
        #[arg(short, long, default_value = "5", value_parser = parse_seconds)]
        timeout: Duration,
        /// Seconds allowed for one provider in total
        #[arg(short, long, default_value = "5", value_parser = parse_seconds)]
        lifetime: Duration,
        /// File with one blacklist hostname per line
        #[arg(
            short = 'b',
            long = "blacklists",
            visible_alias = "providers",
            visible_short_alias = 'p',
            value_name = "PATH"
        )]
        blacklists: Option<PathBuf>,
        /// Providers queried at the same time
        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Check whether a string is a valid IPv4 address
    #[command(alias = "v")]
    Validate {
        ip: String,
        /// Only print the address
        #[arg(short, long)]
        raw: bool,
    },
    /// Fetch your public IP and location from several services
    Ip {
        /// Only print the address
        #[arg(short, long, conflicts_with = "json")]
        raw: bool,
        /// Print every answer as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// List blacklist providers scraped from public directories
    #[command(visible_alias = "providers", alias = "b")]
    Blacklists {
        /// Show at most this many providers, 0 for all
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
    },
    /// Look up the vendor of a MAC address
    #[command(alias = "m")]
    Mac {
        /// MAC address, the outbound interface's if omitted
        address: Option<String>,
    },
    /// List the MAC addresses of this machine
    Macs,
    /// Check whether traffic leaves through Tor
    Tor,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            verbose: self.verbose,
            quiet: self.quiet,
            no_banner: self.no_banner,
            disable_input: self.no_input,
            output: self.output.clone(),
        }
    }
}

pub async fn run(command: Commands, cfg: &Config) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Check {
            ip,
            timeout,
            lifetime,
            blacklists,
            concurrency,
        } => {
            let args = check::CheckArgs {
                ip,
                timeout,
                lifetime,
                blacklists,
                concurrency,
            };
            check::check(args, cfg).await
        }
        Commands::Validate { ip, raw } => validate::validate(&ip, raw, cfg),
        Commands::Ip { raw, json } => ip::ip(raw, json, cfg).await,
        Commands::Blacklists { limit } => blacklists::blacklists(limit, cfg).await,
        Commands::Mac { address } => mac::mac(address.as_deref(), cfg),
        Commands::Macs => mac::macs(cfg),
        Commands::Tor => tor::tor(cfg).await,
    }
}

/// Positive, finite number of seconds.
fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("'{raw}' must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|err| err.to_string())
}

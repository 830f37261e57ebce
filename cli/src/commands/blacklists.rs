use std::process::ExitCode;

use colored::*;

use crate::terminal::output::OutputFile;
use crate::terminal::{colors, print, spinner};
use unveil_common::config::Config;
use unveil_core::http;
use unveil_core::providers::ProviderSource;
use unveil_core::providers::scrape::ScrapedProviders;

pub async fn blacklists(limit: usize, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;

    let source = ScrapedProviders::new(http::client());
    let providers =
        spinner::with_spinner("Scraping blacklist providers", source.providers()).await?;

    let shown = match limit {
        0 => &providers[..],
        n => &providers[..n.min(providers.len())],
    };

    print::header("blacklist providers", cfg.quiet);
    for provider in shown {
        match cfg.quiet {
            0 => print::print_status(provider.as_str()),
            _ => print::print(provider.as_str()),
        }
        output.line(provider.as_str())?;
    }

    if cfg.quiet == 0 {
        print::fat_separator();
        let found = format!("{} providers found", providers.len()).green().bold();
        let listed = format!("{} shown", shown.len()).color(colors::SEPARATOR);
        print::centerln(&format!("{found} {listed}"));
    }
    Ok(ExitCode::SUCCESS)
}

use std::process::ExitCode;

use anyhow::Context;
use colored::*;

use crate::terminal::output::OutputFile;
use crate::terminal::{print, spinner};
use unveil_common::config::Config;
use unveil_core::http;
use unveil_core::tor as tor_check;

pub async fn tor(cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;
    let client = http::client();

    let status = spinner::with_spinner("Asking the Tor Project", tor_check::check(&client))
        .await
        .context("Tor check failed")?;

    let seen_as = status
        .ip
        .as_deref()
        .map(|ip| format!(" (seen as {ip})"))
        .unwrap_or_default();

    let (line, code) = if status.is_tor {
        (format!("[+] You are connected through Tor{seen_as}"), ExitCode::SUCCESS)
    } else {
        (format!("[-] You are NOT connected through Tor{seen_as}"), ExitCode::FAILURE)
    };

    let styled = if status.is_tor {
        line.green().bold()
    } else {
        line.red().bold()
    };
    print::print(&format!("{styled}"));
    output.line(&line)?;
    Ok(code)
}

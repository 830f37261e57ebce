use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::input::InputHandle;
use crate::terminal::output::OutputFile;
use crate::terminal::{colors, format, print, spinner};
use crate::uprint;
use unveil_common::config::{Config, ScanConfig};
use unveil_common::dnsbl::{Provider, ProviderOutcome, Report};
use unveil_common::network::target::Target;
use unveil_core::engine::DnsblEngine;
use unveil_core::http;
use unveil_core::providers::file::FileProviders;
use unveil_core::providers::scrape::ScrapedProviders;
use unveil_core::providers::ProviderSource;
use unveil_core::public_ip;
use unveil_protocols::resolver::HickoryResolver;

pub struct CheckArgs {
    pub ip: Option<Target>,
    pub timeout: Duration,
    pub lifetime: Duration,
    pub blacklists: Option<PathBuf>,
    pub concurrency: usize,
}

pub async fn check(args: CheckArgs, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;

    let target = match args.ip {
        Some(ip) => ip,
        None => {
            let client = http::client();
            let lookup = public_ip::public_ip(&client);
            let addr = spinner::with_spinner("Looking up your public IP", lookup)
                .await
                .context("could not determine your public IP")?;
            info!("No IP given, checking your public IP {addr}");
            Target::from(addr)
        }
    };

    let providers = load_providers(args.blacklists.as_deref()).await?;

    let scan = ScanConfig {
        timeout: args.timeout,
        lifetime: args.lifetime,
        count_inconclusive_as_good: cfg.verbose,
        concurrency: args.concurrency,
    };

    print::header("checking blacklists", cfg.quiet);

    let cancel = CancellationToken::new();
    let input = if cfg.disable_input {
        None
    } else {
        InputHandle::start(cancel.clone())
    };
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let span = info_span!("check", indicatif.pb_show = true);
    span.pb_set_style(&spinner::scan_style());
    span.pb_set_length(providers.len() as u64);
    span.pb_set_message(&format!("Querying {target}"));
    let guard = span.enter();

    let engine = DnsblEngine::new(Arc::new(HickoryResolver::new(scan.timeout)));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProviderOutcome>();

    let started = Instant::now();
    let render = async {
        while let Some(entry) = rx.recv().await {
            span.pb_inc(1);
            show_outcome(&target, &entry, cfg, &mut output)?;
        }
        anyhow::Ok(())
    };
    let (report, rendered) = tokio::join!(
        engine.query_all(&target, providers, &scan, &cancel, Some(tx)),
        render
    );

    drop(guard);
    drop(input);
    ctrl_c.abort();
    rendered?;

    if cancel.is_cancelled() {
        warn!("Scan cancelled, unfinished providers are counted as errors");
    }

    show_summary(&target, &report, started.elapsed(), cfg, &mut output)?;
    Ok(ExitCode::SUCCESS)
}

async fn load_providers(path: Option<&Path>) -> anyhow::Result<Vec<Provider>> {
    let providers = match path {
        Some(path) => {
            info!("Using providers from {}", path.display());
            FileProviders::new(path).providers().await?
        }
        None => {
            let source = ScrapedProviders::new(http::client());
            spinner::with_spinner("Scraping blacklist providers", source.providers()).await?
        }
    };
    info!("Loaded {} blacklist providers", providers.len());
    Ok(providers)
}

fn show_outcome(
    target: &Target,
    entry: &ProviderOutcome,
    cfg: &Config,
    output: &mut OutputFile,
) -> anyhow::Result<()> {
    let Some(line) = format::outcome_line(target, entry, cfg.verbose) else {
        return Ok(());
    };

    if cfg.quiet < 2 {
        let color = format::outcome_color(&entry.outcome);
        print::print(&format!("{}", line.color(color).bold()));
    }
    output.line(&line)
}

fn show_summary(
    target: &Target,
    report: &Report,
    elapsed: Duration,
    cfg: &Config,
    output: &mut OutputFile,
) -> anyhow::Result<()> {
    let summary = format::summary_line(target, report);
    let styled: ColoredString = summary.yellow().bold();

    match cfg.quiet {
        0 => {
            uprint!();
            print::header("results", cfg.quiet);
            let counts = [
                ("Listed", report.listed, colors::LISTED),
                ("Not listed", report.not_listed, colors::NOT_LISTED),
                ("Inconclusive", report.inconclusive, colors::INCONCLUSIVE),
                ("Errored", report.errored, colors::ERRORED),
            ];
            for (key, count, color) in counts {
                print::aligned_line(key, count.to_string().color(color), 12);
            }
            print::fat_separator();
            print::centerln(&format!(
                "{} {}",
                styled,
                format!("in {:.2}s", elapsed.as_secs_f64()).color(colors::SEPARATOR)
            ));
            print::end_of_program();
        }
        _ => print::print(&format!("{styled}")),
    }

    output.line(&format!("[.] {summary}"))
}

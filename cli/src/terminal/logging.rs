use std::path::{Path, PathBuf};

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use unveil_common::config::Config;

use crate::terminal::print::PRINT_TARGET;

const CRATES: [&str; 4] = ["unveil_cli", "unveil_core", "unveil_common", "unveil_protocols"];

/// Rolled-over debug logs kept in the log directory.
const MAX_LOG_FILES: usize = 5;

pub struct UnveilFormatter;

impl<S, N> FormatEvent<S, N> for UnveilFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut visitor = RawMessage::default();
            event.record(&mut visitor);
            return writeln!(writer, "{}", visitor.0);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Collects the `raw_msg` field of a print event.
#[derive(Default)]
struct RawMessage(String);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "raw_msg" {
            self.0.push_str(&format!("{value:?}"));
        }
    }
}

/// Default filter directives for the given presentation settings.
///
/// Print events stay enabled at every verbosity; `--quiet` is handled by the
/// print helpers themselves.
pub fn default_directives(cfg: &Config) -> String {
    let level = if cfg.verbose {
        "debug"
    } else if cfg.quiet > 0 {
        "warn"
    } else {
        "info"
    };

    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.push(format!("{PRINT_TARGET}=info"));
    directives.join(",")
}

/// Debug-level directives for the log file. Print events stay on the terminal.
pub fn file_directives() -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}=debug")));
    directives.push(format!("{PRINT_TARGET}=off"));
    directives.join(",")
}

/// `~/.unveil`, or `None` when no home directory is set.
pub fn log_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".unveil"))
}

/// Daily `unveil.<date>.log` files in `dir`, the oldest pruned past
/// [`MAX_LOG_FILES`].
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("unveil")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
}

/// Installs the terminal subscriber and, when a log directory is available,
/// the plain-text debug log.
///
/// The returned guard flushes the log file on drop and must live until exit.
pub fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(cfg)));

    let indicatif_layer = IndicatifLayer::new();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(UnveilFormatter)
        .with_writer(indicatif_layer.get_stdout_writer())
        .with_filter(filter);

    let appender = log_dir().map(|dir| (file_appender(&dir), dir));
    let (file_layer, guard, failure) = match appender {
        Some((Ok(appender), _)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(file_directives()));
            (Some(layer), Some(guard), None)
        }
        Some((Err(err), dir)) => (None, None, Some((err, dir))),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();

    if let Some((err, dir)) = failure {
        warn!("Could not open debug log in {} ({err})", dir.display());
    }
    guard
}

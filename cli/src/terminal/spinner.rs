use indicatif::ProgressStyle;
use tracing::{Instrument, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Indeterminate wait, e.g. while HTTP lookups are in flight.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Provider progress of a running scan.
pub fn scan_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} {msg} [{bar:30.green/bright_black}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .tick_strings(TICKS)
    .progress_chars("━╸─")
}

/// Shows a spinner with `message` until `future` completes.
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let span = info_span!("wait", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(message);
    future.instrument(span).await
}

use std::process::ExitCode;
use std::time::Instant;

use colored::*;
use tracing::error;

use crate::terminal::output::OutputFile;
use crate::terminal::{colors, print, spinner};
use crate::uprint;
use unveil_common::config::Config;
use unveil_core::http;
use unveil_core::public_ip::{self, ENDPOINTS};

pub async fn ip(raw: bool, json: bool, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;
    let client = http::client();

    let started = Instant::now();
    let records = spinner::with_spinner(
        "Asking lookup services",
        public_ip::fetch_all(&client, &ENDPOINTS),
    )
    .await;
    let elapsed = started.elapsed();

    if records.is_empty() {
        error!("None of the {} lookup services answered", ENDPOINTS.len());
        return Ok(ExitCode::FAILURE);
    }

    if raw {
        if let Some(record) = records.values().next() {
            print::print(&record.ip.to_string());
            output.line(&record.ip.to_string())?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    if json {
        let text = serde_json::to_string_pretty(&records)?;
        print::print(&text);
        output.line(&text)?;
        return Ok(ExitCode::SUCCESS);
    }

    print::header("public ip", cfg.quiet);
    for (idx, (source, record)) in records.iter().enumerate() {
        print::tree_head(idx, source);
        output.line(&format!("[{source}]"))?;

        let fields: Vec<(String, ColoredString)> = record
            .fields()
            .into_iter()
            .map(|(key, value)| {
                let value = if key == "IP address" {
                    value.color(colors::IPV4_ADDR)
                } else {
                    value.color(colors::TEXT_DEFAULT)
                };
                (key.to_string(), value)
            })
            .collect();
        for (key, value) in &fields {
            output.line(&format!("{key}: {value}"))?;
        }
        print::as_tree_one_level(fields);

        if idx + 1 != records.len() {
            uprint!();
        }
    }

    let summary = format!(
        "Fetched data from {} APIs in {:.2} seconds.",
        records.len(),
        elapsed.as_secs_f64()
    );
    if cfg.quiet == 0 {
        print::fat_separator();
        print::centerln(&format!("{}", summary.yellow().bold()));
    }
    output.line(&summary)?;
    Ok(ExitCode::SUCCESS)
}

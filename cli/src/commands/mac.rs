use std::process::ExitCode;

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use crate::terminal::output::OutputFile;
use crate::terminal::{colors, format, print};
use crate::uprint;
use unveil_common::config::Config;
use unveil_common::network::interface::interface_macs;
use unveil_common::network::mac::parse_mac;
use unveil_common::vendors::{MacReport, VendorRepository};
use unveil_core::vendors::{self, MacOuiRepo};

type Detail = (String, ColoredString);

pub fn mac(address: Option<&str>, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;

    let mac = match address {
        Some(raw) => parse_mac(raw)?,
        None => {
            let outbound = interface_macs()
                .into_iter()
                .next()
                .context("no network interface with a MAC address found")?;
            info!("No address given, using {} of {}", outbound.mac, outbound.name);
            outbound.mac
        }
    };

    let report = vendors::inspect(&MacOuiRepo, mac);

    print::header("mac lookup", cfg.quiet);
    let details = report_details(&report);
    for (key, value) in &details {
        output.line(&format!("{key}: {value}"))?;
    }
    print::as_tree_one_level(details);

    if report.vendor.is_none() {
        warn!("No vendor registered for OUI {}", report.oui);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn macs(cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;

    let interfaces = interface_macs();
    if interfaces.is_empty() {
        warn!("No interface with a hardware address found");
        return Ok(ExitCode::FAILURE);
    }

    print::header("interfaces", cfg.quiet);
    for (idx, interface) in interfaces.iter().enumerate() {
        let vendor = MacOuiRepo
            .get_vendor(interface.mac)
            .map(|vendor| vendor.organization)
            .unwrap_or_else(|| "unknown".to_string());

        print::tree_head(idx, &interface.name);
        print::as_tree_one_level(vec![
            ("MAC".to_string(), interface.mac.to_string().color(colors::MAC_ADDR)),
            ("Vendor".to_string(), vendor.color(colors::TEXT_DEFAULT)),
            ("Outbound".to_string(), format::yes_no(interface.outbound)),
        ]);
        output.line(&format!("{} {} {}", interface.name, interface.mac, vendor))?;

        if idx + 1 != interfaces.len() {
            uprint!();
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report_details(report: &MacReport) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("MAC".into(), report.mac.to_string().color(colors::MAC_ADDR)),
        ("OUI".into(), report.oui.as_str().color(colors::ACCENT)),
        ("Type".into(), report.class.to_string().color(colors::TEXT_DEFAULT)),
        ("Randomized".into(), format::yes_no(report.class.is_randomized())),
    ];

    let Some(vendor) = &report.vendor else {
        details.push(("Vendor".into(), "not registered".red()));
        return details;
    };

    details.push(("Vendor".into(), vendor.organization.as_str().bold()));
    if !vendor.address.trim().is_empty() {
        details.push(("Address".into(), vendor.address.as_str().color(colors::TEXT_DEFAULT)));
    }
    if let Some(cc) = &vendor.country_code {
        details.push(("Country".into(), cc.as_str().color(colors::TEXT_DEFAULT)));
    }
    details.push(("Private".into(), format::yes_no(vendor.is_private)));
    if let Some(block) = vendor.block {
        details.push(("Block size".into(), block.to_string().color(colors::TEXT_DEFAULT)));
    }
    if let Some((start, end)) = report.block_range() {
        details.push((
            "Range".into(),
            format!("{start} - {end}").color(colors::TEXT_DEFAULT),
        ));
    }
    details
}

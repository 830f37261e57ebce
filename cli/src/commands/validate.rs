use std::process::ExitCode;

use colored::*;

use crate::terminal::output::OutputFile;
use crate::terminal::{format, print};
use unveil_common::config::Config;
use unveil_common::network::target::Target;

pub fn validate(input: &str, raw: bool, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut output = OutputFile::open(cfg.output.as_deref())?;

    let target: Target = match input.parse() {
        Ok(target) => target,
        Err(_) => {
            let line = format!("[-] {input} is not valid!");
            print::print(&format!("{}", line.red().bold()));
            output.line(&line)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if raw {
        print::print(&target.to_string());
        output.line(&target.to_string())?;
        return Ok(ExitCode::SUCCESS);
    }

    let line = format!("[+] {target} is a valid IPv4 address");
    print::print(&format!("{}", line.green().bold()));
    output.line(&line)?;

    if cfg.verbose {
        let addr = target.addr();
        let properties = [
            ("Private", addr.is_private()),
            ("Loopback", addr.is_loopback()),
            ("Global", target.is_global()),
            ("Multicast", addr.is_multicast()),
            ("Reserved", target.is_reserved()),
            ("Link-local", addr.is_link_local()),
            ("Documentation", addr.is_documentation()),
        ];
        for (key, value) in properties {
            print::aligned_line(key, format::yes_no(value), 13);
            output.line(&format!("{key}: {value}"))?;
        }
        print::aligned_line("Class", target.class().to_string(), 13);
        output.line(&format!("Class: {}", target.class()))?;
    }

    Ok(ExitCode::SUCCESS)
}

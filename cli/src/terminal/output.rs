use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::Context;

/// Plain-text copy of a command's results, appended to a user-chosen file.
pub struct OutputFile {
    file: Option<File>,
}

impl OutputFile {
    /// Opens `path` for appending, creating it if needed. `None` discards writes.
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("could not open output file '{}'", path.display()))?,
            ),
            None => None,
        };
        Ok(Self { file })
    }

    /// Writes `line` with terminal styling removed.
    pub fn line(&mut self, line: &str) -> anyhow::Result<()> {
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", console::strip_ansi_codes(line))
                .context("could not write output file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Colorize;

    #[test]
    fn test_appends_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");

        let mut out = OutputFile::open(Some(&path)).unwrap();
        colored::control::set_override(true);
        out.line(&format!("{}", "[+] listed".red().bold())).unwrap();
        colored::control::unset_override();
        drop(out);

        let mut out = OutputFile::open(Some(&path)).unwrap();
        out.line("second run").unwrap();
        drop(out);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[+] listed\nsecond run\n");
    }

    #[test]
    fn test_no_path_discards() {
        let mut out = OutputFile::open(None).unwrap();
        assert!(out.line("ignored").is_ok());
    }
}

use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
          _   _ _   ___     _______ ___ _
         | | | | \ | \ \   / / ____|_ _| |
         | | | |  \| |\ \ / /|  _|  | || |
         | |_| | |\  | \ V / | |___ | || |___
          \___/|_| \_|  \_/  |_____|___|_____|
"#;

pub fn print() {
    for line in BANNER.lines().filter(|line| !line.trim().is_empty()) {
        print::print(&format!("{}", line.bright_green().bold()));
    }
    print::print("");
}

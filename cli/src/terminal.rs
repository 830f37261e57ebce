pub mod banner;
pub mod colors;
pub mod format;
pub mod input;
pub mod logging;
pub mod output;
pub mod print;
pub mod spinner;

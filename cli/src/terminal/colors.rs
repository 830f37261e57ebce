use colored::Color;

pub const PRIMARY: Color = Color::TrueColor {
    r: 97,
    g: 175,
    b: 239,
};
pub const ACCENT: Color = Color::TrueColor {
    r: 229,
    g: 192,
    b: 123,
};
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const LISTED: Color = Color::Red;
pub const NOT_LISTED: Color = Color::Green;
pub const INCONCLUSIVE: Color = Color::Yellow;
pub const ERRORED: Color = Color::Magenta;

pub const IPV4_ADDR: Color = Color::TrueColor {
    r: 152,
    g: 195,
    b: 121,
};
pub const MAC_ADDR: Color = Color::TrueColor {
    r: 198,
    g: 120,
    b: 221,
};

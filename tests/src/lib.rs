pub mod utils;

mod dnsbl;

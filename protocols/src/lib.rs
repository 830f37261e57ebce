pub mod dnsbl;
pub mod resolver;

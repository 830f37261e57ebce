//! Shared models and configuration for the `unveil` workspace.
//!
//! Everything here is plain data: targets, providers, per-provider outcomes,
//! aggregated reports, geolocation records and MAC address models. The only
//! I/O performed by this crate is local interface enumeration.

pub mod config;
pub mod dnsbl;
pub mod geo;
pub mod network;
pub mod vendors;

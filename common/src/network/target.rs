//! # Scan Target Model
//!
//! Defines the address a reputation check runs against.
//!
//! DNSBL zones are queried with reversed IPv4 octets, so a target is always a
//! single IPv4 address. The value is validated once at parse time and is
//! immutable afterwards:
//! * Exactly four dot-separated decimal octets.
//! * Every octet in `0..=255`, no leading zeros, no surrounding garbage.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// Returned when user input is not a dotted-quad IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid IPv4 address: '{input}'")]
pub struct TargetError {
    pub input: String,
}

/// A validated IPv4 address to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
    addr: Ipv4Addr,
}

/// Classful network bucket of an IPv4 address, decided by the first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Class {
    A,
    B,
    C,
    /// Multicast (224-239)
    D,
    /// Reserved (240-255)
    E,
}

impl fmt::Display for Ipv4Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Ipv4Class::A => "Class A",
            Ipv4Class::B => "Class B",
            Ipv4Class::C => "Class C",
            Ipv4Class::D => "Class D (Multicast)",
            Ipv4Class::E => "Class E (Reserved)",
        };
        f.write_str(label)
    }
}

impl Target {
    pub fn new(addr: Ipv4Addr) -> Self {
        Self { addr }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn class(&self) -> Ipv4Class {
        match self.addr.octets()[0] {
            0..=127 => Ipv4Class::A,
            128..=191 => Ipv4Class::B,
            192..=223 => Ipv4Class::C,
            224..=239 => Ipv4Class::D,
            _ => Ipv4Class::E,
        }
    }

    /// `240.0.0.0/4`, excluding the limited broadcast address.
    pub fn is_reserved(&self) -> bool {
        self.addr.octets()[0] >= 240 && !self.addr.is_broadcast()
    }

    /// `100.64.0.0/10`, carrier-grade NAT.
    pub fn is_shared(&self) -> bool {
        let [a, b, ..] = self.addr.octets();
        a == 100 && (b & 0b1100_0000) == 0b0100_0000
    }

    /// `198.18.0.0/15`, reserved for network benchmarking.
    pub fn is_benchmarking(&self) -> bool {
        let [a, b, ..] = self.addr.octets();
        a == 198 && (b & 0xfe) == 18
    }

    /// Whether the address is routable on the public internet.
    ///
    /// Only public addresses are meaningful to a blacklist provider.
    pub fn is_global(&self) -> bool {
        let addr = self.addr;
        !(addr.octets()[0] == 0
            || addr.is_private()
            || addr.is_loopback()
            || addr.is_link_local()
            || addr.is_broadcast()
            || addr.is_documentation()
            || self.is_shared()
            || self.is_benchmarking()
            || self.is_reserved()
            || addr.is_multicast())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    /// Parses a dotted-quad IPv4 address.
    ///
    /// Hostnames, IPv6 and CIDR notation are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Target::new)
            .map_err(|_| TargetError {
                input: s.to_string(),
            })
    }
}

impl From<Ipv4Addr> for Target {
    fn from(addr: Ipv4Addr) -> Self {
        Target::new(addr)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.addr, f)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

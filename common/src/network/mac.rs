//! MAC address parsing and classification.
//!
//! Everything in here is derived from the address bits alone. Vendor
//! information lives behind [`crate::vendors::VendorRepository`].

use std::fmt;

use pnet::util::MacAddr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid MAC address: '{input}'")]
pub struct MacError {
    pub input: String,
}

/// Parses a MAC address written in any of the common notations.
///
/// Accepted: `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff`, `aabb.ccdd.eeff`,
/// `aabbccddeeff` (case-insensitive, surrounding whitespace ignored).
pub fn parse_mac(input: &str) -> Result<MacAddr, MacError> {
    let err = || MacError {
        input: input.to_string(),
    };

    let hex: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.' | ' '))
        .collect();

    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }

    let mut octets = [0u8; 6];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
    }

    let [a, b, c, d, e, f] = octets;
    Ok(MacAddr::new(a, b, c, d, e, f))
}

/// Organizationally unique identifier, formatted `AA:BB:CC`.
pub fn oui(mac: MacAddr) -> String {
    format!("{:02X}:{:02X}:{:02X}", mac.0, mac.1, mac.2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Unicast,
    Multicast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Administration {
    /// Burned-in, vendor assigned.
    Global,
    /// Set by software, typical for privacy-randomized addresses.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacClass {
    pub cast: CastType,
    pub administration: Administration,
}

impl MacClass {
    /// Locally administered unicast addresses are what OSes generate for
    /// MAC randomization.
    pub fn is_randomized(&self) -> bool {
        self.cast == CastType::Unicast && self.administration == Administration::Local
    }
}

impl fmt::Display for MacClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cast = match self.cast {
            CastType::Unicast => "Unicast",
            CastType::Multicast => "Multicast",
        };
        let admin = match self.administration {
            Administration::Global => "Globally Unique",
            Administration::Local => "Locally Administered",
        };
        write!(f, "{cast} ({admin})")
    }
}

/// Reads the I/G and U/L bits of the first octet.
pub fn classify(mac: MacAddr) -> MacClass {
    let first = mac.0;
    MacClass {
        cast: if first & 0b0000_0001 != 0 {
            CastType::Multicast
        } else {
            CastType::Unicast
        },
        administration: if first & 0b0000_0010 != 0 {
            Administration::Local
        } else {
            Administration::Global
        },
    }
}

/// IEEE registry an assignment block was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSize {
    /// MA-L, 24-bit prefix.
    Large,
    /// MA-M, 28-bit prefix.
    Medium,
    /// MA-S, 36-bit prefix.
    Small,
}

impl BlockSize {
    pub fn from_registry(registry: &str) -> Option<Self> {
        match registry.trim().to_ascii_uppercase().as_str() {
            "MA-L" => Some(BlockSize::Large),
            "MA-M" => Some(BlockSize::Medium),
            "MA-S" => Some(BlockSize::Small),
            _ => None,
        }
    }

    pub fn prefix_bits(&self) -> u32 {
        match self {
            BlockSize::Large => 24,
            BlockSize::Medium => 28,
            BlockSize::Small => 36,
        }
    }

    /// Number of addresses in the block.
    pub fn addresses(&self) -> u64 {
        1u64 << (48 - self.prefix_bits())
    }

    /// First and last address of the block `mac` belongs to.
    pub fn range(&self, mac: MacAddr) -> (MacAddr, MacAddr) {
        let value = mac_to_u64(mac);
        let host_bits = 48 - self.prefix_bits();
        let start = (value >> host_bits) << host_bits;
        let end = start | ((1u64 << host_bits) - 1);
        (u64_to_mac(start), u64_to_mac(end))
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.addresses();
        match size {
            s if s >= 1_000_000 => write!(f, "{s} ({:.2}M)", s as f64 / 1e6),
            s if s >= 1_000 => write!(f, "{s} ({:.2}K)", s as f64 / 1e3),
            s => write!(f, "{s} addresses"),
        }
    }
}

fn mac_to_u64(mac: MacAddr) -> u64 {
    let MacAddr(a, b, c, d, e, f) = mac;
    u64::from_be_bytes([0, 0, a, b, c, d, e, f])
}

fn u64_to_mac(value: u64) -> MacAddr {
    let [_, _, a, b, c, d, e, f] = value.to_be_bytes();
    MacAddr::new(a, b, c, d, e, f)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

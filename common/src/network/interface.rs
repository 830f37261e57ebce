//! Local interface enumeration.
//!
//! Used by the `mac` commands to find the hardware address of the machine
//! running the tool.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use pnet::datalink::{self, MacAddr, NetworkInterface};
use tracing::debug;

/// Address used only to pick a route. Nothing is sent.
const ROUTE_PROBE: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMac {
    pub name: String,
    pub mac: MacAddr,
    /// The interface carries the default route.
    pub outbound: bool,
}

/// Lists the hardware addresses of all interfaces, outbound interface first.
pub fn interface_macs() -> Vec<InterfaceMac> {
    let source = outbound_source_ip();
    debug!(?source, "resolved outbound source address");
    prioritize(datalink::interfaces(), source)
}

/// Local address the OS would use to reach the internet.
///
/// Connecting a UDP socket only selects a route, no packet leaves the host.
pub fn outbound_source_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

/// Keeps interfaces with a real MAC and moves the one owning `source` first.
pub fn prioritize(interfaces: Vec<NetworkInterface>, source: Option<IpAddr>) -> Vec<InterfaceMac> {
    let mut macs: Vec<InterfaceMac> = interfaces
        .into_iter()
        .filter_map(|interface| {
            let mac = interface.mac.filter(|mac| *mac != MacAddr::zero())?;
            let outbound = source
                .map(|ip| interface.ips.iter().any(|net| net.ip() == ip))
                .unwrap_or(false);
            Some(InterfaceMac {
                name: interface.name,
                mac,
                outbound,
            })
        })
        .collect();

    // stable: keeps enumeration order for the rest
    macs.sort_by_key(|entry| !entry.outbound);
    macs
}

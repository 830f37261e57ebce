use pnet::util::MacAddr;

use crate::network::mac::{self, BlockSize, MacClass};

/// Registry data attached to an OUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInfo {
    pub oui: String,
    pub organization: String,
    pub address: String,
    pub country_code: Option<String>,
    /// The registrant asked for its details to be hidden.
    pub is_private: bool,
    pub block: Option<BlockSize>,
}

/// Defines the contract for resolving device manufacturers from MAC addresses.
pub trait VendorRepository: Send + Sync {
    /// Retrieves the registry entry for a given MAC address.
    ///
    /// # Returns
    /// * `Some(VendorInfo)` - The vendor if the OUI is registered.
    /// * `None` - If the OUI is unknown.
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<VendorInfo>;
}

/// Everything known about one MAC address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacReport {
    pub mac: MacAddr,
    pub oui: String,
    pub class: MacClass,
    pub vendor: Option<VendorInfo>,
}

impl MacReport {
    pub fn new(mac: MacAddr, vendor: Option<VendorInfo>) -> Self {
        Self {
            mac,
            oui: mac::oui(mac),
            class: mac::classify(mac),
            vendor,
        }
    }

    /// Start and end of the assignment block, when the registry is known.
    pub fn block_range(&self) -> Option<(MacAddr, MacAddr)> {
        let block = self.vendor.as_ref()?.block?;
        Some(block.range(self.mac))
    }
}

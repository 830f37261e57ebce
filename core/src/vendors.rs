use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::datalink::MacAddr;
use tracing::error;
use unveil_common::network::mac::BlockSize;
use unveil_common::vendors::{MacReport, VendorInfo, VendorRepository};

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(err) => {
                error!("Failed to load OUI database: {err}");
                None
            }
        })
        .as_ref()
}

/// Vendor lookups against the OUI database embedded in the binary.
pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac: MacAddr) -> Option<VendorInfo> {
        let db = get_oui_db()?;
        let entry = db.lookup_by_mac(&mac.to_string()).ok()??;

        Some(VendorInfo {
            oui: entry.oui.clone(),
            organization: entry.company_name.clone(),
            address: entry.company_address.clone(),
            country_code: Some(entry.country_code.trim().to_string()).filter(|cc| !cc.is_empty()),
            is_private: entry.is_private,
            block: BlockSize::from_registry(&entry.assignment_block_size),
        })
    }
}

/// Classifies `mac` and attaches its vendor, if registered.
pub fn inspect(repo: &dyn VendorRepository, mac: MacAddr) -> MacReport {
    MacReport::new(mac, repo.get_vendor(mac))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRepo;

    impl VendorRepository for FixedRepo {
        fn get_vendor(&self, mac: MacAddr) -> Option<VendorInfo> {
            (mac.0 == 0x00 && mac.1 == 0x1a && mac.2 == 0x2b).then(|| VendorInfo {
                oui: "00:1A:2B".into(),
                organization: "Example Networks".into(),
                address: "1 Example Way".into(),
                country_code: Some("US".into()),
                is_private: false,
                block: Some(BlockSize::Large),
            })
        }
    }

    #[test]
    fn test_inspect_known_vendor() {
        let report = inspect(&FixedRepo, MacAddr::new(0x00, 0x1a, 0x2b, 0x01, 0x02, 0x03));
        assert_eq!(report.oui, "00:1A:2B");
        assert_eq!(
            report.vendor.as_ref().map(|v| v.organization.as_str()),
            Some("Example Networks")
        );
        assert_eq!(
            report.block_range(),
            Some((
                MacAddr::new(0x00, 0x1a, 0x2b, 0, 0, 0),
                MacAddr::new(0x00, 0x1a, 0x2b, 0xff, 0xff, 0xff)
            ))
        );
    }

    #[test]
    fn test_inspect_unknown_vendor() {
        let report = inspect(&FixedRepo, MacAddr::new(0xda, 0xa1, 0x19, 0x01, 0x02, 0x03));
        assert!(report.vendor.is_none());
        assert!(report.block_range().is_none());
        assert!(report.class.is_randomized());
    }
}

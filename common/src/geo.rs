use std::net::IpAddr;

use serde::Serialize;

/// Public address and location metadata reported by one lookup service.
///
/// Services disagree on field names and coverage; every field except `ip`
/// is optional and left empty when a service does not report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpRecord {
    pub ip: IpAddr,
    /// Autonomous system organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl IpRecord {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            aso: None,
            asn: None,
            continent: None,
            country_code: None,
            country: None,
            region: None,
            city: None,
            postal: None,
            latitude: None,
            longitude: None,
            timezone: None,
        }
    }

    /// Labelled, human-readable fields in display order. Empty fields are skipped.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("IP address", self.ip.to_string())];

        let optional: [(&'static str, Option<String>); 11] = [
            ("ASO", self.aso.clone()),
            ("ASN", self.asn.map(|asn| format!("AS{asn}"))),
            ("Continent", self.continent.clone()),
            ("Country code", self.country_code.clone()),
            ("Country", self.country.clone()),
            ("Region", self.region.clone()),
            ("City", self.city.clone()),
            ("Postal", self.postal.clone()),
            ("Latitude", self.latitude.map(|v| v.to_string())),
            ("Longitude", self.longitude.map(|v| v.to_string())),
            ("Timezone", self.timezone.clone()),
        ];

        fields.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value))),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_fields_skip_empty_values() {
        let mut record = IpRecord::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        record.asn = Some(15169);
        record.city = Some("Mountain View".into());

        let fields = record.fields();
        assert_eq!(
            fields,
            vec![
                ("IP address", "8.8.8.8".to_string()),
                ("ASN", "AS15169".to_string()),
                ("City", "Mountain View".to_string()),
            ]
        );
    }
}

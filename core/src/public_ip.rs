//! # Public IP & Geolocation
//!
//! Asks several free lookup services for the caller's public address and
//! whatever location metadata they expose. Every service answers in its own
//! format; each body is normalized into an [`IpRecord`].
//!
//! Services are independent. [`fetch_all`] runs them concurrently and keeps
//! only the ones that answered with a usable record.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

use futures_util::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use unveil_common::geo::IpRecord;

use crate::http::{self, FetchError};

/// Plain-text IPv4 echo used when only the address is needed.
pub const PUBLIC_IP_URL: &str = "https://v4.ident.me";

/// Body layout of a lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    IpInfo,
    IpApiCo,
    IpApiCom,
    GeoJs,
    CountryIs,
    MyIp,
    Ipify,
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub url: &'static str,
    pub format: Format,
}

pub const ENDPOINTS: [Endpoint; 8] = [
    Endpoint {
        name: "ipinfo",
        url: "https://ipinfo.io/json",
        format: Format::IpInfo,
    },
    Endpoint {
        name: "ipapi",
        url: "https://ipapi.co/json/",
        format: Format::IpApiCo,
    },
    Endpoint {
        name: "ip-api",
        url: "http://ip-api.com/json/",
        format: Format::IpApiCom,
    },
    Endpoint {
        name: "geojs",
        url: "https://get.geojs.io/v1/ip/geo.json",
        format: Format::GeoJs,
    },
    Endpoint {
        name: "country.is",
        url: "https://api.country.is/",
        format: Format::CountryIs,
    },
    Endpoint {
        name: "myip",
        url: "https://api.myip.com",
        format: Format::MyIp,
    },
    Endpoint {
        name: "ipify",
        url: "https://api.ipify.org?format=json",
        format: Format::Ipify,
    },
    Endpoint {
        name: "icanhazip",
        url: "https://icanhazip.com",
        format: Format::PlainText,
    },
];

impl Endpoint {
    /// Normalizes a response body of this service.
    pub fn parse(&self, body: &str) -> Result<IpRecord, FetchError> {
        if self.format == Format::PlainText {
            let ip = body.trim().parse().map_err(|_| FetchError::MissingIp)?;
            return Ok(IpRecord::new(ip));
        }

        let json: Value = serde_json::from_str(body)?;
        match self.format {
            Format::IpInfo => parse_ipinfo(&json),
            Format::IpApiCo => parse_ipapi_co(&json),
            Format::IpApiCom => parse_ip_api_com(&json),
            Format::GeoJs => parse_geojs(&json),
            Format::CountryIs => {
                let mut record = IpRecord::new(ip(&json, "ip")?);
                record.country_code = text(&json, "country");
                Ok(record)
            }
            Format::MyIp => {
                let mut record = IpRecord::new(ip(&json, "ip")?);
                record.country = text(&json, "country");
                record.country_code = text(&json, "cc");
                Ok(record)
            }
            Format::Ipify | Format::PlainText => Ok(IpRecord::new(ip(&json, "ip")?)),
        }
    }
}

fn parse_ipinfo(json: &Value) -> Result<IpRecord, FetchError> {
    let mut record = IpRecord::new(ip(json, "ip")?);
    if let Some(org) = text(json, "org") {
        (record.asn, record.aso) = split_asn(&org);
    }
    record.country_code = text(json, "country");
    record.region = text(json, "region");
    record.city = text(json, "city");
    record.postal = text(json, "postal");
    record.timezone = text(json, "timezone");
    if let Some((lat, lon)) = text(json, "loc").as_deref().and_then(split_location) {
        record.latitude = Some(lat);
        record.longitude = Some(lon);
    }
    Ok(record)
}

fn parse_ipapi_co(json: &Value) -> Result<IpRecord, FetchError> {
    if json.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = text(json, "reason").unwrap_or_else(|| "unknown".into());
        return Err(FetchError::Rejected(reason));
    }

    let mut record = IpRecord::new(ip(json, "ip")?);
    record.asn = text(json, "asn").and_then(|asn| split_asn(&asn).0);
    record.aso = text(json, "org");
    record.continent = text(json, "continent_code");
    record.country_code = text(json, "country_code");
    record.country = text(json, "country_name");
    record.region = text(json, "region");
    record.city = text(json, "city");
    record.postal = text(json, "postal");
    record.latitude = number(json, "latitude");
    record.longitude = number(json, "longitude");
    record.timezone = text(json, "timezone");
    Ok(record)
}

fn parse_ip_api_com(json: &Value) -> Result<IpRecord, FetchError> {
    if text(json, "status").as_deref() == Some("fail") {
        let reason = text(json, "message").unwrap_or_else(|| "unknown".into());
        return Err(FetchError::Rejected(reason));
    }

    let mut record = IpRecord::new(ip(json, "query")?);
    if let Some(asn) = text(json, "as") {
        (record.asn, record.aso) = split_asn(&asn);
    }
    record.country = text(json, "country");
    record.country_code = text(json, "countryCode");
    record.region = text(json, "regionName");
    record.city = text(json, "city");
    record.postal = text(json, "zip");
    record.latitude = number(json, "lat");
    record.longitude = number(json, "lon");
    record.timezone = text(json, "timezone");
    Ok(record)
}

fn parse_geojs(json: &Value) -> Result<IpRecord, FetchError> {
    let mut record = IpRecord::new(ip(json, "ip")?);
    record.asn = number(json, "asn").map(|asn| asn as u32);
    record.aso = text(json, "organization_name");
    record.continent = text(json, "continent_code");
    record.country = text(json, "country");
    record.country_code = text(json, "country_code");
    record.region = text(json, "region");
    record.city = text(json, "city");
    record.latitude = number(json, "latitude");
    record.longitude = number(json, "longitude");
    record.timezone = text(json, "timezone");
    Ok(record)
}

/// Non-empty string field.
fn text(json: &Value, key: &str) -> Option<String> {
    json.get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Numeric field, also accepted when sent as a string.
fn number(json: &Value, key: &str) -> Option<f64> {
    match json.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn ip(json: &Value, key: &str) -> Result<IpAddr, FetchError> {
    text(json, key)
        .and_then(|raw| raw.parse().ok())
        .ok_or(FetchError::MissingIp)
}

/// Splits `"AS15169 Google LLC"` into its number and organization.
pub fn split_asn(raw: &str) -> (Option<u32>, Option<String>) {
    let raw = raw.trim();
    let (head, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
    let digits = head
        .strip_prefix("AS")
        .or_else(|| head.strip_prefix("as"))
        .unwrap_or(head);

    match digits.parse::<u32>() {
        Ok(asn) => {
            let org = Some(rest.trim()).filter(|s| !s.is_empty()).map(String::from);
            (Some(asn), org)
        }
        Err(_) => (None, Some(raw).filter(|s| !s.is_empty()).map(String::from)),
    }
}

/// `"37.4056,-122.0775"` into latitude and longitude.
fn split_location(loc: &str) -> Option<(f64, f64)> {
    let (lat, lon) = loc.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

pub async fn fetch_one(client: &Client, endpoint: &Endpoint) -> Result<IpRecord, FetchError> {
    let body = http::get_text(client, endpoint.url).await?;
    endpoint.parse(&body)
}

/// Queries every endpoint concurrently.
///
/// Only services that answered with a valid record are present in the map.
pub async fn fetch_all(client: &Client, endpoints: &[Endpoint]) -> BTreeMap<String, IpRecord> {
    let results = join_all(endpoints.iter().map(|endpoint| async move {
        (endpoint.name, fetch_one(client, endpoint).await)
    }))
    .await;

    results
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(record) => Some((name.to_string(), record)),
            Err(err) => {
                debug!(source = name, "Lookup failed: {err}");
                None
            }
        })
        .collect()
}

/// The caller's public IPv4 address.
pub async fn public_ip(client: &Client) -> Result<Ipv4Addr, FetchError> {
    let body = http::get_text(client, PUBLIC_IP_URL).await?;
    body.trim().parse().map_err(|_| {
        warn!("Public IP service answered with '{}'", body.trim());
        FetchError::MissingIp
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! Fingerprint snapshot: an ordered record of field keys to display values.
//!
//! Insertion order is significant. It defines both the on-screen order
//! and the order of lines in the relay message, so the snapshot is a
//! `Vec` of pairs rather than a map.

pub mod descriptors;

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

pub use descriptors::{FieldDescriptor, DESCRIPTORS};

/// Placeholder rendered for data a source could not provide.
pub const SENTINEL: &str = "not available";

/// Every field a snapshot can carry, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    // Geo
    Ip,
    Country,
    Region,
    City,
    Postal,
    Latitude,
    Longitude,
    Isp,
    Asn,
    Hostname,
    // Environment
    UserAgent,
    Browser,
    BrowserVersion,
    Platform,
    Os,
    Languages,
    ScreenResolution,
    Viewport,
    PixelRatio,
    ColorDepth,
    DeviceMemory,
    CpuCores,
    CookiesEnabled,
    DoNotTrack,
    TimeZone,
    LocalTime,
    Uptime,
    Plugins,
    MimeTypes,
    TouchSupport,
    WebglVendor,
    Connection,
    // Performance
    PageLoadTime,
    DnsLookup,
    TcpConnect,
    RequestTime,
    // Power
    BatteryLevel,
    BatteryCharging,
    BatteryChargeTime,
    BatteryDischargeTime,
    // Local network
    LocalIps,
}

impl FieldKey {
    pub const ALL: [FieldKey; 41] = [
        FieldKey::Ip,
        FieldKey::Country,
        FieldKey::Region,
        FieldKey::City,
        FieldKey::Postal,
        FieldKey::Latitude,
        FieldKey::Longitude,
        FieldKey::Isp,
        FieldKey::Asn,
        FieldKey::Hostname,
        FieldKey::UserAgent,
        FieldKey::Browser,
        FieldKey::BrowserVersion,
        FieldKey::Platform,
        FieldKey::Os,
        FieldKey::Languages,
        FieldKey::ScreenResolution,
        FieldKey::Viewport,
        FieldKey::PixelRatio,
        FieldKey::ColorDepth,
        FieldKey::DeviceMemory,
        FieldKey::CpuCores,
        FieldKey::CookiesEnabled,
        FieldKey::DoNotTrack,
        FieldKey::TimeZone,
        FieldKey::LocalTime,
        FieldKey::Uptime,
        FieldKey::Plugins,
        FieldKey::MimeTypes,
        FieldKey::TouchSupport,
        FieldKey::WebglVendor,
        FieldKey::Connection,
        FieldKey::PageLoadTime,
        FieldKey::DnsLookup,
        FieldKey::TcpConnect,
        FieldKey::RequestTime,
        FieldKey::BatteryLevel,
        FieldKey::BatteryCharging,
        FieldKey::BatteryChargeTime,
        FieldKey::BatteryDischargeTime,
        FieldKey::LocalIps,
    ];

    /// The fail-closed geo group.
    pub const GEO: [FieldKey; 10] = [
        FieldKey::Ip,
        FieldKey::Country,
        FieldKey::Region,
        FieldKey::City,
        FieldKey::Postal,
        FieldKey::Latitude,
        FieldKey::Longitude,
        FieldKey::Isp,
        FieldKey::Asn,
        FieldKey::Hostname,
    ];

    /// The only keys a snapshot may omit.
    pub const POWER: [FieldKey; 4] = [
        FieldKey::BatteryLevel,
        FieldKey::BatteryCharging,
        FieldKey::BatteryChargeTime,
        FieldKey::BatteryDischargeTime,
    ];

    /// Stable identifier used on the JS side and in serialized snapshots.
    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        // DESCRIPTORS is laid out in declaration order
        &DESCRIPTORS[self as usize]
    }

    pub fn is_power(self) -> bool {
        FieldKey::POWER.contains(&self)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A display-ready field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    NotAvailable,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// `Text` for a non-empty string, the sentinel otherwise.
    pub fn text_or_na(s: Option<String>) -> Self {
        match s {
            Some(s) if !s.is_empty() => FieldValue::Text(s),
            _ => FieldValue::NotAvailable,
        }
    }

    /// `Number` for a finite value, the sentinel otherwise.
    pub fn number_or_na(n: Option<f64>) -> Self {
        match n {
            Some(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::NotAvailable,
        }
    }

    pub fn yes_no(flag: bool) -> Self {
        FieldValue::text(if flag { "Yes" } else { "No" })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, FieldValue::NotAvailable)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            // f64's Display already drops a trailing ".0", like JS does
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::NotAvailable => f.write_str(SENTINEL),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::NotAvailable => serializer.serialize_str(SENTINEL),
        }
    }
}

/// One complete, ordered fingerprint record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FingerprintSnapshot {
    fields: Vec<(FieldKey, FieldValue)>,
}

impl FingerprintSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. A replaced field keeps its position.
    pub fn insert(&mut self, key: FieldKey, value: FieldValue) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Merge a source's partial result, keeping the source's order.
    pub fn merge<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (FieldKey, FieldValue)>,
    {
        for (key, value) in fields {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FieldKey, FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys that every snapshot must carry but this one does not.
    pub fn missing_required(&self) -> Vec<FieldKey> {
        FieldKey::ALL
            .iter()
            .copied()
            .filter(|k| !k.is_power() && !self.contains(*k))
            .collect()
    }
}

impl Serialize for FingerprintSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.id(), value)?;
        }
        map.end()
    }
}

//! Geo resolver: public IP, then geo data keyed by that IP.
//!
//! The ten geo fields share one upstream, so they fail together. Any
//! problem with either request turns every field, `ip` included, into the
//! sentinel. A half-filled geo block would be misleading.

use super::IntoFields;
use crate::error::{FingerprintError, Result};
use crate::snapshot::{FieldKey, FieldValue};
use crate::transport::HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;

/// `{ "ip": "..." }` from the public-IP service
#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: Option<String>,
}

/// Optional fields of the geo service. Values may be strings or numbers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoResponse {
    error: Option<bool>,
    reason: Option<String>,
    country_name: Option<Value>,
    region: Option<Value>,
    city: Option<Value>,
    postal: Option<Value>,
    latitude: Option<Value>,
    longitude: Option<Value>,
    org: Option<Value>,
    asn: Option<Value>,
    hostname: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    pub ip: FieldValue,
    pub country: FieldValue,
    pub region: FieldValue,
    pub city: FieldValue,
    pub postal: FieldValue,
    pub latitude: FieldValue,
    pub longitude: FieldValue,
    pub isp: FieldValue,
    pub asn: FieldValue,
    pub hostname: FieldValue,
}

impl GeoInfo {
    /// Every field degraded.
    pub fn unavailable() -> Self {
        Self {
            ip: FieldValue::NotAvailable,
            country: FieldValue::NotAvailable,
            region: FieldValue::NotAvailable,
            city: FieldValue::NotAvailable,
            postal: FieldValue::NotAvailable,
            latitude: FieldValue::NotAvailable,
            longitude: FieldValue::NotAvailable,
            isp: FieldValue::NotAvailable,
            asn: FieldValue::NotAvailable,
            hostname: FieldValue::NotAvailable,
        }
    }

    fn from_response(ip: String, geo: GeoResponse) -> Self {
        Self {
            ip: FieldValue::Text(ip),
            country: json_field(geo.country_name),
            region: json_field(geo.region),
            city: json_field(geo.city),
            postal: json_field(geo.postal),
            latitude: json_field(geo.latitude),
            longitude: json_field(geo.longitude),
            isp: json_field(geo.org),
            asn: json_field(geo.asn),
            hostname: json_field(geo.hostname),
        }
    }
}

impl IntoFields for GeoInfo {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)> {
        vec![
            (FieldKey::Ip, self.ip),
            (FieldKey::Country, self.country),
            (FieldKey::Region, self.region),
            (FieldKey::City, self.city),
            (FieldKey::Postal, self.postal),
            (FieldKey::Latitude, self.latitude),
            (FieldKey::Longitude, self.longitude),
            (FieldKey::Isp, self.isp),
            (FieldKey::Asn, self.asn),
            (FieldKey::Hostname, self.hostname),
        ]
    }
}

/// Absent, `null` and empty strings become the sentinel.
fn json_field(value: Option<Value>) -> FieldValue {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => FieldValue::Text(s),
        Some(Value::Number(n)) => FieldValue::number_or_na(n.as_f64()),
        Some(Value::Bool(b)) => FieldValue::Text(b.to_string()),
        _ => FieldValue::NotAvailable,
    }
}

pub struct GeoResolver {
    http: Rc<dyn HttpClient>,
    ip_lookup_url: String,
    geo_url_template: String,
}

impl GeoResolver {
    pub fn new(http: Rc<dyn HttpClient>, ip_lookup_url: String, geo_url_template: String) -> Self {
        Self {
            http,
            ip_lookup_url,
            geo_url_template,
        }
    }

    /// Resolve geo info. Never fails; errors are logged and degrade the
    /// whole group.
    pub async fn resolve(&self) -> GeoInfo {
        match self.try_resolve().await {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Geo lookup failed: {}", e);
                GeoInfo::unavailable()
            }
        }
    }

    async fn try_resolve(&self) -> Result<GeoInfo> {
        let ip_body = self.http.get_json(&self.ip_lookup_url).await?;
        if !ip_body.is_object() {
            return Err(FingerprintError::Malformed(
                "public-IP response is not an object".into(),
            ));
        }
        let ip =serde_json::from_value::<IpResponse>(ip_body)?
            .ip
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| FingerprintError::Malformed("public-IP response has no ip".into()))?;
        log::debug!("Public IP resolved: {}", ip);

        let geo_url = self.geo_url_template.replace(crate::config::IP_PLACEHOLDER, &ip);
        let geo_body = self.http.get_json(&geo_url).await?;
        if !geo_body.is_object() {
            return Err(FingerprintError::Malformed(
                "geo response is not an object".into(),
            ));
        }
        let geo: GeoResponse = serde_json::from_value(geo_body)?;

        // ipapi-style services answer rate limits with 200 + {"error": true}
        if geo.error == Some(true) {
            return Err(FingerprintError::Malformed(format!(
                "geo service error: {}",
                geo.reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(GeoInfo::from_response(ip, geo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeHttp;
    use futures::executor::block_on;
    use serde_json::json;

    const IP_URL: &str = "https://ip.test/";
    const GEO_TEMPLATE: &str = "https://geo.test/{ip}/json/";

    fn resolver(http: FakeHttp) -> GeoResolver {
        GeoResolver::new(Rc::new(http), IP_URL.into(), GEO_TEMPLATE.into())
    }

    #[test]
    fn test_resolve_maps_present_and_absent_fields() {
        let http = FakeHttp::new()
            .with_get(IP_URL, json!({ "ip": "203.0.113.5" }))
            .with_get(
                "https://geo.test/203.0.113.5/json/",
                json!({
                    "city": "Amsterdam",
                    "country_name": "Netherlands",
                    "latitude": 52.3676,
                    "asn": "AS1136",
                    "postal": null,
                    "region": ""
                }),
            );

        let geo = block_on(resolver(http).resolve());
        assert_eq!(geo.ip, FieldValue::text("203.0.113.5"));
        assert_eq!(geo.city, FieldValue::text("Amsterdam"));
        assert_eq!(geo.country, FieldValue::text("Netherlands"));
        assert_eq!(geo.latitude, FieldValue::Number(52.3676));
        assert_eq!(geo.asn, FieldValue::text("AS1136"));
        assert_eq!(geo.postal, FieldValue::NotAvailable);
        assert_eq!(geo.region, FieldValue::NotAvailable);
        assert_eq!(geo.longitude, FieldValue::NotAvailable);
        assert_eq!(geo.hostname, FieldValue::NotAvailable);
    }

    #[test]
    fn test_public_ip_failure_degrades_whole_group() {
        let http = FakeHttp::new().with_get_error(IP_URL);

        let fields = block_on(resolver(http).resolve()).into_fields();
        assert_eq!(fields.len(), 10);
        for (key, value) in fields {
            assert_eq!(value, FieldValue::NotAvailable, "{} leaked through", key);
        }
    }

    #[test]
    fn test_geo_failure_degrades_ip_too() {
        let http = FakeHttp::new()
            .with_get(IP_URL, json!({ "ip": "203.0.113.5" }))
            .with_get_error("https://geo.test/203.0.113.5/json/");

        assert_eq!(block_on(resolver(http).resolve()), GeoInfo::unavailable());
    }

    #[test]
    fn test_geo_error_body_is_failure() {
        let http = FakeHttp::new()
            .with_get(IP_URL, json!({ "ip": "203.0.113.5" }))
            .with_get(
                "https://geo.test/203.0.113.5/json/",
                json!({ "error": true, "reason": "RateLimited", "city": "Amsterdam" }),
            );

        assert_eq!(block_on(resolver(http).resolve()), GeoInfo::unavailable());
    }

    #[test]
    fn test_malformed_ip_body_is_failure() {
        let http = FakeHttp::new().with_get(IP_URL, json!({ "address": "203.0.113.5" }));
        assert_eq!(block_on(resolver(http).resolve()), GeoInfo::unavailable());

        let http = FakeHttp::new().with_get(IP_URL, json!(["203.0.113.5"]));
        assert_eq!(block_on(resolver(http).resolve()), GeoInfo::unavailable());
    }

    #[test]
    fn test_requests_are_sequential_and_keyed_by_ip() {
        let http = Rc::new(
            FakeHttp::new()
                .with_get(IP_URL, json!({ "ip": " 198.51.100.7 " }))
                .with_get("https://geo.test/198.51.100.7/json/", json!({})),
        );
        let resolver = GeoResolver::new(http.clone(), IP_URL.into(), GEO_TEMPLATE.into());

        let geo = block_on(resolver.resolve());
        assert_eq!(geo.ip, FieldValue::text("198.51.100.7"));
        assert_eq!(
            http.get_log(),
            vec![IP_URL.to_string(), "https://geo.test/198.51.100.7/json/".to_string()]
        );
    }
}

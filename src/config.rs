//! Collector configuration.
//!
//! Built from the options object the embedding page passes to `launch()`.
//! Every field is optional on the JS side; unspecified fields keep their
//! defaults.

use crate::error::{FingerprintError, Result};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";
pub const DEFAULT_GEO_URL_TEMPLATE: &str = "https://ipapi.co/{ip}/json/";
pub const DEFAULT_PROBE_TIMEOUT_MS: u32 = 2000;
pub const DEFAULT_OUTPUT_ELEMENT_ID: &str = "data-output";
pub const DEFAULT_SITE_NAME: &str = "HackMatrix";

/// Placeholder substituted with the public IP in `geo_url_template`.
pub const IP_PLACEHOLDER: &str = "{ip}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Public-IP service, answers `{ "ip": "..." }`
    pub ip_lookup_url: String,
    /// Geo service URL with an `{ip}` placeholder
    pub geo_url_template: String,
    /// Where the relay message is POSTed. Empty disables delivery.
    pub collector_endpoint: String,
    /// Upper bound for local candidate gathering
    pub probe_timeout_ms: u32,
    pub output_element_id: String,
    /// Shown in the relay message header
    pub site_name: String,
    pub initial_locale: Locale,
    /// One of error/warn/info/debug/trace
    pub log_level: String,
    pub matrix_background: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            geo_url_template: DEFAULT_GEO_URL_TEMPLATE.to_string(),
            collector_endpoint: String::new(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            output_element_id: DEFAULT_OUTPUT_ELEMENT_ID.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            initial_locale: Locale::default(),
            log_level: "info".to_string(),
            matrix_background: true,
        }
    }
}

impl CollectorConfig {
    /// Parse a JS options object. `undefined`/`null` yield the defaults.
    pub fn from_js(options: JsValue) -> Result<Self> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(options)
            .map_err(|e| FingerprintError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.geo_url_template.contains(IP_PLACEHOLDER) {
            return Err(FingerprintError::Config(format!(
                "geo_url_template must contain {}",
                IP_PLACEHOLDER
            )));
        }
        if self.probe_timeout_ms == 0 {
            return Err(FingerprintError::Config(
                "probe_timeout_ms must be positive".into(),
            ));
        }
        if self.log_level().is_none() {
            return Err(FingerprintError::Config(format!(
                "unknown log_level: {}",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Geo lookup URL for one public IP
    pub fn geo_url(&self, ip: &str) -> String {
        self.geo_url_template.replace(IP_PLACEHOLDER, ip)
    }

    pub fn log_level(&self) -> Option<log::Level> {
        self.log_level.parse().ok()
    }

    pub fn relay_enabled(&self) -> bool {
        !self.collector_endpoint.trim().is_empty()
    }
}

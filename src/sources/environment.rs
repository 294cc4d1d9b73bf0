//! Local environment reader.
//!
//! Pure attribute reads, no I/O and no suspension. The browser side lives
//! in `browser::environment`; this module only turns the raw attributes
//! into display values. Every attribute degrades on its own.

use super::IntoFields;
use crate::probe::Probe;
use crate::snapshot::{FieldKey, FieldValue};

/// `navigator.connection`, when exposed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionInfo {
    pub effective_type: Option<String>,
    pub downlink_mbps: Option<f64>,
}

/// Raw, unformatted environment attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEnvironment {
    pub user_agent: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub platform: Option<String>,
    /// Firefox-only `navigator.oscpu`
    pub oscpu: Option<String>,
    pub languages: Vec<String>,
    pub screen_size: Option<(f64, f64)>,
    pub viewport_size: Option<(f64, f64)>,
    pub pixel_ratio: Option<f64>,
    pub color_depth: Option<f64>,
    /// Chromium-only, in GiB
    pub device_memory: Option<f64>,
    pub hardware_concurrency: Option<f64>,
    pub cookie_enabled: Option<bool>,
    pub do_not_track: Option<String>,
    pub time_zone: Option<String>,
    pub local_time: Option<String>,
    /// `performance.now()`
    pub uptime_ms: Option<f64>,
    /// (name, version)
    pub plugins: Vec<(String, Option<String>)>,
    pub mime_types: Vec<String>,
    pub touch_support: bool,
    pub webgl_vendor: Probe<String>,
    pub connection: Probe<ConnectionInfo>,
}

/// Anything that can produce a `RawEnvironment` synchronously.
pub trait EnvironmentSource {
    fn read_raw(&self) -> RawEnvironment;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentInfo {
    pub user_agent: FieldValue,
    pub browser: FieldValue,
    pub browser_version: FieldValue,
    pub platform: FieldValue,
    pub os: FieldValue,
    pub languages: FieldValue,
    pub screen_resolution: FieldValue,
    pub viewport: FieldValue,
    pub pixel_ratio: FieldValue,
    pub color_depth: FieldValue,
    pub device_memory: FieldValue,
    pub cpu_cores: FieldValue,
    pub cookies_enabled: FieldValue,
    pub do_not_track: FieldValue,
    pub time_zone: FieldValue,
    pub local_time: FieldValue,
    pub uptime: FieldValue,
    pub plugins: FieldValue,
    pub mime_types: FieldValue,
    pub touch_support: FieldValue,
    pub webgl_vendor: FieldValue,
    pub connection: FieldValue,
}

impl IntoFields for EnvironmentInfo {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)> {
        vec![
            (FieldKey::UserAgent, self.user_agent),
            (FieldKey::Browser, self.browser),
            (FieldKey::BrowserVersion, self.browser_version),
            (FieldKey::Platform, self.platform),
            (FieldKey::Os, self.os),
            (FieldKey::Languages, self.languages),
            (FieldKey::ScreenResolution, self.screen_resolution),
            (FieldKey::Viewport, self.viewport),
            (FieldKey::PixelRatio, self.pixel_ratio),
            (FieldKey::ColorDepth, self.color_depth),
            (FieldKey::DeviceMemory, self.device_memory),
            (FieldKey::CpuCores, self.cpu_cores),
            (FieldKey::CookiesEnabled, self.cookies_enabled),
            (FieldKey::DoNotTrack, self.do_not_track),
            (FieldKey::TimeZone, self.time_zone),
            (FieldKey::LocalTime, self.local_time),
            (FieldKey::Uptime, self.uptime),
            (FieldKey::Plugins, self.plugins),
            (FieldKey::MimeTypes, self.mime_types),
            (FieldKey::TouchSupport, self.touch_support),
            (FieldKey::WebglVendor, self.webgl_vendor),
            (FieldKey::Connection, self.connection),
        ]
    }
}

pub struct EnvironmentReader {
    source: Box<dyn EnvironmentSource>,
}

impl EnvironmentReader {
    pub fn new(source: Box<dyn EnvironmentSource>) -> Self {
        Self { source }
    }

    pub fn read(&self) -> EnvironmentInfo {
        format_environment(self.source.read_raw())
    }
}

fn dimensions(size: Option<(f64, f64)>) -> FieldValue {
    match size {
        Some((w, h)) if w.is_finite() && h.is_finite() => FieldValue::Text(format!("{}x{}", w, h)),
        _ => FieldValue::NotAvailable,
    }
}

/// Comma-joined list, or the literal `None` when the list is empty.
fn joined_or_none(items: Vec<String>) -> FieldValue {
    if items.is_empty() {
        FieldValue::text("None")
    } else {
        FieldValue::Text(items.join(", "))
    }
}

fn plugin_label((name, version): (String, Option<String>)) -> String {
    match version {
        Some(v) if !v.is_empty() => format!("{} ({})", name, v),
        _ => name,
    }
}

fn connection_label(info: ConnectionInfo) -> Option<String> {
    let effective_type = info.effective_type.filter(|t| !t.is_empty())?;
    Some(match info.downlink_mbps.filter(|d| d.is_finite()) {
        Some(downlink) => format!("{}, {}Mbps", effective_type, downlink),
        None => effective_type,
    })
}

/// Positive numbers only; browsers report 0 for "unknown" in a few places.
fn positive_number(n: Option<f64>) -> FieldValue {
    FieldValue::number_or_na(n.filter(|v| *v > 0.0))
}

pub fn format_environment(raw: RawEnvironment) -> EnvironmentInfo {
    let languages = if raw.languages.is_empty() {
        FieldValue::NotAvailable
    } else {
        FieldValue::Text(raw.languages.join(", "))
    };

    EnvironmentInfo {
        user_agent: FieldValue::text_or_na(raw.user_agent),
        browser: FieldValue::text_or_na(raw.app_name),
        browser_version: FieldValue::text_or_na(raw.app_version),
        platform: FieldValue::text_or_na(raw.platform),
        os: FieldValue::text_or_na(raw.oscpu),
        languages,
        screen_resolution: dimensions(raw.screen_size),
        viewport: dimensions(raw.viewport_size),
        pixel_ratio: positive_number(raw.pixel_ratio),
        color_depth: positive_number(raw.color_depth),
        device_memory: positive_number(raw.device_memory),
        cpu_cores: positive_number(raw.hardware_concurrency),
        cookies_enabled: raw
            .cookie_enabled
            .map(FieldValue::yes_no)
            .unwrap_or(FieldValue::NotAvailable),
        do_not_track: FieldValue::text_or_na(raw.do_not_track),
        time_zone: FieldValue::text_or_na(raw.time_zone),
        local_time: FieldValue::text_or_na(raw.local_time),
        uptime: match raw.uptime_ms {
            Some(ms) if ms.is_finite() && ms >= 0.0 => {
                FieldValue::Text(format!("{}s", (ms / 1000.0).floor()))
            }
            _ => FieldValue::NotAvailable,
        },
        plugins: joined_or_none(raw.plugins.into_iter().map(plugin_label).collect()),
        mime_types: joined_or_none(raw.mime_types),
        touch_support: FieldValue::yes_no(raw.touch_support),
        webgl_vendor: raw.webgl_vendor.into_field(),
        connection: FieldValue::text_or_na(raw.connection.into_option().and_then(connection_label)),
    }
}

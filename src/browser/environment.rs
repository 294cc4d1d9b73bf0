//! Browser implementations of the environment, timing and battery sources.

use super::globals;
use crate::error::{FingerprintError, Result};
use crate::probe::Probe;
use crate::sources::environment::ConnectionInfo;
use crate::sources::{BatterySource, BatteryStatus, EnvironmentSource, NavigationTiming, RawEnvironment, TimingSource};
use async_trait::async_trait;
use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, WebGlRenderingContext};

/// `UNMASKED_VENDOR_WEBGL` from `WEBGL_debug_renderer_info`
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;

/// Reads `navigator`, `screen`, `window`, `Intl` and `performance`.
#[derive(Debug, Clone, Default)]
pub struct BrowserEnvironment;

impl BrowserEnvironment {
    pub fn new() -> Self {
        Self
    }
}

fn size(obj: &JsValue, width: &str, height: &str) -> Option<(f64, f64)> {
    Some((globals::get_f64(obj, width)?, globals::get_f64(obj, height)?))
}

fn languages(nav: &JsValue) -> Vec<String> {
    match globals::get(nav, "languages") {
        Some(list) => globals::array_like(&list)
            .into_iter()
            .filter_map(|v| v.as_string())
            .collect(),
        None => Vec::new(),
    }
}

fn time_zone() -> Option<String> {
    let format = js_sys::Intl::DateTimeFormat::new(&Array::new(), &js_sys::Object::new());
    globals::get_string(&format.resolved_options(), "timeZone")
}

fn local_time() -> Option<String> {
    let now = js_sys::Date::new_0();
    globals::call_method0(&now, "toLocaleString")?
        .ok()?
        .as_string()
}

fn plugins(nav: &JsValue) -> Vec<(String, Option<String>)> {
    let Some(list) = globals::get(nav, "plugins") else {
        return Vec::new();
    };
    globals::array_like(&list)
        .iter()
        .filter_map(|p| {
            let name = globals::get_string(p, "name")?;
            Some((name, globals::get_string(p, "version")))
        })
        .collect()
}

fn mime_types(nav: &JsValue) -> Vec<String> {
    let Some(list) = globals::get(nav, "mimeTypes") else {
        return Vec::new();
    };
    globals::array_like(&list)
        .iter()
        .filter_map(|m| globals::get_string(m, "type"))
        .collect()
}

/// Unmasked WebGL vendor, if both WebGL and the debug extension exist.
fn webgl_vendor() -> Probe<String> {
    let vendor = (|| -> Option<String> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let gl: WebGlRenderingContext = canvas.get_context("webgl").ok()??.dyn_into().ok()?;
        gl.get_extension("WEBGL_debug_renderer_info").ok()??;
        gl.get_parameter(UNMASKED_VENDOR_WEBGL).ok()?.as_string()
    })();
    Probe::from_option(vendor)
}

fn connection(nav: &JsValue) -> Probe<ConnectionInfo> {
    Probe::from_option(globals::get(nav, "connection")).map(|conn| ConnectionInfo {
        effective_type: globals::get_string(&conn, "effectiveType"),
        downlink_mbps: globals::get_f64(&conn, "downlink"),
    })
}

impl EnvironmentSource for BrowserEnvironment {
    fn read_raw(&self) -> RawEnvironment {
        let global = js_sys::global();
        let nav = globals::get_global("navigator").unwrap_or(JsValue::UNDEFINED);
        let screen = globals::get_global("screen").unwrap_or(JsValue::UNDEFINED);
        let performance = globals::get_global("performance").unwrap_or(JsValue::UNDEFINED);

        RawEnvironment {
            user_agent: globals::get_string(&nav, "userAgent"),
            app_name: globals::get_string(&nav, "appName"),
            app_version: globals::get_string(&nav, "appVersion"),
            platform: globals::get_string(&nav, "platform"),
            oscpu: globals::get_string(&nav, "oscpu"),
            languages: languages(&nav),
            screen_size: size(&screen, "width", "height"),
            viewport_size: size(&global, "innerWidth", "innerHeight"),
            pixel_ratio: globals::get_f64(&global, "devicePixelRatio"),
            color_depth: globals::get_f64(&screen, "colorDepth"),
            device_memory: globals::get_f64(&nav, "deviceMemory"),
            hardware_concurrency: globals::get_f64(&nav, "hardwareConcurrency"),
            cookie_enabled: globals::get_bool(&nav, "cookieEnabled"),
            do_not_track: globals::get_string(&nav, "doNotTrack"),
            time_zone: time_zone(),
            local_time: local_time(),
            uptime_ms: globals::call_method0(&performance, "now")
                .and_then(|r| r.ok())
                .and_then(|v| v.as_f64()),
            plugins: plugins(&nav),
            mime_types: mime_types(&nav),
            touch_support: globals::has(&global, "ontouchstart"),
            webgl_vendor: webgl_vendor(),
            connection: connection(&nav),
        }
    }
}

/// Reads the legacy `performance.timing` marks.
#[derive(Debug, Clone, Default)]
pub struct BrowserTiming;

impl BrowserTiming {
    pub fn new() -> Self {
        Self
    }
}

impl TimingSource for BrowserTiming {
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        let timing = globals::get(&globals::get_global("performance")?, "timing")?;
        let mark = |name: &str| globals::get_f64(&timing, name).unwrap_or(0.0);
        Some(NavigationTiming {
            navigation_start: mark("navigationStart"),
            domain_lookup_start: mark("domainLookupStart"),
            domain_lookup_end: mark("domainLookupEnd"),
            connect_start: mark("connectStart"),
            connect_end: mark("connectEnd"),
            request_start: mark("requestStart"),
            response_end: mark("responseEnd"),
            load_event_end: mark("loadEventEnd"),
        })
    }
}

/// `navigator.getBattery()`, where it exists.
#[derive(Debug, Clone, Default)]
pub struct BrowserBattery;

impl BrowserBattery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl BatterySource for BrowserBattery {
    async fn battery(&self) -> Probe<Result<BatteryStatus>> {
        let Some(nav) = globals::get_global("navigator") else {
            return Probe::Unsupported;
        };
        let Some(call) = globals::call_method0(&nav, "getBattery") else {
            return Probe::Unsupported;
        };
        Probe::Available(read_battery(call).await)
    }
}

async fn read_battery(call: std::result::Result<JsValue, JsValue>) -> Result<BatteryStatus> {
    let promise: Promise = call
        .map_err(|e| FingerprintError::from_js("getBattery", e))?
        .dyn_into()
        .map_err(|_| FingerprintError::Malformed("getBattery did not return a Promise".into()))?;
    let manager = JsFuture::from(promise)
        .await
        .map_err(|e| FingerprintError::from_js("getBattery", e))?;

    Ok(BatteryStatus {
        level: globals::get_f64(&manager, "level").unwrap_or(f64::NAN),
        charging: globals::get_bool(&manager, "charging").unwrap_or(false),
        charging_time: globals::get_f64(&manager, "chargingTime").unwrap_or(f64::INFINITY),
        discharging_time: globals::get_f64(&manager, "dischargingTime").unwrap_or(f64::INFINITY),
    })
}

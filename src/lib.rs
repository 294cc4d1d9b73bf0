//! # Fingerprint WASM
//!
//! A browser fingerprint collector compiled to WebAssembly.
//!
//! The page calls `launch()`; on page ready (and on every language toggle)
//! the collector resolves the public IP and its geolocation, reads the
//! browser environment, navigation timing, battery and local network
//! addresses, renders the result and relays it to a collector endpoint.
//!
//! ## Architecture
//!
//! ```text
//! FingerprintApp
//!   ↓
//! SnapshotBuilder ── GeoResolver / EnvironmentReader / PerformanceReader
//!   ↓                PowerReader / LocalNetworkProber
//! Presenter ── DomOutput
//!   ↓
//! RelayAdapter ── FetchClient (no-cors POST)
//! ```
//!
//! Every browser API sits behind a small trait (`HttpClient`,
//! `EnvironmentSource`, `CandidateGatherer`, ...), so the whole pipeline
//! also runs natively under test.

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod aggregator;
pub mod app;
pub mod browser;
pub mod config;
mod error;
pub mod locale;
pub mod presenter;
pub mod probe;
pub mod relay;
pub mod runtime;
pub mod snapshot;
pub mod sources;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use aggregator::SnapshotBuilder;
pub use app::{FingerprintApp, RunReport};
pub use config::CollectorConfig;
pub use error::{ErrorCategory, ErrorCode, ErrorInfo, FingerprintError, Result};
pub use locale::{Locale, PresentationContext};
pub use presenter::{Presenter, RenderTarget, RenderedField};
pub use probe::Probe;
pub use relay::{Delivery, DeliveryOutcome, RelayAdapter};
pub use runtime::WasmRuntime;
pub use snapshot::{FieldKey, FieldValue, FingerprintSnapshot, SENTINEL};

use browser::{BrowserBattery, BrowserEnvironment, BrowserTiming, DomOutput, LocaleToggle, MatrixRain};
use sources::{EnvironmentReader, GeoResolver, LocalNetworkProber, PerformanceReader, PowerReader};
use transport::{FetchClient, RtcCandidateGatherer};

#[wasm_bindgen(start)]
pub fn init() {
    // The logger passes everything; `log::max_level` does the filtering so
    // `launch` can change it later.
    if console_log::init_with_level(log::Level::Trace).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
    log::info!("Fingerprint WASM initialized");
}

fn apply_log_level(config: &CollectorConfig) {
    if let Some(level) = config.log_level() {
        log::set_max_level(level.to_level_filter());
    }
}

/// Wire the pipeline to the real browser sources.
fn build_builder(config: &CollectorConfig, http: Rc<FetchClient>) -> SnapshotBuilder {
    SnapshotBuilder::new(
        GeoResolver::new(http, config.ip_lookup_url.clone(), config.geo_url_template.clone()),
        EnvironmentReader::new(Box::new(BrowserEnvironment::new())),
        PerformanceReader::new(Box::new(BrowserTiming::new())),
        PowerReader::new(Box::new(BrowserBattery::new())),
        LocalNetworkProber::new(
            Box::new(RtcCandidateGatherer::new()),
            Box::new(WasmRuntime::new()),
            config.probe_timeout_ms,
        ),
    )
}

fn build_app(config: &CollectorConfig) -> FingerprintApp {
    let http = Rc::new(FetchClient::new());
    FingerprintApp::new(
        build_builder(config, http.clone()),
        RelayAdapter::new(http, config.collector_endpoint.clone()),
        Box::new(DomOutput::new(config.output_element_id.clone())),
        config.initial_locale,
        config.site_name.clone(),
    )
}

/// Spawn one run; the delivery is settled in the background.
fn spawn_run(app: Rc<FingerprintApp>) {
    WasmRuntime::new().spawn(async move {
        match app.run().await {
            Ok(report) => {
                relay::settle(report.delivery).await;
            }
            Err(e) => log::warn!("Run skipped: {}", e),
        }
    });
}

/// Run `f` once the DOM is parsed.
fn on_page_ready(f: impl FnOnce() + 'static) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FingerprintError::Unsupported("no document".into()))?;

    let loading = browser::globals::get_string(&document, "readyState").as_deref() == Some("loading");
    if !loading {
        f();
        return Ok(());
    }

    let handler = Closure::once(f);
    document
        .add_event_listener_with_callback("DOMContentLoaded", handler.as_ref().unchecked_ref())
        .map_err(|e| FingerprintError::from_js("DOMContentLoaded listener", e))?;
    handler.forget();
    Ok(())
}

fn bind_toggle(app: Rc<FingerprintApp>) -> Result<()> {
    let toggle = Rc::new(LocaleToggle::new(LocaleToggle::DEFAULT_BUTTON_ID));
    let button = toggle.button()?;
    toggle.apply(app.locale())?;

    let on_click = {
        let toggle = toggle.clone();
        Closure::wrap(Box::new(move || {
            let locale = app.flip_locale();
            if let Err(e) = toggle.apply(locale) {
                log::warn!("Updating page language failed: {}", e);
            }
            spawn_run(app.clone());
        }) as Box<dyn FnMut()>)
    };
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|e| FingerprintError::from_js("click listener", e))?;
    on_click.forget();
    Ok(())
}

/// Start the collector on the current page.
///
/// `options` is an optional object with `CollectorConfig` fields.
#[wasm_bindgen]
pub fn launch(options: JsValue) -> std::result::Result<(), JsValue> {
    let config = CollectorConfig::from_js(options)?;
    apply_log_level(&config);

    if !config.relay_enabled() {
        log::warn!("collector_endpoint is empty, snapshots will not be relayed");
    }

    if config.matrix_background {
        if let Err(e) = MatrixRain::start(browser::matrix::CANVAS_ID) {
            log::warn!("Matrix background disabled: {}", e);
        }
    }

    let app = Rc::new(build_app(&config));

    if let Err(e) = bind_toggle(app.clone()) {
        log::warn!("Language toggle unavailable: {}", e);
    }

    on_page_ready(move || spawn_run(app))?;
    Ok(())
}

/// Collect one snapshot without rendering or relaying it.
///
/// Resolves to a plain object keyed by field id, in canonical order.
#[wasm_bindgen]
pub async fn collect_snapshot(options: JsValue) -> std::result::Result<JsValue, JsValue> {
    use serde::Serialize;

    let config = CollectorConfig::from_js(options)?;
    apply_log_level(&config);

    let builder = build_builder(&config, Rc::new(FetchClient::new()));
    let snapshot = builder.build().await?;

    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    snapshot
        .serialize(&serializer)
        .map_err(|e| FingerprintError::Js(format!("snapshot serialization: {}", e)).into())
}

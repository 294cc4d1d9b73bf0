//! Browser integration tests
//!
//! Exercise the browser-backed sources, the DOM output and the options
//! parsing against a real page.
//!
//! Run with: wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]

use fingerprint_wasm::browser::{BrowserEnvironment, BrowserTiming, DomOutput, LocaleToggle};
use fingerprint_wasm::sources::{EnvironmentReader, EnvironmentSource, LocalNetworkProber, TimingSource};
use fingerprint_wasm::transport::RtcCandidateGatherer;
use fingerprint_wasm::{CollectorConfig, FieldValue, Locale, RenderTarget, RenderedField, WasmRuntime};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(id: &str) -> web_sys::Element {
    let document = document();
    if let Some(old) = document.get_element_by_id(id) {
        old.remove();
    }
    let element = document.create_element("div").unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn test_config_from_js_options() {
    let options = Object::new();
    Reflect::set(&options, &"collector_endpoint".into(), &"https://collector.test/hook".into()).unwrap();
    Reflect::set(&options, &"probe_timeout_ms".into(), &JsValue::from(500)).unwrap();
    Reflect::set(&options, &"initial_locale".into(), &"en".into()).unwrap();

    let config = CollectorConfig::from_js(options.into()).unwrap();
    assert_eq!(config.probe_timeout_ms, 500);
    assert_eq!(config.initial_locale, Locale::En);
    assert!(config.relay_enabled());
    assert_eq!(config.output_element_id, "data-output");

    assert_eq!(CollectorConfig::from_js(JsValue::UNDEFINED).unwrap(), CollectorConfig::default());
}

#[wasm_bindgen_test]
fn test_config_rejects_template_without_placeholder() {
    let options = Object::new();
    Reflect::set(&options, &"geo_url_template".into(), &"https://geo.test/json".into()).unwrap();
    assert!(CollectorConfig::from_js(options.into()).is_err());
}

#[wasm_bindgen_test]
fn test_browser_environment_reads_navigator() {
    let raw = BrowserEnvironment::new().read_raw();
    assert!(raw.user_agent.as_deref().map_or(false, |ua| !ua.is_empty()));
    assert!(raw.screen_size.is_some());
    assert!(raw.time_zone.is_some());

    let info = EnvironmentReader::new(Box::new(BrowserEnvironment::new())).read();
    assert!(info.user_agent.is_available());
    match &info.screen_resolution {
        FieldValue::Text(size) => assert!(size.contains('x')),
        other => panic!("unexpected screen size {:?}", other),
    }
}

#[wasm_bindgen_test]
fn test_browser_timing_present() {
    let timing = BrowserTiming::new().navigation_timing().expect("performance.timing");
    assert!(timing.navigation_start > 0.0);
}

#[wasm_bindgen_test]
fn test_dom_output_replaces_rows() {
    let container = mount("test-output");
    let output = DomOutput::new("test-output");
    let rows = vec![
        RenderedField { glyph: "🏙️", label: "City", value: "Amsterdam".into() },
        RenderedField { glyph: "📮", label: "Postal Code", value: "<b>not available</b>".into() },
    ];

    output.replace(&rows).unwrap();
    output.replace(&rows).unwrap();

    let items = container.query_selector_all(".data-item").unwrap();
    assert_eq!(items.length(), 2);
    // Values are text, never markup
    assert!(container.query_selector("b").unwrap().is_none());
    assert!(container.text_content().unwrap().contains("City: Amsterdam"));
}

#[wasm_bindgen_test]
fn test_dom_output_missing_container() {
    let output = DomOutput::new("does-not-exist");
    assert!(output.replace(&[]).is_err());
}

#[wasm_bindgen_test]
fn test_locale_toggle_updates_page_text() {
    let button = mount("test-toggle");
    button.set_inner_html(r#"<span class="lang-icon"></span><span class="lang-text"></span>"#);
    let heading = mount("test-heading");
    heading.set_attribute("data-en", "Your fingerprint").unwrap();
    heading.set_attribute("data-ru", "Ваш отпечаток").unwrap();

    let toggle = LocaleToggle::new("test-toggle");
    toggle.apply(Locale::En).unwrap();
    assert_eq!(heading.text_content().unwrap(), "Your fingerprint");
    assert_eq!(
        button.query_selector(".lang-text").unwrap().unwrap().text_content().unwrap(),
        "English"
    );

    toggle.apply(Locale::Ru).unwrap();
    assert_eq!(heading.text_content().unwrap(), "Ваш отпечаток");
}

#[wasm_bindgen_test]
async fn test_local_network_probe_finishes() {
    let prober = LocalNetworkProber::new(
        Box::new(RtcCandidateGatherer::new()),
        Box::new(WasmRuntime::new()),
        2000,
    );
    // Headless browsers usually hand out mDNS names, so the set may be empty
    let (ips, _outcome) = prober.probe_with_outcome().await;
    assert!(ips.iter().all(|ip| !ip.is_link_local()));
}

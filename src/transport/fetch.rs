//! Fetch API client
//!
//! GETs go out in `cors` mode and their JSON body is parsed. POSTs go out
//! in `no-cors` mode: the response is opaque, so nothing about it is read
//! or checked.

use super::HttpClient;
use crate::error::{FingerprintError, Result};
use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone, Default)]
pub struct FetchClient;

impl FetchClient {
    pub fn new() -> Self {
        Self
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let window =
            web_sys::window().ok_or_else(|| FingerprintError::Unsupported("no window object".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(|e| FingerprintError::Network(format!("fetch {} failed: {:?}", request.url(), e)))?;

        resp_value
            .dyn_into::<Response>()
            .map_err(|_| FingerprintError::Malformed("response is not a Response".into()))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| FingerprintError::from_js("Request::new", e))?;

        let resp = self.send(&request).await?;
        if !resp.ok() {
            return Err(FingerprintError::Http {
                status: resp.status(),
                url: url.to_string(),
            });
        }

        // Read as text and parse with serde_json so key order survives
        let text_promise = resp
            .text()
            .map_err(|e| FingerprintError::from_js("Response.text", e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| FingerprintError::Network(format!("reading {} failed: {:?}", url, e)))?
            .as_string()
            .ok_or_else(|| FingerprintError::Malformed(format!("non-text body from {}", url)))?;

        Ok(serde_json::from_str(&text)?)
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::NoCors);
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body.to_string()));

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| FingerprintError::from_js("Request::new", e))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| FingerprintError::from_js("set header", e))?;

        self.send(&request).await?;
        Ok(())
    }
}

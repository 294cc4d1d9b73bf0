//! Browser transports used by the collector
//!
//! - `fetch`: JSON over the Fetch API (geo lookups, relay delivery)
//! - `webrtc`: local ICE candidate gathering for the network prober

pub mod fetch;
pub mod webrtc;

pub use fetch::FetchClient;
pub use webrtc::RtcCandidateGatherer;

use crate::error::Result;
use async_trait::async_trait;

/// Minimal HTTP surface the pipeline needs.
#[async_trait(?Send)]
pub trait HttpClient {
    /// GET `url` and parse the body as JSON. Non-2xx is an error.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// POST `body` as JSON without observing the response.
    ///
    /// `Ok` only means the request left the page.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()>;
}

//! Relay adapter: one-way delivery of the relay message.
//!
//! `dispatch` hands back a `Delivery` future. Production spawns it through
//! `settle`, which only logs the outcome; tests await it. Nothing is
//! retried.

use crate::error::Result;
use crate::transport::HttpClient;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::json;
use std::rc::Rc;

/// Completion signal of one delivery attempt. Dropping it is fine.
pub type Delivery = LocalBoxFuture<'static, Result<()>>;

/// Result of handing a message to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed,
    Skipped,
}

pub struct RelayAdapter {
    http: Rc<dyn HttpClient>,
    endpoint: String,
}

impl RelayAdapter {
    pub fn new(http: Rc<dyn HttpClient>, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    pub fn is_enabled(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Start delivering `text`. The returned future must be polled for the
    /// request to go out. `None` when no endpoint is configured.
    pub fn dispatch(&self, text: String) -> Option<Delivery> {
        if !self.is_enabled() {
            log::warn!("No collector endpoint configured, relay skipped");
            return None;
        }
        log::debug!("Relaying {} byte message to {}", text.len(), self.endpoint);
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        Some(
            async move {
                let body = json!({ "text": text });
                http.post_json(&endpoint, &body).await
            }
            .boxed_local(),
        )
    }
}

/// Drive a delivery to completion and log how it went.
pub async fn settle(delivery: Option<Delivery>) -> DeliveryOutcome {
    let Some(delivery) = delivery else {
        return DeliveryOutcome::Skipped;
    };
    match delivery.await {
        Ok(()) => {
            log::info!("Relay request sent");
            DeliveryOutcome::Sent
        }
        Err(e) => {
            log::warn!("Relay delivery failed: {}", e);
            DeliveryOutcome::Failed
        }
    }
}

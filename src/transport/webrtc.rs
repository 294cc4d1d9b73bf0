//! ICE candidate gathering over a local-only RTCPeerConnection.
//!
//! No STUN or TURN servers are configured, so every candidate the browser
//! reports is a host candidate. A data channel is opened only to give the
//! offer a media section; nothing is ever sent over it.
//!
//! Candidate callbacks feed an unbounded channel read by the local network
//! prober. The offer/answer dance is spawned, so `open` returns as soon as
//! the connection exists.

use crate::error::{FingerprintError, Result};
use crate::runtime::WasmRuntime;
use crate::sources::{CandidateEvent, CandidateGatherer, GatheringSession, PeerHandle};
use futures::channel::mpsc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    RtcConfiguration, RtcDataChannel, RtcPeerConnection, RtcPeerConnectionIceEvent,
    RtcSessionDescriptionInit,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RtcCandidateGatherer;

impl RtcCandidateGatherer {
    pub fn new() -> Self {
        Self
    }
}

/// The live connection plus everything JS holds a reference to.
struct RtcPeer {
    pc: RtcPeerConnection,
    _channel: RtcDataChannel,
    // Dropping the closure while the connection can still call it would throw
    _on_candidate: Closure<dyn FnMut(RtcPeerConnectionIceEvent)>,
}

impl PeerHandle for RtcPeer {
    fn close(&self) {
        self.pc.set_onicecandidate(None);
        self.pc.close();
        log::debug!("Peer connection closed");
    }
}

fn candidate_event(event: &RtcPeerConnectionIceEvent) -> CandidateEvent {
    match event.candidate() {
        Some(candidate) => {
            let line = candidate.candidate();
            if line.is_empty() {
                CandidateEvent::GatheringComplete
            } else {
                CandidateEvent::Candidate(line)
            }
        }
        None => CandidateEvent::GatheringComplete,
    }
}

async fn negotiate(pc: RtcPeerConnection) -> std::result::Result<(), JsValue> {
    let offer = JsFuture::from(pc.create_offer()).await?;
    let offer: RtcSessionDescriptionInit = offer.unchecked_into();
    JsFuture::from(pc.set_local_description(&offer)).await?;
    Ok(())
}

impl CandidateGatherer for RtcCandidateGatherer {
    fn open(&self) -> Result<GatheringSession> {
        if crate::browser::globals::get_global("RTCPeerConnection").is_none() {
            return Err(FingerprintError::Unsupported("RTCPeerConnection".into()));
        }

        let config = RtcConfiguration::new();
        config.set_ice_servers(&js_sys::Array::new());
        let pc = RtcPeerConnection::new_with_configuration(&config)
            .map_err(|e| FingerprintError::from_js("RTCPeerConnection", e))?;

        let (tx, rx) = mpsc::unbounded();

        let on_candidate = {
            let tx = tx.clone();
            Closure::wrap(Box::new(move |event: RtcPeerConnectionIceEvent| {
                // Receiver already gone means the prober finished
                let _ = tx.unbounded_send(candidate_event(&event));
            }) as Box<dyn FnMut(RtcPeerConnectionIceEvent)>)
        };
        pc.set_onicecandidate(Some(on_candidate.as_ref().unchecked_ref()));

        let channel = pc.create_data_channel("");

        {
            let pc = pc.clone();
            WasmRuntime::new().spawn(async move {
                if let Err(e) = negotiate(pc).await {
                    let err = FingerprintError::from_js("createOffer", e);
                    log::warn!("Offer negotiation failed: {}", err);
                    let _ = tx.unbounded_send(CandidateEvent::Failed(err.to_string()));
                }
            });
        }

        log::debug!("Peer connection opened, gathering candidates");
        Ok(GatheringSession::new(
            rx,
            Box::new(RtcPeer {
                pc,
                _channel: channel,
                _on_candidate: on_candidate,
            }),
        ))
    }
}

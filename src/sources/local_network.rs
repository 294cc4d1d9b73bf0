//! Local network prober.
//!
//! Uses the ICE candidate gathering of a throwaway peer connection to list
//! locally reachable IPv4 addresses. Gathering is raced against a timer;
//! the first to finish wins and the peer connection is closed either way.

use super::IntoFields;
use crate::error::Result;
use crate::runtime::Sleeper;
use crate::snapshot::{FieldKey, FieldValue};
use futures::channel::mpsc;
use futures::future::{self, Either};
use futures::{pin_mut, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

lazy_static! {
    static ref IPV4_QUAD: Regex = Regex::new(r"(\d+\.\d+\.\d+\.\d+)").unwrap();
}

/// Events emitted by a gathering session.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateEvent {
    /// One `candidate:` line
    Candidate(String),
    /// The empty terminal candidate
    GatheringComplete,
    /// Offer negotiation failed, no more candidates will come
    Failed(String),
}

/// The peer connection behind a session.
pub trait PeerHandle {
    fn close(&self);
}

/// A running candidate-gathering session.
pub struct GatheringSession {
    events: mpsc::UnboundedReceiver<CandidateEvent>,
    peer: Box<dyn PeerHandle>,
    closed: bool,
}

impl GatheringSession {
    pub fn new(events: mpsc::UnboundedReceiver<CandidateEvent>, peer: Box<dyn PeerHandle>) -> Self {
        Self {
            events,
            peer,
            closed: false,
        }
    }

    pub async fn next_event(&mut self) -> Option<CandidateEvent> {
        self.events.next().await
    }

    /// Close the peer connection. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.events.close();
            self.peer.close();
        }
    }
}

impl Drop for GatheringSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Creates a peer connection with no ICE servers and starts gathering.
///
/// `open` must not block on negotiation; it only fails when the
/// capability is missing.
pub trait CandidateGatherer {
    fn open(&self) -> Result<GatheringSession>;
}

/// Deduplicated IPv4 addresses in discovery order, never link-local.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalIpSet {
    addrs: Vec<Ipv4Addr>,
}

impl LocalIpSet {
    /// Record the address found in a candidate line. Returns true if it
    /// was new.
    pub fn observe(&mut self, candidate: &str) -> bool {
        match extract_ipv4(candidate) {
            Some(addr) if !self.addrs.contains(&addr) => {
                self.addrs.push(addr);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.addrs.iter()
    }
}

impl IntoFields for LocalIpSet {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)> {
        let value = if self.addrs.is_empty() {
            FieldValue::NotAvailable
        } else {
            let joined: Vec<String> = self.addrs.iter().map(|a| a.to_string()).collect();
            FieldValue::Text(joined.join(", "))
        };
        vec![(FieldKey::LocalIps, value)]
    }
}

/// First dotted quad in a candidate line, if it is a usable IPv4 address.
pub fn extract_ipv4(candidate: &str) -> Option<Ipv4Addr> {
    let quad = IPV4_QUAD.captures(candidate)?.get(1)?.as_str();
    let addr: Ipv4Addr = quad.parse().ok()?;
    if addr.is_link_local() {
        return None;
    }
    Some(addr)
}

/// How a probing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Complete,
    TimedOut,
    Failed,
}

pub struct LocalNetworkProber {
    gatherer: Box<dyn CandidateGatherer>,
    sleeper: Box<dyn Sleeper>,
    timeout_ms: u32,
}

impl LocalNetworkProber {
    pub fn new(gatherer: Box<dyn CandidateGatherer>, sleeper: Box<dyn Sleeper>, timeout_ms: u32) -> Self {
        Self {
            gatherer,
            sleeper,
            timeout_ms,
        }
    }

    pub async fn probe(&self) -> LocalIpSet {
        self.probe_with_outcome().await.0
    }

    pub async fn probe_with_outcome(&self) -> (LocalIpSet, ProbeOutcome) {
        let mut ips = LocalIpSet::default();

        let mut session = match self.gatherer.open() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Local network probe unavailable: {}", e);
                return (ips, ProbeOutcome::Failed);
            }
        };

        let outcome = {
            let gather = gather_into(&mut session, &mut ips);
            let timeout = self.sleeper.sleep(self.timeout_ms);
            pin_mut!(gather);

            match future::select(gather, timeout).await {
                Either::Left((outcome, _)) => outcome,
                Either::Right(_) => ProbeOutcome::TimedOut,
            }
        };

        session.close();

        match outcome {
            ProbeOutcome::TimedOut => log::debug!(
                "Candidate gathering timed out after {}ms with {} address(es)",
                self.timeout_ms,
                ips.len()
            ),
            _ => log::debug!("Candidate gathering ended ({:?}) with {} address(es)", outcome, ips.len()),
        }

        (ips, outcome)
    }
}

async fn gather_into(session: &mut GatheringSession, ips: &mut LocalIpSet) -> ProbeOutcome {
    while let Some(event) = session.next_event().await {
        match event {
            CandidateEvent::Candidate(line) => {
                ips.observe(&line);
            }
            CandidateEvent::GatheringComplete => return ProbeOutcome::Complete,
            CandidateEvent::Failed(reason) => {
                log::warn!("Candidate gathering failed: {}", reason);
                return ProbeOutcome::Failed;
            }
        }
    }
    // Sender dropped without a terminal event
    ProbeOutcome::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeSleeper, ScriptedGatherer};
    use futures::executor::block_on;

    fn candidate(addr: &str) -> CandidateEvent {
        CandidateEvent::Candidate(format!(
            "candidate:842163049 1 udp 1677729535 {} 54321 typ srflx raddr 0.0.0.0 rport 0",
            addr
        ))
    }

    #[test]
    fn test_extract_ipv4() {
        assert_eq!(
            extract_ipv4("candidate:1 1 udp 2122260223 192.168.1.23 50000 typ host"),
            Some(Ipv4Addr::new(192, 168, 1, 23))
        );
        assert_eq!(extract_ipv4("candidate:1 1 udp 2122260223 169.254.10.2 50000 typ host"), None);
        assert_eq!(extract_ipv4("candidate:1 1 udp 2122260223 4f1c.local 50000 typ host"), None);
        assert_eq!(extract_ipv4("candidate:1 1 udp 1 999.1.1.1 5 typ host"), None);
    }

    #[test]
    fn test_complete_gathering_dedupes_and_filters() {
        let gatherer = ScriptedGatherer::new(vec![
            candidate("192.168.1.23"),
            candidate("169.254.3.4"),
            candidate("10.0.0.8"),
            candidate("192.168.1.23"),
            CandidateEvent::GatheringComplete,
            candidate("172.16.0.1"),
        ]);
        let closes = gatherer.peer.closes.clone();
        let prober = LocalNetworkProber::new(Box::new(gatherer), Box::new(FakeSleeper { fires: false }), 2000);

        let (ips, outcome) = block_on(prober.probe_with_outcome());
        assert_eq!(outcome, ProbeOutcome::Complete);
        let addrs: Vec<String> = ips.iter().map(|a| a.to_string()).collect();
        assert_eq!(addrs, vec!["192.168.1.23", "10.0.0.8"]);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_timeout_keeps_partial_result_and_closes() {
        let gatherer = ScriptedGatherer::stalled(vec![candidate("192.168.1.23")]);
        let closes = gatherer.peer.closes.clone();
        let prober = LocalNetworkProber::new(Box::new(gatherer), Box::new(FakeSleeper { fires: true }), 2000);

        let (ips, outcome) = block_on(prober.probe_with_outcome());
        assert_eq!(outcome, ProbeOutcome::TimedOut);
        assert_eq!(ips.len(), 1);
        assert_eq!(closes.get(), 1, "peer connection must be released on timeout");
    }

    #[test]
    fn test_unsupported_yields_empty_set() {
        let prober = LocalNetworkProber::new(
            Box::new(ScriptedGatherer::unsupported()),
            Box::new(FakeSleeper { fires: false }),
            2000,
        );
        let (ips, outcome) = block_on(prober.probe_with_outcome());
        assert!(ips.is_empty());
        assert_eq!(outcome, ProbeOutcome::Failed);
        assert_eq!(
            ips.into_fields(),
            vec![(FieldKey::LocalIps, FieldValue::NotAvailable)]
        );
    }

    #[test]
    fn test_negotiation_failure_ends_session() {
        let gatherer = ScriptedGatherer::stalled(vec![
            candidate("10.1.2.3"),
            CandidateEvent::Failed("createOffer rejected".into()),
        ]);
        let prober = LocalNetworkProber::new(Box::new(gatherer), Box::new(FakeSleeper { fires: false }), 2000);

        let (ips, outcome) = block_on(prober.probe_with_outcome());
        assert_eq!(outcome, ProbeOutcome::Failed);
        assert_eq!(
            ips.into_fields(),
            vec![(FieldKey::LocalIps, FieldValue::text("10.1.2.3"))]
        );
    }
}

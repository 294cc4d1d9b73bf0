//! Fakes shared by the unit tests.

use crate::error::{FingerprintError, Result};
use crate::probe::Probe;
use crate::runtime::Sleeper;
use crate::sources::{
    BatterySource, BatteryStatus, CandidateEvent, CandidateGatherer, EnvironmentSource,
    GatheringSession, NavigationTiming, PeerHandle, RawEnvironment, TimingSource,
};
use crate::sources::environment::ConnectionInfo;
use crate::transport::HttpClient;
use async_trait::async_trait;
use futures::channel::mpsc;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Canned JSON responses keyed by URL. Unknown URLs fail.
#[derive(Default)]
pub struct FakeHttp {
    gets: HashMap<String, Option<serde_json::Value>>,
    get_log: RefCell<Vec<String>>,
    posts: RefCell<Vec<(String, serde_json::Value)>>,
    fail_posts: bool,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(mut self, url: &str, body: serde_json::Value) -> Self {
        self.gets.insert(url.to_string(), Some(body));
        self
    }

    pub fn with_get_error(mut self, url: &str) -> Self {
        self.gets.insert(url.to_string(), None);
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn get_log(&self) -> Vec<String> {
        self.get_log.borrow().clone()
    }

    pub fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.posts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpClient for FakeHttp {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.get_log.borrow_mut().push(url.to_string());
        match self.gets.get(url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(FingerprintError::Network(format!("{} unreachable", url))),
            None => Err(FingerprintError::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        self.posts.borrow_mut().push((url.to_string(), body.clone()));
        if self.fail_posts {
            return Err(FingerprintError::Network("collector unreachable".into()));
        }
        Ok(())
    }
}

/// Environment source returning a fixed raw record.
pub struct FakeEnvironment(pub RawEnvironment);

impl EnvironmentSource for FakeEnvironment {
    fn read_raw(&self) -> RawEnvironment {
        self.0.clone()
    }
}

pub fn sample_environment() -> RawEnvironment {
    RawEnvironment {
        user_agent: Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".into()),
        app_name: Some("Netscape".into()),
        app_version: Some("5.0 (X11)".into()),
        platform: Some("Linux x86_64".into()),
        oscpu: Some("Linux x86_64".into()),
        languages: vec!["en-US".into(), "en".into()],
        screen_size: Some((1920.0, 1080.0)),
        viewport_size: Some((1280.0, 720.0)),
        pixel_ratio: Some(1.0),
        color_depth: Some(24.0),
        device_memory: None,
        hardware_concurrency: Some(8.0),
        cookie_enabled: Some(true),
        do_not_track: Some("1".into()),
        time_zone: Some("Europe/Amsterdam".into()),
        local_time: Some("10/18/2026, 12:00:00 PM".into()),
        uptime_ms: Some(4_321.0),
        plugins: vec![("PDF Viewer".into(), None)],
        mime_types: vec!["application/pdf".into()],
        touch_support: false,
        webgl_vendor: Probe::Available("Mesa".into()),
        connection: Probe::Available(ConnectionInfo {
            effective_type: Some("4g".into()),
            downlink_mbps: Some(10.0),
        }),
    }
}

/// Timing marks of a page that finished loading.
pub struct FakeTiming(pub NavigationTiming);

impl TimingSource for FakeTiming {
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        Some(self.0.clone())
    }
}

pub fn loaded_timing() -> NavigationTiming {
    NavigationTiming {
        navigation_start: 1_000.0,
        domain_lookup_start: 1_005.0,
        domain_lookup_end: 1_017.0,
        connect_start: 1_017.0,
        connect_end: 1_048.0,
        request_start: 1_050.0,
        response_end: 1_190.0,
        load_event_end: 1_842.0,
    }
}

pub struct FakeBattery(pub Probe<Result<BatteryStatus>>);

#[async_trait(?Send)]
impl BatterySource for FakeBattery {
    async fn battery(&self) -> Probe<Result<BatteryStatus>> {
        self.0.clone()
    }
}

pub fn sample_battery() -> BatteryStatus {
    BatteryStatus {
        level: 0.876,
        charging: true,
        charging_time: 1_200.0,
        discharging_time: f64::INFINITY,
    }
}

/// Peer handle that counts `close()` calls.
#[derive(Clone, Default)]
pub struct CountingPeer {
    pub closes: Rc<Cell<u32>>,
}

impl PeerHandle for CountingPeer {
    fn close(&self) {
        self.closes.set(self.closes.get() + 1);
    }
}

/// Gatherer that replays scripted events.
///
/// With `keep_open` the sender stays alive after the script, so the
/// session only ends through the timeout.
pub struct ScriptedGatherer {
    pub events: Vec<CandidateEvent>,
    pub keep_open: bool,
    pub peer: CountingPeer,
    pub unsupported: bool,
    held: RefCell<Vec<mpsc::UnboundedSender<CandidateEvent>>>,
}

impl ScriptedGatherer {
    pub fn new(events: Vec<CandidateEvent>) -> Self {
        Self {
            events,
            keep_open: false,
            peer: CountingPeer::default(),
            unsupported: false,
            held: RefCell::new(Vec::new()),
        }
    }

    pub fn stalled(events: Vec<CandidateEvent>) -> Self {
        Self {
            keep_open: true,
            ..Self::new(events)
        }
    }

    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::new(Vec::new())
        }
    }
}

impl CandidateGatherer for ScriptedGatherer {
    fn open(&self) -> Result<GatheringSession> {
        if self.unsupported {
            return Err(FingerprintError::Unsupported("RTCPeerConnection".into()));
        }
        let (tx, rx) = mpsc::unbounded();
        for event in &self.events {
            let _ = tx.unbounded_send(event.clone());
        }
        if self.keep_open {
            self.held.borrow_mut().push(tx);
        }
        Ok(GatheringSession::new(rx, Box::new(self.peer.clone())))
    }
}

/// Timer that either fires at once or never.
pub struct FakeSleeper {
    pub fires: bool,
}

impl Sleeper for FakeSleeper {
    fn sleep(&self, _millis: u32) -> LocalBoxFuture<'static, ()> {
        if self.fires {
            future::ready(()).boxed_local()
        } else {
            future::pending().boxed_local()
        }
    }
}

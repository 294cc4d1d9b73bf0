//! Performance snapshot reader: durations derived from navigation timing.

use super::IntoFields;
use crate::snapshot::{FieldKey, FieldValue};

/// The `performance.timing` marks this reader uses, in epoch milliseconds.
/// A mark is `0` until the browser records it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_end: f64,
    pub load_event_end: f64,
}

pub trait TimingSource {
    /// `None` when the browser exposes no navigation timing at all.
    fn navigation_timing(&self) -> Option<NavigationTiming>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceInfo {
    pub page_load_time: FieldValue,
    pub dns_lookup: FieldValue,
    pub tcp_connect: FieldValue,
    pub request_time: FieldValue,
}

impl IntoFields for PerformanceInfo {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)> {
        vec![
            (FieldKey::PageLoadTime, self.page_load_time),
            (FieldKey::DnsLookup, self.dns_lookup),
            (FieldKey::TcpConnect, self.tcp_connect),
            (FieldKey::RequestTime, self.request_time),
        ]
    }
}

/// `end - start` as `"<n>ms"`, or the sentinel while `end` is unset.
fn duration(start: f64, end: f64) -> FieldValue {
    if end > 0.0 && end.is_finite() && start.is_finite() {
        FieldValue::Text(format!("{}ms", (end - start).round()))
    } else {
        FieldValue::NotAvailable
    }
}

pub struct PerformanceReader {
    source: Box<dyn TimingSource>,
}

impl PerformanceReader {
    pub fn new(source: Box<dyn TimingSource>) -> Self {
        Self { source }
    }

    pub fn read(&self) -> PerformanceInfo {
        let timing = self.source.navigation_timing().unwrap_or_default();
        Self::from_timing(&timing)
    }

    pub fn from_timing(t: &NavigationTiming) -> PerformanceInfo {
        PerformanceInfo {
            page_load_time: duration(t.navigation_start, t.load_event_end),
            dns_lookup: duration(t.domain_lookup_start, t.domain_lookup_end),
            tcp_connect: duration(t.connect_start, t.connect_end),
            request_time: duration(t.request_start, t.response_end),
        }
    }
}

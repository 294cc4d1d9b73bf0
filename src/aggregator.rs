//! Snapshot builder
//!
//! Runs the sources in a fixed order and merges each result as soon as it
//! resolves:
//!
//! ```text
//! Geo → Environment → Performance → Power (optional) → Local network
//! ```
//!
//! Sources absorb their own failures, so a build always produces a full
//! snapshot. The only error is `BuildInFlight`: overlapping builds are
//! rejected rather than interleaved.

use crate::error::{FingerprintError, Result};
use crate::snapshot::FingerprintSnapshot;
use crate::sources::{
    EnvironmentReader, GeoResolver, IntoFields, LocalNetworkProber, PerformanceReader, PowerReader,
};
use std::cell::Cell;
use std::rc::Rc;

/// Single-flight guard. At most one `BuildTicket` exists at a time.
#[derive(Debug, Clone, Default)]
pub struct BuildGuard {
    in_flight: Rc<Cell<bool>>,
}

impl BuildGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<BuildTicket> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(BuildTicket {
            in_flight: self.in_flight.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }
}

/// Releases the guard when dropped, including when a build is cancelled.
#[derive(Debug)]
pub struct BuildTicket {
    in_flight: Rc<Cell<bool>>,
}

impl Drop for BuildTicket {
    fn drop(&mut self) {
        self.in_flight.set(false);
    }
}

pub struct SnapshotBuilder {
    geo: GeoResolver,
    environment: EnvironmentReader,
    performance: PerformanceReader,
    power: PowerReader,
    local_network: LocalNetworkProber,
    guard: BuildGuard,
}

impl SnapshotBuilder {
    pub fn new(
        geo: GeoResolver,
        environment: EnvironmentReader,
        performance: PerformanceReader,
        power: PowerReader,
        local_network: LocalNetworkProber,
    ) -> Self {
        Self {
            geo,
            environment,
            performance,
            power,
            local_network,
            guard: BuildGuard::new(),
        }
    }

    pub fn is_building(&self) -> bool {
        self.guard.is_busy()
    }

    pub async fn build(&self) -> Result<FingerprintSnapshot> {
        let _ticket = self.guard.try_acquire().ok_or(FingerprintError::BuildInFlight)?;
        let mut snapshot = FingerprintSnapshot::new();

        log::info!("Collecting fingerprint snapshot");

        snapshot.merge(self.geo.resolve().await.into_fields());
        snapshot.merge(self.environment.read().into_fields());
        snapshot.merge(self.performance.read().into_fields());

        match self.power.read().await {
            Some(power) => snapshot.merge(power.into_fields()),
            None => log::debug!("Power fields omitted"),
        }

        snapshot.merge(self.local_network.probe().await.into_fields());

        let missing = snapshot.missing_required();
        if !missing.is_empty() {
            // Would be a source bug; the sources never omit keys
            log::error!("Snapshot is missing required fields: {:?}", missing);
        }

        log::info!("Snapshot complete with {} fields", snapshot.len());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Probe;
    use crate::snapshot::{FieldKey, FieldValue};
    use crate::sources::CandidateEvent;
    use crate::test_support::*;
    use futures::executor::block_on;
    use futures::future::{self, Either};
    use futures::pin_mut;
    use serde_json::json;

    const IP_URL: &str = "https://ip.test/";
    const GEO_TEMPLATE: &str = "https://geo.test/{ip}/json/";

    fn builder(http: FakeHttp, battery: Probe<crate::error::Result<crate::sources::BatteryStatus>>) -> SnapshotBuilder {
        builder_with(http, battery, FakeSleeper { fires: false })
    }

    fn builder_with(
        http: FakeHttp,
        battery: Probe<crate::error::Result<crate::sources::BatteryStatus>>,
        sleeper: FakeSleeper,
    ) -> SnapshotBuilder {
        SnapshotBuilder::new(
            GeoResolver::new(Rc::new(http), IP_URL.into(), GEO_TEMPLATE.into()),
            EnvironmentReader::new(Box::new(FakeEnvironment(sample_environment()))),
            PerformanceReader::new(Box::new(FakeTiming(loaded_timing()))),
            PowerReader::new(Box::new(FakeBattery(battery))),
            LocalNetworkProber::new(
                Box::new(ScriptedGatherer::new(vec![
                    CandidateEvent::Candidate("candidate:1 1 udp 1 192.168.0.10 4000 typ host".into()),
                    CandidateEvent::GatheringComplete,
                ])),
                Box::new(sleeper),
                2000,
            ),
        )
    }

    fn healthy_http() -> FakeHttp {
        FakeHttp::new()
            .with_get(IP_URL, json!({ "ip": "203.0.113.5" }))
            .with_get(
                "https://geo.test/203.0.113.5/json/",
                json!({ "city": "Amsterdam", "country_name": "Netherlands" }),
            )
    }

    #[test]
    fn test_full_snapshot_in_canonical_order() {
        let builder = builder(healthy_http(), Probe::Available(Ok(sample_battery())));
        let snapshot = block_on(builder.build()).unwrap();

        let keys: Vec<_> = snapshot.keys().collect();
        assert_eq!(keys, FieldKey::ALL.to_vec());
        assert_eq!(snapshot.get(FieldKey::City), Some(&FieldValue::text("Amsterdam")));
        assert_eq!(
            snapshot.get(FieldKey::LocalIps),
            Some(&FieldValue::text("192.168.0.10"))
        );
    }

    #[test]
    fn test_missing_battery_omits_exactly_power_keys() {
        let builder = builder(healthy_http(), Probe::Unsupported);
        let snapshot = block_on(builder.build()).unwrap();

        let expected: Vec<_> = FieldKey::ALL.iter().copied().filter(|k| !k.is_power()).collect();
        let keys: Vec<_> = snapshot.keys().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_geo_failure_does_not_abort_sequence() {
        let http = FakeHttp::new().with_get_error(IP_URL);
        let builder = builder(http, Probe::Available(Ok(sample_battery())));
        let snapshot = block_on(builder.build()).unwrap();

        assert_eq!(snapshot.len(), 41);
        for key in FieldKey::GEO {
            assert_eq!(snapshot.get(key), Some(&FieldValue::NotAvailable));
        }
        assert_eq!(snapshot.get(FieldKey::PageLoadTime), Some(&FieldValue::text("842ms")));
        assert_eq!(snapshot.get(FieldKey::BatteryLevel), Some(&FieldValue::text("88%")));
    }

    #[test]
    fn test_overlapping_build_is_rejected() {
        // The prober never finishes: no terminal event and a timer that never fires
        let builder = SnapshotBuilder::new(
            GeoResolver::new(Rc::new(healthy_http()), IP_URL.into(), GEO_TEMPLATE.into()),
            EnvironmentReader::new(Box::new(FakeEnvironment(sample_environment()))),
            PerformanceReader::new(Box::new(FakeTiming(loaded_timing()))),
            PowerReader::new(Box::new(FakeBattery(Probe::Unsupported))),
            LocalNetworkProber::new(
                Box::new(ScriptedGatherer::stalled(Vec::new())),
                Box::new(FakeSleeper { fires: false }),
                2000,
            ),
        );

        let first = builder.build();
        pin_mut!(first);
        let second = block_on(async {
            // Drive the first build to its stalled probe, then start another
            match future::select(first.as_mut(), future::ready(())).await {
                Either::Left(_) => panic!("first build should still be in flight"),
                Either::Right(_) => builder.build().await,
            }
        });

        assert!(matches!(second, Err(FingerprintError::BuildInFlight)));
        assert!(builder.is_building());
    }

    #[test]
    fn test_guard_released_after_build() {
        let builder = builder(healthy_http(), Probe::Unsupported);
        block_on(builder.build()).unwrap();
        assert!(!builder.is_building());
        assert!(block_on(builder.build()).is_ok());
    }
}

//! Fingerprint sources
//!
//! Each source owns its failure policy and returns a value that is always
//! safe to merge: sentinels for degraded fields, or nothing at all for the
//! power source when the battery API is absent. None of them return an
//! error to the aggregator.

pub mod environment;
pub mod geo;
pub mod local_network;
pub mod performance;
pub mod power;

pub use environment::{EnvironmentInfo, EnvironmentReader, EnvironmentSource, RawEnvironment};
pub use geo::{GeoInfo, GeoResolver};
pub use local_network::{
    CandidateEvent, CandidateGatherer, GatheringSession, LocalIpSet, LocalNetworkProber,
    PeerHandle,
};
pub use performance::{NavigationTiming, PerformanceInfo, PerformanceReader, TimingSource};
pub use power::{BatterySource, BatteryStatus, PowerInfo, PowerReader};

use crate::snapshot::{FieldKey, FieldValue};

/// A source result that can be flattened into snapshot fields.
pub trait IntoFields {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)>;
}

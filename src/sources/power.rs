//! Power state reader.
//!
//! The one source allowed to omit its keys: with no battery API, or when
//! `getBattery()` rejects, the snapshot gets no battery fields at all.

use super::IntoFields;
use crate::error::Result;
use crate::probe::Probe;
use crate::snapshot::{FieldKey, FieldValue};
use async_trait::async_trait;

/// Raw `BatteryManager` readings.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryStatus {
    /// 0.0 ..= 1.0
    pub level: f64,
    pub charging: bool,
    /// Seconds, `Infinity` when unknown
    pub charging_time: f64,
    /// Seconds, `Infinity` when unknown
    pub discharging_time: f64,
}

#[async_trait(?Send)]
pub trait BatterySource {
    /// `Unsupported` when the environment has no battery API.
    async fn battery(&self) -> Probe<Result<BatteryStatus>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerInfo {
    pub level: FieldValue,
    pub charging: FieldValue,
    pub charge_time: FieldValue,
    pub discharge_time: FieldValue,
}

impl From<BatteryStatus> for PowerInfo {
    fn from(status: BatteryStatus) -> Self {
        let level = if status.level.is_finite() {
            FieldValue::Text(format!("{}%", (status.level * 100.0).round()))
        } else {
            FieldValue::NotAvailable
        };
        Self {
            level,
            charging: FieldValue::yes_no(status.charging),
            charge_time: FieldValue::number_or_na(Some(status.charging_time)),
            discharge_time: FieldValue::number_or_na(Some(status.discharging_time)),
        }
    }
}

impl IntoFields for PowerInfo {
    fn into_fields(self) -> Vec<(FieldKey, FieldValue)> {
        vec![
            (FieldKey::BatteryLevel, self.level),
            (FieldKey::BatteryCharging, self.charging),
            (FieldKey::BatteryChargeTime, self.charge_time),
            (FieldKey::BatteryDischargeTime, self.discharge_time),
        ]
    }
}

pub struct PowerReader {
    source: Box<dyn BatterySource>,
}

impl PowerReader {
    pub fn new(source: Box<dyn BatterySource>) -> Self {
        Self { source }
    }

    pub async fn read(&self) -> Option<PowerInfo> {
        match self.source.battery().await {
            Probe::Available(Ok(status)) => Some(status.into()),
            Probe::Available(Err(e)) => {
                log::warn!("Battery read failed: {}", e);
                None
            }
            Probe::Unsupported => {
                log::debug!("Battery API not exposed, skipping power fields");
                None
            }
        }
    }
}

//! Capability-gated values.
//!
//! Browser features such as the battery API, WebGL debug info or
//! `navigator.connection` are detected once, at the source, and reported
//! as a `Probe`. Consumers never repeat the feature check.

use crate::snapshot::FieldValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    Available(T),
    Unsupported,
}

impl<T> Probe<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Probe::Available(v),
            None => Probe::Unsupported,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Probe::Available(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Probe<U> {
        match self {
            Probe::Available(v) => Probe::Available(f(v)),
            Probe::Unsupported => Probe::Unsupported,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Probe::Available(v) => Some(v),
            Probe::Unsupported => None,
        }
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Probe::Unsupported
    }
}

impl<T> From<Option<T>> for Probe<T> {
    fn from(value: Option<T>) -> Self {
        Probe::from_option(value)
    }
}

impl Probe<String> {
    /// Sentinel when unsupported or empty.
    pub fn into_field(self) -> FieldValue {
        FieldValue::text_or_na(self.into_option())
    }
}

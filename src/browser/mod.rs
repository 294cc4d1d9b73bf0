//! Browser-side implementations of the pipeline's source traits, plus
//! the DOM pieces of the page.

pub mod dom;
pub mod environment;
pub mod globals;
pub mod matrix;

pub use dom::{DomOutput, LocaleToggle};
pub use environment::{BrowserBattery, BrowserEnvironment, BrowserTiming};
pub use matrix::MatrixRain;

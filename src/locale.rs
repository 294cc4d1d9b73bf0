//! UI locale and the immutable presentation context passed to each render.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-language UI. Locale only affects rendering, never collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub fn toggle(self) -> Self {
        match self {
            Locale::Ru => Locale::En,
            Locale::En => Locale::Ru,
        }
    }

    /// Locale tag, also the suffix of the `data-*` text attributes.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Flag shown on the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Locale::Ru => "🇷🇺",
            Locale::En => "🇬🇧",
        }
    }

    /// Language name shown on the toggle button.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::Ru => "Русский",
            Locale::En => "English",
        }
    }

    /// First line of the relay message.
    pub fn relay_header(self, site_name: &str) -> String {
        match self {
            Locale::Ru => format!("🔔 Новый посетитель {}:", site_name),
            Locale::En => format!("🔔 New {} Visitor:", site_name),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Everything the presenter needs besides the snapshot itself.
///
/// Captured by value at render time, so a locale toggle during a build
/// cannot change labels halfway through a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationContext {
    pub locale: Locale,
    pub site_name: String,
}

impl PresentationContext {
    pub fn new(locale: Locale, site_name: impl Into<String>) -> Self {
        Self {
            locale,
            site_name: site_name.into(),
        }
    }
}

//! Presenter: turns a finished snapshot into display rows and the relay
//! message text.
//!
//! The locale comes in through `PresentationContext` on every call.

use crate::error::Result;
use crate::locale::PresentationContext;
use crate::snapshot::FingerprintSnapshot;

/// One display row: glyph, localized label, value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub glyph: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Where rendered rows go. Each call replaces the previous content.
pub trait RenderTarget {
    fn replace(&self, rows: &[RenderedField]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Presenter;

impl Presenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, snapshot: &FingerprintSnapshot, ctx: &PresentationContext) -> Vec<RenderedField> {
        snapshot
            .iter()
            .map(|(key, value)| {
                let descriptor = key.descriptor();
                RenderedField {
                    glyph: descriptor.glyph,
                    label: descriptor.label(ctx.locale),
                    value: value.to_string(),
                }
            })
            .collect()
    }

    /// Render and push the rows to `target`.
    pub fn present(
        &self,
        snapshot: &FingerprintSnapshot,
        ctx: &PresentationContext,
        target: &dyn RenderTarget,
    ) -> Result<()> {
        target.replace(&self.render(snapshot, ctx))
    }

    /// Header, blank line, then `glyph *label*: value` per field.
    pub fn relay_message(&self, snapshot: &FingerprintSnapshot, ctx: &PresentationContext) -> String {
        let mut message = ctx.locale.relay_header(&ctx.site_name);
        message.push_str("\n\n");
        for row in self.render(snapshot, ctx) {
            message.push_str(&format!("{} *{}*: {}\n", row.glyph, row.label, row.value));
        }
        message
    }
}

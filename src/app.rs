//! Application wiring: one full run per trigger.
//!
//! A run builds a snapshot, presents it in the current locale and hands
//! the relay message to the relay adapter exactly once. Page-ready and
//! locale toggles are the only triggers.

use crate::aggregator::SnapshotBuilder;
use crate::error::Result;
use crate::locale::{Locale, PresentationContext};
use crate::presenter::{Presenter, RenderTarget};
use crate::relay::{Delivery, RelayAdapter};
use crate::snapshot::FingerprintSnapshot;
use std::cell::Cell;

/// What one run produced.
pub struct RunReport {
    pub snapshot: FingerprintSnapshot,
    pub context: PresentationContext,
    pub message: String,
    /// Pending delivery; `None` when the relay is disabled
    pub delivery: Option<Delivery>,
}

pub struct FingerprintApp {
    builder: SnapshotBuilder,
    presenter: Presenter,
    relay: RelayAdapter,
    target: Box<dyn RenderTarget>,
    locale: Cell<Locale>,
    site_name: String,
}

impl FingerprintApp {
    pub fn new(
        builder: SnapshotBuilder,
        relay: RelayAdapter,
        target: Box<dyn RenderTarget>,
        locale: Locale,
        site_name: String,
    ) -> Self {
        Self {
            builder,
            presenter: Presenter::new(),
            relay,
            target,
            locale: Cell::new(locale),
            site_name,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    /// Context for a render happening now.
    pub fn context(&self) -> PresentationContext {
        PresentationContext::new(self.locale.get(), self.site_name.clone())
    }

    /// Collect, present and start the relay delivery.
    pub async fn run(&self) -> Result<RunReport> {
        let snapshot = self.builder.build().await?;

        // Locale is read after the build so a toggle during collection is honored
        let context = self.context();

        if let Err(e) = self.presenter.present(&snapshot, &context, self.target.as_ref()) {
            log::warn!("Rendering snapshot failed: {}", e);
        }

        let message = self.presenter.relay_message(&snapshot, &context);
        let delivery = self.relay.dispatch(message.clone());

        Ok(RunReport {
            snapshot,
            context,
            message,
            delivery,
        })
    }

    /// Flip the locale without running.
    pub fn flip_locale(&self) -> Locale {
        let next = self.locale.get().toggle();
        self.locale.set(next);
        log::info!("Locale switched to {}", next);
        next
    }

    /// Flip the locale and start exactly one new run.
    pub async fn toggle_locale(&self) -> Result<RunReport> {
        self.flip_locale();
        self.run().await
    }
}

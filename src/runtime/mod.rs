//! Browser event-loop runtime
//!
//! Timers and task spawning on top of the browser event loop. The pipeline
//! only ever sees the `Sleeper` trait, so tests can drive it on a native
//! executor with fake timers.

mod sleep;

pub use sleep::WasmSleep;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Source of timeouts for the pipeline.
pub trait Sleeper {
    /// Resolve once `millis` have elapsed.
    fn sleep(&self, millis: u32) -> LocalBoxFuture<'static, ()>;
}

/// Runtime backed by `setTimeout` and the microtask queue.
#[derive(Debug, Clone, Default)]
pub struct WasmRuntime;

impl WasmRuntime {
    pub fn new() -> Self {
        Self
    }

    /// Run a future to completion on the browser event loop.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(future);
    }
}

impl Sleeper for WasmRuntime {
    fn sleep(&self, millis: u32) -> LocalBoxFuture<'static, ()> {
        WasmSleep::new(millis).boxed_local()
    }
}

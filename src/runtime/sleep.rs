//! Sleep future using browser timers

use gloo_timers::future::TimeoutFuture;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that resolves after a specified number of milliseconds
pub struct WasmSleep {
    timeout: TimeoutFuture,
}

impl WasmSleep {
    pub fn new(millis: u32) -> Self {
        Self {
            timeout: TimeoutFuture::new(millis),
        }
    }
}

impl Future for WasmSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.timeout).poll(cx)
    }
}

//! Common test utilities for sink integration tests
//!
//! [`MemoryWriter`] is an in-memory `AsyncWrite` whose writes can be held
//! back, which lets tests park the consumer mid-write and observe the queue.

#![allow(dead_code)]

use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::Duration;
use tokio::io::AsyncWrite;

#[derive(Default)]
struct State {
    out: Vec<u8>,
    flushes: usize,
    blocked: bool,
    fail_flush: bool,
    write_delay: Option<Duration>,
    waker: Option<Waker>,
}

/// Shared in-memory writer; clones observe the same buffer
#[derive(Clone, Default)]
pub struct MemoryWriter {
    state: Arc<Mutex<State>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose writes stay pending until [`release`](Self::release)
    pub fn blocked() -> Self {
        let writer = Self::default();
        writer.state.lock().unwrap().blocked = true;
        writer
    }

    /// A writer that sleeps its thread for `delay` on every write
    pub fn slow(delay: Duration) -> Self {
        let writer = Self::default();
        writer.state.lock().unwrap().write_delay = Some(delay);
        writer
    }

    pub fn release(&self) {
        let waker = {
            let mut state = self.state.lock().unwrap();
            state.blocked = false;
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub fn fail_flushes(&self) {
        self.state.lock().unwrap().fail_flush = true;
    }

    /// Whether a write is parked on the gate
    pub fn is_waiting(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.blocked && state.waker.is_some()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().unwrap().out.clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8(self.contents()).unwrap()
    }

    pub fn flushes(&self) -> usize {
        self.state.lock().unwrap().flushes
    }
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let mut state = self.state.lock().unwrap();
        if state.blocked {
            state.waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
        if let Some(delay) = state.write_delay {
            std::thread::sleep(delay);
        }
        state.out.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        let mut state = self.state.lock().unwrap();
        state.flushes += 1;
        if state.fail_flush {
            return Poll::Ready(Err(std::io::Error::other("flush failed")));
        }
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Yield to the scheduler until `cond` holds
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..100_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

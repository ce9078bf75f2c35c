//! Cooperative cancellation and search deadlines.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared stop flag. Cloning yields a handle to the same flag.
///
/// The search polls it at every node; cancelling from another thread makes
/// the running search unwind and return its last completed depth.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Clock is consulted once every this many nodes.
const CLOCK_INTERVAL: u64 = 2048;

/// Per-search stopping rules: the caller's token, a soft limit that stops new
/// iterations, a hard limit and a node budget that abort the current one.
pub(crate) struct SearchControl<'a> {
    token: &'a CancellationToken,
    start: Instant,
    soft: Option<Duration>,
    hard: Option<Duration>,
    max_nodes: Option<u64>,
    tripped: bool,
}

impl<'a> SearchControl<'a> {
    pub(crate) fn new(
        token: &'a CancellationToken,
        soft: Option<Duration>,
        hard: Option<Duration>,
        max_nodes: Option<u64>,
    ) -> SearchControl<'a> {
        SearchControl { token, start: Instant::now(), soft, hard, max_nodes, tripped: false }
    }

    /// Whether the node being entered must abort. Once tripped it stays so.
    #[inline]
    pub(crate) fn should_stop(&mut self, nodes: u64) -> bool {
        if self.tripped {
            return true;
        }
        let out_of_time = nodes % CLOCK_INTERVAL == 0 && self.hard.is_some_and(|hard| self.elapsed() >= hard);
        let out_of_nodes = self.max_nodes.is_some_and(|max| nodes >= max);
        self.tripped = self.token.is_cancelled() || out_of_time || out_of_nodes;
        self.tripped
    }

    /// Whether iterative deepening should skip the next depth.
    pub(crate) fn should_stop_iterating(&self) -> bool {
        self.tripped || self.token.is_cancelled() || self.soft.is_some_and(|soft| self.elapsed() >= soft)
    }

    /// Whether a stop condition has already fired.
    #[inline]
    pub(crate) fn stopped(&self) -> bool {
        self.tripped
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

//! Time management: turn a game clock into search deadlines.

use std::time::Duration;

use vantage_core::Board;

use crate::eval::phase::{MAX_PHASE, game_phase};
use crate::search::SearchLimits;

/// Time left for the side to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub remaining: Duration,
    pub increment: Duration,
    /// Moves until the next time control, when the GUI knows it.
    pub moves_to_go: Option<u32>,
}

impl Clock {
    pub fn new(remaining: Duration, increment: Duration) -> Clock {
        Clock { remaining, increment, moves_to_go: None }
    }
}

/// Reserved per move for transport and bookkeeping.
const OVERHEAD_MS: f64 = 10.0;

/// Soft and hard limits for one move.
///
/// The soft limit stops iterative deepening from starting another depth; the
/// hard limit aborts the depth in progress. Without `moves_to_go` the number
/// of moves left is estimated from `phase` so that the opening is played
/// more economically than the endgame:
///
/// | Condition      | base | scale | opening | endgame |
/// |----------------|------|-------|---------|---------|
/// | With increment | 15   | 20    | 35      | 15      |
/// | No increment   | 18   | 22    | 40      | 18      |
///
/// With an increment the soft limit also gets three quarters of it, and the
/// hard limit may reach 25% of the clock (3x soft); without one it stays at
/// 12% (2.5x soft).
pub fn compute_limits(clock: &Clock, phase: i32) -> (Duration, Duration) {
    let remaining_ms = clock.remaining.as_millis() as f64;
    if remaining_ms < OVERHEAD_MS {
        let one_ms = Duration::from_millis(1);
        return (one_ms, one_ms);
    }

    let usable = (remaining_ms - OVERHEAD_MS).max(1.0);
    let inc_ms = clock.increment.as_millis() as f64;
    let has_increment = inc_ms > 0.0;

    let moves_left = match clock.moves_to_go {
        Some(n) => n.max(1) as f64,
        None => {
            let (base, scale) = if has_increment { (15, 20) } else { (18, 22) };
            (base + scale * phase.clamp(0, MAX_PHASE) / MAX_PHASE) as f64
        }
    };

    let base = usable / moves_left;
    let soft = if has_increment { base + inc_ms * 0.75 } else { base };
    let (cap_share, ratio_cap) = if has_increment { (0.25, 3.0) } else { (0.12, 2.5) };
    let hard = (usable * cap_share).min(soft * ratio_cap);

    let soft = soft.min(usable).max(1.0);
    let hard = hard.min(usable).max(soft);
    (Duration::from_millis(soft as u64), Duration::from_millis(hard as u64))
}

/// Deadlines for a search: a fixed move time wins, then the clock, else none.
pub(crate) fn budget(limits: &SearchLimits, board: &Board) -> (Option<Duration>, Option<Duration>) {
    if let Some(movetime) = limits.movetime {
        return (Some(movetime), Some(movetime));
    }
    match &limits.clock {
        Some(clock) => {
            let (soft, hard) = compute_limits(clock, game_phase(board));
            (Some(soft), Some(hard))
        }
        None => (None, None),
    }
}

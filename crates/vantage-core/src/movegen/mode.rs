//! Compile-time selection of which moves a generator pass emits.

pub(crate) trait GenMode {
    /// Emit non-capturing, non-promoting moves (including castling).
    const QUIETS: bool;
}

/// Every legal move.
pub(crate) struct AllMoves;
impl GenMode for AllMoves {
    const QUIETS: bool = true;
}

/// Captures (en passant included) and promotions only.
pub(crate) struct Tactical;
impl GenMode for Tactical {
    const QUIETS: bool = false;
}

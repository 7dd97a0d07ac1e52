pub mod replay;
pub mod simulated;

use std::io;

// SAMPLER COMPONENT -----------------------------------------------------------

/// One fresh boolean per configured input line, on demand.
///
/// Index 0 is the scanner pulse, 1..=N the response buttons. The digital
/// lines are active-low at the hardware boundary; implementations invert
/// that, so `true` here always means "asserted". A failing read propagates
/// out of the current poll, there is no retry inside the engine.
pub trait LineSampler: Send {
    /// Total line count, 1 (pulse) + number of buttons.
    fn lines(&self) -> usize;

    /// Read every line once. The returned vector has exactly `lines()`
    /// entries, in line order.
    fn sample(&mut self) -> io::Result<Vec<bool>>;
}

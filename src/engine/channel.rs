// CHANNEL STATE COMPONENT -----------------------------------------------------

/// Per-line debounce bookkeeping. Index 0 is the scanner pulse line,
/// 1..=N are the response buttons.
pub struct ChannelState {
    /// Last accepted (post-debounce) value.
    pub last_value: bool,
    /// Clock time at which `last_value` last became true, or was last
    /// refreshed while true. The readout window is measured from here, so
    /// a line that stays true keeps re-arming its own window.
    pub time_of_last_acceptance: f64,
    /// Minimum elapsed seconds since `time_of_last_acceptance` before a new
    /// raw sample for this line is accepted.
    pub readout_window: f64,
}

impl ChannelState {
    pub fn new() -> Self {
        Self {
            last_value: false,
            time_of_last_acceptance: 0.0,
            readout_window: 0.0,
        }
    }

    /// Whether a candidate value at clock time `t` may replace `last_value`.
    pub fn window_open(&self, t: f64) -> bool {
        t - self.time_of_last_acceptance > self.readout_window
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_gates_until_it_elapses() {
        let mut ch = ChannelState::new();
        ch.readout_window = 0.5;
        ch.time_of_last_acceptance = 1.0;
        assert!(!ch.window_open(1.2));
        assert!(!ch.window_open(1.5));
        assert!(ch.window_open(1.6));
    }

    #[test]
    fn zero_window_opens_immediately() {
        let mut ch = ChannelState::new();
        ch.time_of_last_acceptance = 1.0;
        assert!(ch.window_open(1.0 + f64::EPSILON * 4.0));
    }
}

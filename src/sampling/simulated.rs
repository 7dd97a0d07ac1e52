use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::time::Instant;

use super::LineSampler;

// -----------------------------------------------------------------------------
// SIMULATED SCANNER + BUTTON BOX
// -----------------------------------------------------------------------------

const PULSE_WIDTH_SECS: f64 = 0.015;
const BOUNCE_WINDOW_SECS: f64 = 0.004;
const BOUNCE_CHANCE_PERCENT: u32 = 40;
const PRESS_HOLD_SECS: f64 = 0.120;

/// Software stand-in for the acquisition hardware: a periodic pulse line
/// with contact bounce around its edges, and buttons that go down at random
/// and stay held for a while.
pub struct SimulatedSampler {
    started: Instant,
    tr_secs: f64,
    press_chance_percent: u32,
    button_release_at: Vec<f64>,
    rng: StdRng,
}

impl SimulatedSampler {
    /// `tr_secs` is the simulated scanner repetition time; 0 disables the
    /// pulse line entirely. `press_chance_percent` is the per-poll chance
    /// that an idle button goes down.
    pub fn new(buttons: usize, tr_secs: f64, press_chance_percent: u32) -> Self {
        Self {
            started: Instant::now(),
            tr_secs,
            press_chance_percent,
            button_release_at: vec![0.0; buttons],
            rng: StdRng::from_entropy(),
        }
    }

    fn pulse_level(&mut self, now: f64) -> bool {
        if self.tr_secs <= 0.0 {
            return false;
        }
        let phase = now % self.tr_secs;
        if phase < PULSE_WIDTH_SECS {
            return true;
        }
        // Chatter just after the falling edge.
        if phase < PULSE_WIDTH_SECS + BOUNCE_WINDOW_SECS {
            return self.rng.gen_range(0..100) < BOUNCE_CHANCE_PERCENT;
        }
        false
    }

    fn button_level(&mut self, idx: usize, now: f64) -> bool {
        if now < self.button_release_at[idx] {
            return true;
        }
        if self.rng.gen_range(0..100) < self.press_chance_percent {
            self.button_release_at[idx] = now + PRESS_HOLD_SECS;
            return true;
        }
        false
    }
}

impl LineSampler for SimulatedSampler {
    fn lines(&self) -> usize {
        1 + self.button_release_at.len()
    }

    fn sample(&mut self) -> io::Result<Vec<bool>> {
        let now = self.started.elapsed().as_secs_f64();
        let mut out = Vec::with_capacity(self.lines());
        out.push(self.pulse_level(now));
        for idx in 0..self.button_release_at.len() {
            out.push(self.button_level(idx, now));
        }
        Ok(out)
    }
}

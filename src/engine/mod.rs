pub mod channel;
pub mod clock;
pub mod event;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::sampling::LineSampler;
use crate::utils::log::{log_csv, log_to_file};
use channel::ChannelState;
use clock::Clock;
use event::{ButtonEvent, LastPressed};

// -----------------------------------------------------------------------------
// SYNCH ENGINE CORE
// -----------------------------------------------------------------------------

const EVENT_LOG: &str = "events.log";
const EVENT_CSV: &str = "events.csv";
const EVENT_CSV_HEADERS: [&str; 3] = ["elapsed_secs", "event", "detail"];

/// Conditions the raw scanner-pulse and button lines into a debounced,
/// timestamped event stream. One engine owns one sampler; all state is
/// single-threaded and mutated only through the polling calls below.
pub struct SynchEngine {
    sampler: Option<Box<dyn LineSampler>>,
    clock: Clock,
    channels: Vec<ChannelState>,
    pulse_count: u64,
    emulation_period: f64,
    group_readout: bool,
    timeout_window: f64,
    timeout_armed_at: Option<Instant>,
    last_pressed: LastPressed,
    poll_sleep: Option<Duration>,
    max_wait: Option<Duration>,
    logging: bool,
}

impl SynchEngine {
    pub fn new(config: &EngineConfig, sampler: Box<dyn LineSampler>) -> Self {
        Self::build(config, Some(sampler))
    }

    /// Builds the engine from a sampler factory that may fail. Acquisition
    /// failure is reported and leaves the engine constructed but invalid;
    /// every later poll then fails with `NotConnected`.
    pub fn acquire<F>(config: &EngineConfig, factory: F) -> Self
    where
        F: FnOnce() -> io::Result<Box<dyn LineSampler>>,
    {
        match factory() {
            Ok(sampler) => Self::build(config, Some(sampler)),
            Err(e) => {
                eprintln!("warning: line sampler unavailable: {}", e);
                Self::build(config, None)
            }
        }
    }

    fn build(config: &EngineConfig, sampler: Option<Box<dyn LineSampler>>) -> Self {
        let mut channels: Vec<ChannelState> = (0..=config.buttons).map(|_| ChannelState::new()).collect();
        channels[0].readout_window = sanitize_window(config.synch_readout_window_secs);
        for ch in &mut channels[1..] {
            ch.readout_window = sanitize_window(config.button_readout_window_secs);
        }
        let mut engine = Self {
            sampler,
            clock: Clock::new(),
            channels,
            pulse_count: 0,
            emulation_period: sanitize_window(config.emulation_period_secs),
            group_readout: config.button_group_readout,
            timeout_window: f64::INFINITY,
            timeout_armed_at: None,
            last_pressed: LastPressed::None,
            poll_sleep: config.poll_sleep_ms.map(Duration::from_millis),
            max_wait: config
                .max_wait_secs
                .filter(|s| s.is_finite() && *s > 0.0)
                .and_then(|s| Duration::try_from_secs_f64(s).ok()),
            logging: config.logging,
        };
        if let Some(secs) = config.button_group_timeout_secs {
            engine.set_button_group_timeout(secs);
        }
        engine
    }

    // ACCESSORS ---------------------------------------------------------------
    // Reading state never touches the hardware; only the polling calls sample.

    pub fn is_valid(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulse_count
    }

    pub fn last_pressed(&self) -> &LastPressed {
        &self.last_pressed
    }

    pub fn buttons(&self) -> usize {
        self.channels.len() - 1
    }

    pub fn emulation_period(&self) -> f64 {
        self.emulation_period
    }

    // CONFIGURATION -----------------------------------------------------------

    /// Zeroes the clock origin together with every channel timestamp; the
    /// two always move as one.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
        for ch in &mut self.channels {
            ch.time_of_last_acceptance = 0.0;
        }
    }

    /// `secs <= 0` (or non-finite) disables emulation.
    pub fn set_emulation_period(&mut self, secs: f64) {
        self.emulation_period = sanitize_window(secs);
    }

    pub fn reset_pulse_count(&mut self) {
        self.pulse_count = 0;
    }

    pub fn set_synch_readout_window(&mut self, secs: f64) {
        self.channels[0].readout_window = sanitize_window(secs);
    }

    /// Independent per-button debounce windows; turns group mode off.
    pub fn set_button_readout_window(&mut self, secs: f64) {
        self.group_readout = false;
        let window = sanitize_window(secs);
        for ch in &mut self.channels[1..] {
            ch.readout_window = window;
        }
    }

    /// One debounce window shared by the whole button box: any button
    /// activity re-arms the window for the group.
    pub fn set_button_group_readout_window(&mut self, secs: f64) {
        self.group_readout = true;
        let window = sanitize_window(secs);
        for ch in &mut self.channels[1..] {
            ch.readout_window = window;
        }
    }

    /// Arms the one-shot timeout fallback; its timer starts now. Only an
    /// actual firing disarms it. The timer runs on its own wall-clock
    /// anchor, so a later clock reset cannot stretch it.
    pub fn set_button_group_timeout(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.timeout_window = secs;
            self.timeout_armed_at = Some(Instant::now());
        } else {
            self.timeout_armed_at = None;
        }
    }

    // REFRESH / DEBOUNCE ------------------------------------------------------

    /// One conditioning cycle: sample every line once, then apply in order
    /// pulse emulation, group collapse, per-line gating, timestamp refresh.
    /// The order is load-bearing; collapsing after gating would change which
    /// lines see a fresh window.
    fn refresh(&mut self) -> io::Result<()> {
        let sampler = self.sampler.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "line sampler was never acquired")
        })?;
        let mut candidate = sampler.sample()?;
        if candidate.len() != self.channels.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "sampler returned {} lines, engine expects {}",
                    candidate.len(),
                    self.channels.len()
                ),
            ));
        }
        let t = self.clock.elapsed();

        // Pulse emulation: the first pulse fires immediately, later ones at
        // the configured period. A real pulse on the line still counts.
        if self.emulation_period > 0.0
            && (self.pulse_count == 0
                || t - self.channels[0].time_of_last_acceptance >= self.emulation_period)
        {
            candidate[0] = true;
        }

        if self.group_readout && self.channels.len() > 1 {
            let shared = self.channels[1..]
                .iter()
                .map(|ch| ch.time_of_last_acceptance)
                .fold(0.0_f64, f64::max);
            for ch in &mut self.channels[1..] {
                ch.time_of_last_acceptance = shared;
            }
        }

        for (ch, &value) in self.channels.iter_mut().zip(candidate.iter()) {
            if ch.window_open(t) {
                ch.last_value = value;
            }
        }

        // A line that keeps reading true keeps re-arming its own window.
        for ch in &mut self.channels {
            if ch.last_value {
                ch.time_of_last_acceptance = t;
            }
        }
        Ok(())
    }

    // SYNCH DETECTOR ----------------------------------------------------------

    /// One conditioning cycle, then one-shot consumption of the pulse line.
    pub fn pulse_detected(&mut self) -> io::Result<bool> {
        self.refresh()?;
        if self.channels[0].last_value {
            self.channels[0].last_value = false;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Busy-polls until the next pulse. The first confirmed pulse resets the
    /// clock, so elapsed time is zero-based from that moment. Increments the
    /// pulse counter by exactly one per return.
    ///
    /// With no emulation period and no hardware pulse this blocks forever
    /// unless `max_wait_secs` is configured, in which case it fails with
    /// `TimedOut`. The default spin has no sleep; `poll_sleep_ms` trades
    /// latency for CPU if set.
    pub fn wait_for_pulse(&mut self) -> io::Result<()> {
        let deadline = self.max_wait.map(|d| Instant::now() + d);
        loop {
            if self.pulse_detected()? {
                if self.pulse_count == 0 {
                    self.reset_clock();
                }
                self.pulse_count += 1;
                if self.logging {
                    self.log_event("pulse", &self.pulse_count.to_string());
                }
                return Ok(());
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "no pulse within the configured maximum wait",
                    ));
                }
            }
            if let Some(pause) = self.poll_sleep {
                thread::sleep(pause);
            }
        }
    }

    // BUTTON DETECTOR ---------------------------------------------------------

    /// One conditioning cycle, then edge consumption across the button lines.
    /// Returns `None` when nothing fired this poll.
    pub fn button_event(&mut self) -> io::Result<Option<ButtonEvent>> {
        self.refresh()?;

        let pressed: Vec<usize> = self
            .channels
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, ch)| ch.last_value)
            .map(|(idx, _)| idx)
            .collect();

        if !pressed.is_empty() {
            // The clear covers line 0 as well: a button press consumes any
            // pending pulse edge.
            for ch in &mut self.channels {
                ch.last_value = false;
            }
            self.last_pressed = LastPressed::Buttons(pressed.clone());
            if self.logging {
                self.log_event("press", &format_indices(&pressed));
            }
            return Ok(Some(ButtonEvent::Pressed(pressed)));
        }

        let timed_out = self
            .timeout_armed_at
            .map_or(false, |armed| armed.elapsed().as_secs_f64() >= self.timeout_window);
        if timed_out {
            // One-shot: firing disarms the timeout until re-armed.
            self.timeout_armed_at = None;
            for ch in &mut self.channels {
                ch.last_value = false;
            }
            self.last_pressed = LastPressed::Timeout;
            if self.logging {
                self.log_event("timeout", "");
            }
            return Ok(Some(ButtonEvent::Timeout));
        }

        Ok(None)
    }

    /// Busy-polls until a press or an armed timeout. When `targets` is given
    /// a press only satisfies the wait if its index set intersects it;
    /// non-matching presses are discarded and the poll continues.
    pub fn wait_for_button_press(
        &mut self,
        targets: Option<&[usize]>,
    ) -> io::Result<ButtonEvent> {
        let deadline = self.max_wait.map(|d| Instant::now() + d);
        loop {
            if let Some(event) = self.button_event()? {
                if event.matches(targets) {
                    return Ok(event);
                }
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "no matching press within the configured maximum wait",
                    ));
                }
            }
            if let Some(pause) = self.poll_sleep {
                thread::sleep(pause);
            }
        }
    }

    fn log_event(&self, event: &str, detail: &str) {
        let elapsed = format!("{:.4}", self.clock.elapsed());
        let message = format!("elapsed: {}s, event: {}, detail: {}", elapsed, event, detail);
        log_to_file(EVENT_LOG, &message).expect("Failed to write to event log");
        log_csv(EVENT_CSV, &EVENT_CSV_HEADERS, &[&elapsed, event, detail])
            .expect("Failed to write to event csv");
    }
}

/// Windows are accepted as given when finite and positive; anything else
/// collapses to zero (gate always open).
fn sanitize_window(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

// -----------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------

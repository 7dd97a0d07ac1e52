use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Number of response-button lines; line 0 is always the scanner pulse.
    pub buttons: usize,
    /// Software pulse period in seconds, 0 disables emulation.
    pub emulation_period_secs: f64,
    pub synch_readout_window_secs: f64,
    pub button_readout_window_secs: f64,
    /// Shared debounce window across the button box instead of per-line.
    pub button_group_readout: bool,
    /// Arm the one-shot timeout fallback at construction.
    pub button_group_timeout_secs: Option<f64>,
    /// Bounded sleep between spin polls; unset keeps the zero-latency spin.
    pub poll_sleep_ms: Option<u64>,
    /// Maximum wait for the blocking calls; unset blocks indefinitely.
    pub max_wait_secs: Option<f64>,
    pub logging: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Simulated scanner repetition time in seconds.
    pub tr_secs: f64,
    /// Per-poll chance (percent) that an idle simulated button goes down.
    pub press_chance_percent: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buttons: 4,
            emulation_period_secs: 0.0,
            synch_readout_window_secs: 0.005,
            button_readout_window_secs: 0.050,
            button_group_readout: false,
            button_group_timeout_secs: None,
            poll_sleep_ms: None,
            max_wait_secs: None,
            logging: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tr_secs: 2.0,
            press_chance_percent: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, String> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_yaml::from_str(&config_str)
        .map_err(|e| format!("Failed to parse config file: {}", e))
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), String> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(path, yaml)
        .map_err(|e| format!("Failed to write config file: {}", e))
}

use colored::Colorize;
use std::io;

use crate::config::Config;
use crate::engine::event::ButtonEvent;
use crate::engine::SynchEngine;

// -----------------------------------------------------------------------------
// LIVE CONSOLE MONITOR
// -----------------------------------------------------------------------------

/// Runs the engine as a trial loop and prints the conditioned event stream:
/// wait for the next scanner pulse, then collect one response (or the
/// timeout fallback) before the next trial. Runs until the engine errors or
/// the process is killed.
pub fn run(mut engine: SynchEngine, config: &Config) -> io::Result<()> {
    println!(
        "{} {} button line(s), emulation period {:.3}s",
        "scanner-synch monitor".bold(),
        engine.buttons(),
        engine.emulation_period()
    );
    if !engine.is_valid() {
        eprintln!("{}", "engine is invalid, no sampler acquired".red());
    }

    let response_timeout = config
        .engine
        .button_group_timeout_secs
        .unwrap_or(config.simulation.tr_secs);

    loop {
        engine.wait_for_pulse()?;
        println!(
            "{} #{:<4} at {:8.3}s",
            "PULSE".red().bold(),
            engine.pulse_count(),
            engine.elapsed()
        );

        engine.set_button_group_timeout(response_timeout);
        match engine.wait_for_button_press(None)? {
            ButtonEvent::Pressed(indices) => {
                let labels: Vec<String> = indices.iter().map(|i| format!("B{}", i)).collect();
                println!(
                    "{} {:<8} at {:8.3}s",
                    "PRESS".green().bold(),
                    labels.join("+"),
                    engine.elapsed()
                );
            }
            ButtonEvent::Timeout => {
                println!(
                    "{} {:<8} at {:8.3}s",
                    "MISS ".yellow().bold(),
                    "-",
                    engine.elapsed()
                );
            }
        }
    }
}

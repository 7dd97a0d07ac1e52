use scanner_synch::config::{load_config, Config};
use scanner_synch::local::monitor;
use scanner_synch::sampling::replay::ReplaySampler;
use scanner_synch::sampling::simulated::SimulatedSampler;
use scanner_synch::SynchEngine;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match std::env::var("SCANNER_SYNCH_CONFIG") {
        Ok(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        Err(_) => Config::default(),
    };

    if args.len() > 1 {
        match args[1].as_str() {
            "monitor" => {
                let sampler = SimulatedSampler::new(
                    config.engine.buttons,
                    config.simulation.tr_secs,
                    config.simulation.press_chance_percent,
                );
                let engine = SynchEngine::new(&config.engine, Box::new(sampler));
                monitor::run(engine, &config).unwrap();
            }
            "replay" if args.len() > 2 => {
                let engine = SynchEngine::acquire(&config.engine, || {
                    ReplaySampler::from_csv(&args[2])
                        .map(|s| Box::new(s) as Box<dyn scanner_synch::LineSampler>)
                });
                monitor::run(engine, &config).unwrap();
            }
            _ => println!("Invalid argument, please use 'monitor' or 'replay <file.csv>'"),
        }
    } else {
        println!("Please specify 'monitor' or 'replay <file.csv>' as argument");
    }
}

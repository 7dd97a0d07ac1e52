pub mod config;
pub mod engine;
pub mod local;
pub mod sampling;
pub mod utils;

pub use engine::event::{ButtonEvent, LastPressed};
pub use engine::SynchEngine;
pub use sampling::LineSampler;

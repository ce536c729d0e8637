//! Voice-controlled side-scrolling platformer simulation served over WebSockets.

pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::errors::SimError;
pub use domain::tuning::GameTuning;
pub use frameworks::server::{run, run_with_config};
pub use use_cases::Session;

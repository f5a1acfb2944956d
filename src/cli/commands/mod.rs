//! CLI command implementations.

mod config;
mod doctor;
mod roadmap;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use roadmap::run_roadmap;
pub use serve::run_serve;

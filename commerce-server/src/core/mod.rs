//! Core configuration and shared server state

mod config;

pub use config::Config;

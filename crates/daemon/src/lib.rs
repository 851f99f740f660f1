// Re-export modules for library use
pub mod actuator;
pub mod config;
pub mod recorder;
pub mod session;

//! Jolly Good Emulation - a small front-end for external emulators
//!
//! The core (always available) reads `config.ini`, resolves platforms, scans
//! game folders and launches emulators. The `desktop` feature adds the egui
//! window on top of it.

pub mod config;
pub mod error;
pub mod launcher;
pub mod platform;
pub mod scanner;
pub mod session;

#[cfg(feature = "desktop")]
pub mod ui;

pub use config::{ConfigError, ConfigStore};
pub use error::{Error, ErrorKind};
pub use launcher::{
    default_launcher, DirectLauncher, LaunchError, LaunchOutcome, LaunchOutput, LaunchRequest,
    ProcessLauncher, ShellLauncher,
};
pub use platform::{OptionKind, Platform, ResolveError};
pub use scanner::{Game, ScanError};
pub use session::{Selection, Session};

/// Default configuration file, looked up in the process working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

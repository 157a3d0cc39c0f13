//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "servotune", version, about = "Servo tuner CLI")]
pub struct Cli {
    /// Path to config TOML; defaults apply when the file does not exist
    #[arg(long, value_name = "FILE", default_value = "etc/servotune.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop
    Run {
        /// Use simulated peripherals even when built with hardware support
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Stop after this many ticks instead of running until Ctrl-C
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Override the configured tick rate
        #[arg(long, value_name = "HZ")]
        tick_hz: Option<u32>,
    },
    /// Quick health check (simulated stack boots and ticks)
    SelfCheck,
    /// Print the persisted calibration table
    ShowCal,
}

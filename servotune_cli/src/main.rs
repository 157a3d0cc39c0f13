mod cli;
mod run;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use servotune_config::{Config, Logging};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, FILE_GUARD};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let cfg = load_config(&cli.config)?;
    init_logging(&cli, &cfg.logging)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .wrap_err("installing Ctrl-C handler")?;
    }

    match cli.cmd {
        Commands::Run { sim, ticks, tick_hz } => run::run(&cfg, sim, ticks, tick_hz, shutdown),
        Commands::SelfCheck => run::self_check(&cfg),
        Commands::ShowCal => run::show_cal(&cfg),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let cfg = servotune_config::load_toml(&text)
        .wrap_err_with(|| format!("parsing {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging(cli: &Cli, logging: &Logging) -> Result<()> {
    let level = logging
        .level
        .clone()
        .unwrap_or_else(|| cli.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_writer = file_writer(logging);
    if cli.json {
        let builder = tracing_subscriber::fmt().with_env_filter(filter).json();
        match file_writer {
            Some(writer) => builder.with_writer(writer).init(),
            None => builder.init(),
        }
    } else {
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        match file_writer {
            Some(writer) => builder.with_writer(writer).init(),
            None => builder.init(),
        }
    }
    Ok(())
}

/// Set up the non-blocking rolling appender named in the config, if any.
fn file_writer(logging: &Logging) -> Option<tracing_appender::non_blocking::NonBlocking> {
    let file = logging.file.as_ref()?;
    let path = Path::new(file);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "servotune.log".into());
    let rotation = match logging.rotation.as_deref() {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    };
    let appender = RollingFileAppender::new(rotation, dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);
    Some(writer)
}

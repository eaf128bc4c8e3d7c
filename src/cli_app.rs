//! Top-level CLI definition and dispatch.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize as _;

use crate::backup;
use crate::core::config::Config;
use crate::core::errors::{CuaError, Result};
use crate::daemon::signals;
use crate::monitor::session::{CancelFlag, MonitorSession, StopReason};
use crate::monitor::sink::{AlertSink, ConsoleSink, JsonSink};
use crate::monitor::{SystemSampler, ThresholdPolicy};
use crate::password;

/// CPU Usage Alert — monitors CPU utilization and alerts on threshold breaches.
#[derive(Parser)]
#[command(name = "cua", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Monitor CPU usage in the foreground until interrupted.
    Monitor {
        /// Alert threshold percentage, in (0, 100].
        #[arg(long)]
        threshold: Option<f64>,
        /// Sampling interval in seconds.
        #[arg(long)]
        interval: Option<f64>,
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit alerts as JSON lines instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
    /// Copy the files of a directory into another, timestamping on name clash.
    Backup {
        /// Directory whose regular files are copied.
        source: PathBuf,
        /// Directory receiving the copies; created when missing.
        dest: PathBuf,
    },
    /// Check a password against the strength rules.
    CheckPassword {
        /// Password to check; read from stdin when omitted.
        password: Option<String>,
    },
    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Dispatch CLI commands.
///
/// # Errors
/// Returns an error when a subcommand cannot start (bad configuration,
/// unreadable source directory, failed signal registration). Runtime
/// outcomes map to the returned exit code instead.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Monitor {
            threshold,
            interval,
            config,
            json,
        } => run_monitor(*threshold, *interval, config.as_deref(), *json),
        Command::Backup { source, dest } => run_backup(source, dest),
        Command::CheckPassword { password } => run_check_password(password.as_deref()),
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "cua", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_monitor(
    threshold: Option<f64>,
    interval: Option<f64>,
    config_path: Option<&std::path::Path>,
    json: bool,
) -> Result<ExitCode> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(threshold) = threshold {
        config.monitor.threshold_pct = threshold;
    }
    if let Some(secs) = interval {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(CuaError::InvalidConfig {
                details: format!("interval must be positive, got {secs}"),
            });
        }
        config.monitor.interval_ms = (secs * 1000.0).round() as u64;
    }
    config.monitor.validate()?;

    let policy = ThresholdPolicy::new(config.monitor.threshold_pct)?;
    let interval = config.monitor.interval();

    let cancel = CancelFlag::new();
    signals::register_interrupt_handlers(&cancel)?;

    println!("Monitoring CPU usage... (Press Ctrl+C to stop)");

    let reason = if json {
        run_session(JsonSink, &policy, interval, &cancel)?
    } else {
        run_session(ConsoleSink, &policy, interval, &cancel)?
    };

    match reason {
        StopReason::Cancelled => {
            println!("\nMonitoring stopped by user.");
            Ok(ExitCode::SUCCESS)
        }
        StopReason::SensorFailure(err) => {
            eprintln!("{} {err}", "Error occurred during monitoring:".red());
            Ok(ExitCode::from(1))
        }
    }
}

fn run_session<K: AlertSink>(
    sink: K,
    policy: &ThresholdPolicy,
    interval: Duration,
    cancel: &CancelFlag,
) -> Result<StopReason> {
    let mut session = MonitorSession::new(SystemSampler::new(), sink);
    session.run(policy, interval, cancel)
}

fn run_backup(source: &std::path::Path, dest: &std::path::Path) -> Result<ExitCode> {
    println!(
        "Starting backup from '{}' to '{}'...",
        source.display(),
        dest.display()
    );

    let report = backup::backup_dir(source, dest)?;

    if report.created_dest {
        println!("Created destination directory '{}'.", dest.display());
    }
    for copied in &report.copied {
        if copied.renamed {
            println!(
                "File '{}' already exists, saving as '{}'.",
                copied.name,
                copied.dest.display()
            );
        } else {
            println!("Copied '{}' to '{}'.", copied.name, copied.dest.display());
        }
    }
    for (name, message) in &report.failures {
        eprintln!("{} '{name}': {message}", "Error copying".red());
    }

    println!("Backup completed.");
    if report.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn run_check_password(password: Option<&str>) -> Result<ExitCode> {
    let password = match password {
        Some(p) => p.to_string(),
        None => prompt_password()?,
    };

    let report = password::check_strength(&password);
    if report.is_strong {
        println!("{} Password is strong", "Success:".green());
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(first) = report.first_failure() {
        println!("{} {}", "Weak password:".red(), first.message());
    }
    println!("A strong password should:");
    println!("- Be at least {} characters long", password::MIN_LENGTH);
    println!("- Contain both uppercase and lowercase letters");
    println!("- Include at least one digit");
    println!("- Include at least one special character (e.g., !, @, #, $, %)");
    Ok(ExitCode::from(1))
}

fn prompt_password() -> Result<String> {
    print!("Enter a password to check: ");
    std::io::stdout()
        .flush()
        .map_err(|source| CuaError::io("stdout", source))?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|source| CuaError::io("stdin", source))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

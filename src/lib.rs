// src/lib.rs

pub mod baker;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;

use std::process::ExitStatus;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::baker::{BakerCommand, LogPaths, ShutdownOutcome};
use crate::cli::CliArgs;
use crate::config::{BakerConfig, default_config_path, load_and_validate};

enum SupervisorEvent {
    BakerExited(errors::Result<ExitStatus>),
    Interrupted(std::io::Result<()>),
}

/// High-level entry point used by `main.rs`.
///
/// Loads the config, launches the baker, then waits for either the baker
/// to exit on its own or Ctrl-C. On Ctrl-C the baker is stopped with
/// SIGTERM, escalating to SIGKILL after the configured grace period.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut baker = cfg.launcher().launch(cfg.params.clone())?;

    let event = tokio::select! {
        status = baker.wait() => SupervisorEvent::BakerExited(status),
        res = tokio::signal::ctrl_c() => SupervisorEvent::Interrupted(res),
    };

    match event {
        SupervisorEvent::BakerExited(status) => {
            let status = status.context("waiting for baker")?;
            if !status.success() {
                anyhow::bail!("baker exited unexpectedly: {status}");
            }
            info!(pid = baker.pid(), "baker exited on its own");
        }
        SupervisorEvent::Interrupted(res) => {
            res.context("listening for Ctrl+C")?;
            info!(pid = baker.pid(), "Ctrl+C received; stopping baker");
            match baker.terminate_or_kill().await? {
                ShutdownOutcome::Exited(status) => {
                    info!(%status, "baker stopped");
                }
                ShutdownOutcome::Killed(delivery) => {
                    warn!(?delivery, "baker was killed");
                    let status = baker.wait().await?;
                    info!(%status, "killed baker reaped");
                }
            }
        }
    }

    Ok(())
}

/// Print what would be launched, without launching it.
fn print_dry_run(cfg: &BakerConfig) {
    let command = BakerCommand::build(&cfg.params);
    println!("baker-supervisor dry-run");
    println!("  endpoint: {}", cfg.params.endpoint());
    println!("  term_timeout: {:?}", cfg.term_timeout);
    match cfg.params.log_file.as_deref() {
        Some(log_file) => {
            let paths = LogPaths::for_log_file(log_file);
            println!("  stdout: {}", paths.stdout.display());
            println!("  stderr: {}", paths.stderr.display());
        }
        None => println!("  output: inherited"),
    }
    println!();
    println!("{}", command.render());
}

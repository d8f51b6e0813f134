// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mutating mod commands: add, remove, upgrade, outdated, pin, discover.

use std::path::PathBuf;

use crate::cli::mods::{AddArgs, DiscoverArgs, PinArgs, RemoveArgs, UpgradeArgs};
use crate::engine::{DiscoverStatus, ReconciliationEngine, UpgradeStatus};
use crate::error::Result;

/// Main handler for the add command.
///
/// With --version an exact version is installed instead of resolving the
/// latest compatible one.
///
/// # Errors
///
/// Returns an error when the mod is already tracked, no compatible version
/// exists, or fetch/verify fails.
pub async fn run_add_command(args: &AddArgs, engine: &ReconciliationEngine) -> Result<()> {
    let tracked = match &args.version {
        Some(version) => engine.install_version(&args.mod_id, version).await?,
        None => engine.add(&args.mod_id).await?,
    };
    println!(
        "added {} {} ({})",
        tracked.id, tracked.version, tracked.filename
    );
    if args.version.is_some() {
        println!("note: a batch upgrade may replace this version; `modweaver pin {}` to keep it", tracked.id);
    }
    Ok(())
}

/// Main handler for the remove command.
///
/// # Errors
///
/// Returns an error when the mod is not tracked.
pub async fn run_remove_command(args: &RemoveArgs, engine: &ReconciliationEngine) -> Result<()> {
    let removed = engine.remove(&args.mod_id).await?;
    println!("removed {} ({})", removed.id, removed.filename);
    Ok(())
}

/// Main handler for the upgrade command.
///
/// # Errors
///
/// Returns an error for a targeted upgrade of an untracked mod, or on
/// manifest failures; per-mod failures are reported, not fatal.
pub async fn run_upgrade_command(args: &UpgradeArgs, engine: &ReconciliationEngine) -> Result<()> {
    let outcomes = engine.upgrade(args.mod_id.as_deref()).await?;
    if outcomes.is_empty() {
        println!("nothing tracked on {}", engine.provider_kind());
        return Ok(());
    }

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.status {
            UpgradeStatus::Updated { from, to } => {
                println!("{}: {} -> {}", outcome.mod_id, from, to);
            }
            UpgradeStatus::UpToDate => println!("{}: up to date", outcome.mod_id),
            UpgradeStatus::SkippedPinned => println!("{}: pinned, skipped", outcome.mod_id),
            UpgradeStatus::Cancelled => println!("{}: cancelled", outcome.mod_id),
            UpgradeStatus::Failed(reason) => {
                failures += 1;
                println!("{}: failed ({reason})", outcome.mod_id);
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!("{failures} upgrade(s) failed"));
    }
    Ok(())
}

/// Main handler for the outdated command.
///
/// # Errors
///
/// Returns an error on manifest failures, or when any per-mod drift check
/// failed upstream.
pub async fn run_outdated_command(engine: &ReconciliationEngine) -> Result<()> {
    let report = engine.outdated().await?;
    if report.drift.is_empty() && report.failures.is_empty() {
        println!("everything is up to date");
        return Ok(());
    }

    for drift in &report.drift {
        let pin = if drift.pinned { "  [pinned]" } else { "" };
        println!(
            "{}: {} -> {}{}",
            drift.mod_id, drift.installed, drift.latest, pin
        );
    }
    for failure in &report.failures {
        println!("{}: check failed ({})", failure.mod_id, failure.reason);
    }

    if !report.failures.is_empty() {
        return Err(anyhow::anyhow!(
            "{} drift check(s) failed",
            report.failures.len()
        ));
    }
    Ok(())
}

/// Main handler for the pin and unpin commands.
///
/// # Errors
///
/// Returns an error when the mod is not tracked.
pub fn run_pin_command(args: &PinArgs, engine: &ReconciliationEngine, pinned: bool) -> Result<()> {
    engine.set_pinned(&args.mod_id, pinned)?;
    if pinned {
        println!("pinned {}", args.mod_id);
    } else {
        println!("unpinned {}", args.mod_id);
    }
    Ok(())
}

/// Main handler for the discover command.
///
/// Scans the workspace for .jar files when no files are given.
///
/// # Errors
///
/// Returns an error on manifest failures; per-file problems are reported
/// as outcomes.
pub async fn run_discover_command(
    args: &DiscoverArgs,
    engine: &ReconciliationEngine,
) -> Result<()> {
    let files = if args.files.is_empty() {
        workspace_jars(&engine.workspace_dir())?
    } else {
        args.files.clone()
    };

    if files.is_empty() {
        println!("no artifact files to identify");
        return Ok(());
    }

    let outcomes = engine.discover(&files).await?;
    for outcome in &outcomes {
        let name = outcome.file.display();
        match &outcome.status {
            DiscoverStatus::Tracked(entry) => {
                println!("{name}: tracked as {} {}", entry.id, entry.version);
            }
            DiscoverStatus::AlreadyTracked => println!("{name}: already tracked"),
            DiscoverStatus::Unmatched => println!("{name}: not in the catalog"),
            DiscoverStatus::Cancelled => println!("{name}: cancelled"),
            DiscoverStatus::Failed(reason) => println!("{name}: failed ({reason})"),
        }
    }
    Ok(())
}

/// All .jar files directly inside the workspace directory, sorted for
/// stable output.
fn workspace_jars(dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut jars = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "jar") {
            jars.push(path);
        }
    }
    jars.sort();
    Ok(jars)
}

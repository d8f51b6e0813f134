// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace commands: init and list.

use crate::cli::workspace::InitArgs;
use crate::engine::ReconciliationEngine;
use crate::error::Result;
use crate::manifest::Environment;

/// Main handler for the init command.
///
/// # Errors
///
/// Returns an error when a manifest already exists and --force is not given.
pub fn run_init_command(args: &InitArgs, engine: &ReconciliationEngine) -> Result<()> {
    let environment = Environment {
        build: args.build.clone(),
        loader: args.loader,
    };
    engine.init(environment, args.force)?;
    println!("initialized workspace for {}/{}", args.build, args.loader);
    Ok(())
}

/// Main handler for the list command.
///
/// # Errors
///
/// Returns an error on an uninitialized or corrupted manifest.
pub fn run_list_command(engine: &ReconciliationEngine) -> Result<()> {
    let manifest = engine.list()?;
    println!(
        "workspace: {}/{}",
        manifest.environment.build, manifest.environment.loader
    );

    if manifest.mods.is_empty() {
        println!("no mods tracked");
        return Ok(());
    }

    for tracked in &manifest.mods {
        let pin = if tracked.pinned { "  [pinned]" } else { "" };
        println!(
            "{}  {}  {}  ({}){}",
            tracked.provider, tracked.id, tracked.version, tracked.filename, pin
        );
    }
    Ok(())
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only catalog commands: search, info, versions.

use crate::cli::mods::{InfoArgs, SearchArgs, VersionsArgs};
use crate::engine::ReconciliationEngine;
use crate::error::Result;

/// Main handler for the search command.
///
/// # Errors
///
/// Returns an error when the provider does not support search.
pub async fn run_search_command(args: &SearchArgs, engine: &ReconciliationEngine) -> Result<()> {
    let hits = engine.search(&args.term).await?;
    if hits.is_empty() {
        println!("no results for '{}'", args.term);
        return Ok(());
    }

    for hit in &hits {
        println!("{}  ({})", hit.name, hit.id);
        if !hit.author.is_empty() {
            println!("  by {}", hit.author);
        }
        println!("  {}", hit.description);
    }
    Ok(())
}

/// Main handler for the info command.
///
/// # Errors
///
/// Returns an error when the mod is unknown upstream.
pub async fn run_info_command(args: &InfoArgs, engine: &ReconciliationEngine) -> Result<()> {
    let entry = engine.info(&args.mod_id).await?;

    println!("{}  ({})", entry.name, entry.id);
    if !entry.author.is_empty() {
        println!("author:      {}", entry.author);
    }
    println!("description: {}", entry.description);
    if !entry.categories.is_empty() {
        println!("categories:  {}", entry.categories.join(", "));
    }
    if let Some(downloads) = entry.downloads {
        println!("downloads:   {downloads}");
    }
    if !entry.website.is_empty() {
        println!("website:     {}", entry.website);
    }
    if let Some(source) = &entry.source_url {
        println!("source:      {source}");
    }
    Ok(())
}

/// Main handler for the versions command.
///
/// Lists versions, or installs the given one exactly (the downgrade path).
///
/// # Errors
///
/// Returns an error when the mod or the requested version is unknown
/// upstream, or when the exact install fails.
pub async fn run_versions_command(args: &VersionsArgs, engine: &ReconciliationEngine) -> Result<()> {
    if let Some(version_id) = &args.version_id {
        let tracked = engine.install_version(&args.mod_id, version_id).await?;
        println!(
            "installed {} {} ({})",
            tracked.id, tracked.version, tracked.filename
        );
        println!(
            "note: a batch upgrade may replace this version; `modweaver pin {}` to keep it",
            tracked.id
        );
        return Ok(());
    }

    let versions = engine.versions(&args.mod_id, args.all).await?;
    if versions.is_empty() {
        println!("no matching versions of '{}'", args.mod_id);
        return Ok(());
    }

    for version in &versions {
        println!(
            "{}  {}  {}  [{}] [{}]",
            version.id,
            version.version,
            version.released.format("%Y-%m-%d"),
            version.game_versions.join(", "),
            version.loaders.join(", ")
        );
    }
    Ok(())
}

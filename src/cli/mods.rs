// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod management command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `search` command.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Free-text search term.
    #[arg(value_name = "TERM")]
    pub term: String,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    /// Mod identifier on the selected provider.
    #[arg(value_name = "MOD")]
    pub mod_id: String,
}

/// Arguments for the `versions` command.
#[derive(Debug, Clone, Args)]
pub struct VersionsArgs {
    /// Mod identifier on the selected provider.
    #[arg(value_name = "MOD")]
    pub mod_id: String,

    /// Install this exact version id instead of listing. May downgrade;
    /// pin afterwards to keep it.
    #[arg(value_name = "VERSION", conflicts_with = "all")]
    pub version_id: Option<String>,

    /// Show all versions, not just those compatible with the environment.
    #[arg(short = 'a', long)]
    pub all: bool,
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Mod identifier on the selected provider.
    #[arg(value_name = "MOD")]
    pub mod_id: String,

    /// Install this exact version id instead of resolving the latest
    /// compatible one. May downgrade; pin afterwards to keep it.
    #[arg(long = "version", value_name = "ID")]
    pub version: Option<String>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    /// Mod identifier on the selected provider.
    #[arg(value_name = "MOD")]
    pub mod_id: String,
}

/// Arguments for the `upgrade` command.
#[derive(Debug, Clone, Args)]
pub struct UpgradeArgs {
    /// Mod to upgrade; all tracked mods of the provider when omitted.
    #[arg(value_name = "MOD")]
    pub mod_id: Option<String>,
}

/// Arguments for the `pin` and `unpin` commands.
#[derive(Debug, Clone, Args)]
pub struct PinArgs {
    /// Mod identifier on the selected provider.
    #[arg(value_name = "MOD")]
    pub mod_id: String,
}

/// Arguments for the `discover` command.
#[derive(Debug, Clone, Args)]
pub struct DiscoverArgs {
    /// Artifact files to identify. Scans the workspace for .jar files
    /// when omitted.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for modweaver-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! modweaver [global options] <command>
//! init BUILD LOADER [--force]
//! search TERM | info MOD | versions MOD [VERSION] [-a]
//! add MOD [--version ID] | remove MOD
//! upgrade [MOD] | outdated
//! pin MOD | unpin MOD
//! discover [FILE...]
//! list
//! ```

pub mod global;
pub mod mods;
pub mod workspace;


use clap::{Parser, Subcommand};

use crate::cli::global::GlobalOptions;
use crate::cli::mods::{
    AddArgs, DiscoverArgs, InfoArgs, PinArgs, RemoveArgs, SearchArgs, UpgradeArgs, VersionsArgs,
};
use crate::cli::workspace::InitArgs;

/// Minecraft Mod Manager - Rust Port
///
/// Keeps a directory of mod artifacts reconciled with a declarative
/// manifest against the Modrinth and CurseForge catalogs.
#[derive(Debug, Parser)]
#[command(
    name = "modweaver",
    author,
    version,
    about = "Minecraft Mod Manager",
    long_about = "modweaver-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Tracks installed Minecraft mods in a manifest next to the\n\
                  artifacts. `modweaver init 1.17.1 fabric` sets up a workspace;\n\
                  `modweaver add sodium` installs the latest compatible version.\n\
                  See `modweaver <command> --help` for more information about a\n\
                  command."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Initializes a workspace manifest for a build and loader.
    Init(InitArgs),

    /// Lists the tracked mods.
    List,

    /// Searches the catalog, filtered by the workspace environment.
    Search(SearchArgs),

    /// Shows catalog metadata for a mod.
    Info(InfoArgs),

    /// Lists published versions of a mod, or installs an exact one.
    Versions(VersionsArgs),

    /// Tracks and installs a mod.
    Add(AddArgs),

    /// Stops tracking a mod and deletes its artifact.
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    /// Upgrades one mod, or everything unpinned.
    #[command(visible_alias = "up")]
    Upgrade(UpgradeArgs),

    /// Reports tracked mods with a newer compatible version.
    Outdated,

    /// Excludes a mod from batch upgrades.
    Pin(PinArgs),

    /// Re-includes a mod in batch upgrades.
    Unpin(PinArgs),

    /// Identifies untracked artifact files by content fingerprint.
    Discover(DiscoverArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Provider Selection
//!
//! ```text
//! --provider NAME   ← modrinth | curseforge (also mr | cf)
//! --modrinth/--mr   ← shorthand flags
//! --curseforge/--cf
//!
//! Precedence: shorthand flag > --provider > modrinth default
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::provider::ProviderKind;

/// Global options available for all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Path to the workspace manifest.
    #[arg(
        short = 'f',
        long = "manifest",
        value_name = "FILE",
        default_value = ".mods.toml"
    )]
    pub manifest: PathBuf,

    /// Catalog provider to operate against.
    #[arg(short = 'p', long = "provider", value_name = "PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Use the Modrinth catalog (default).
    #[arg(long, visible_alias = "mr", conflicts_with_all = ["provider", "curseforge"])]
    pub modrinth: bool,

    /// Use the CurseForge catalog.
    #[arg(long, visible_alias = "cf", conflicts_with = "provider")]
    pub curseforge: bool,

    /// Modrinth API token, required for restricted mods.
    #[arg(
        long = "modrinth-token",
        value_name = "TOKEN",
        env = "MODRINTH_TOKEN",
        hide_env_values = true
    )]
    pub modrinth_token: Option<String>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Number of concurrent catalog requests in batch operations.
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(".mods.toml"),
            provider: None,
            modrinth: false,
            curseforge: false,
            modrinth_token: None,
            log_level: None,
            file_log_level: None,
            log_file: None,
            jobs: None,
        }
    }
}

impl GlobalOptions {
    /// The effective provider after flag precedence.
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        if self.curseforge {
            ProviderKind::Curseforge
        } else if self.modrinth {
            ProviderKind::Modrinth
        } else {
            self.provider.unwrap_or(ProviderKind::Modrinth)
        }
    }
}

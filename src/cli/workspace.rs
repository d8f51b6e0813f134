// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace setup command arguments.

use clap::Args;

use crate::manifest::Loader;

/// Arguments for the `init` command.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Target game build, e.g. 1.17.1.
    #[arg(value_name = "BUILD")]
    pub build: String,

    /// Mod loader variant (fabric or forge).
    #[arg(value_name = "LOADER")]
    pub loader: Loader,

    /// Overwrite an existing manifest, dropping all tracked mods.
    #[arg(long)]
    pub force: bool,
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   workspace: init, list
//!   catalog:   search, info, versions
//!   mods:      add, remove, upgrade, outdated, pin, discover
//! ```

pub mod catalog;
pub mod mods;
pub mod workspace;

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        init / add / upgrade / ..
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          engine           |
//!              |  load -> reconcile -> save |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!             manifest    resolver  provider
//!             TOML store  pure fn   modrinth/curseforge
//!                                      |
//!                                      v
//!                                     net
//!                                 HTTP, retry, DL
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod engine;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod net;
pub mod provider;
pub mod resolver;
pub mod utility;

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Engine --> Command Dispatch
//!   Init | List | Search | Info | Versions | Add | Remove
//!   Upgrade | Outdated | Pin | Unpin | Discover
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use modweaver_rs::cli::global::GlobalOptions;
use modweaver_rs::cli::{self, Command};
use modweaver_rs::cmd::catalog::{run_info_command, run_search_command, run_versions_command};
use modweaver_rs::cmd::mods::{
    run_add_command, run_discover_command, run_outdated_command, run_pin_command,
    run_remove_command, run_upgrade_command,
};
use modweaver_rs::cmd::workspace::{run_init_command, run_list_command};
use modweaver_rs::engine::ReconciliationEngine;
use modweaver_rs::logging::{LogConfig, LogLevel, init_logging};
use modweaver_rs::manifest::ManifestStore;
use modweaver_rs::provider;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

fn build_engine(global: &GlobalOptions) -> ReconciliationEngine {
    let store = ManifestStore::new(global.manifest.clone());
    let adapter = provider::create(global.provider_kind(), global.modrinth_token.clone());
    let mut engine = ReconciliationEngine::new(store, Arc::from(adapter));
    if let Some(jobs) = global.jobs {
        engine = engine.with_concurrency(jobs.max(1));
    }
    engine
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Init(args)) => run_init_command(args, &build_engine(&cli.global)),
        Some(Command::List) => run_list_command(&build_engine(&cli.global)),
        Some(Command::Search(args)) => run_search_command(args, &build_engine(&cli.global)).await,
        Some(Command::Info(args)) => run_info_command(args, &build_engine(&cli.global)).await,
        Some(Command::Versions(args)) => {
            run_versions_command(args, &build_engine(&cli.global)).await
        }
        Some(Command::Add(args)) => run_add_command(args, &build_engine(&cli.global)).await,
        Some(Command::Remove(args)) => run_remove_command(args, &build_engine(&cli.global)).await,
        Some(Command::Upgrade(args)) => run_upgrade_command(args, &build_engine(&cli.global)).await,
        Some(Command::Outdated) => run_outdated_command(&build_engine(&cli.global)).await,
        Some(Command::Pin(args)) => run_pin_command(args, &build_engine(&cli.global), true),
        Some(Command::Unpin(args)) => run_pin_command(args, &build_engine(&cli.global), false),
        Some(Command::Discover(args)) => {
            run_discover_command(args, &build_engine(&cli.global)).await
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

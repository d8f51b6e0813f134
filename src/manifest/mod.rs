// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The persisted mod manifest and its store.
//!
//! ```text
//! .mods.toml
//!   [environment]  build = "1.17.1"  loader = "fabric"
//!   [[mods]]       provider, id, version, filename, fingerprint, pinned
//!
//! ManifestStore::load()  missing file -> Uninitialized
//!                        parse error  -> Corrupted (fatal)
//! ManifestStore::save()  serialize -> temp file -> atomic rename
//! ```
//!
//! The manifest is the single source of truth: the on-disk jar set is
//! expected to mirror it exactly. Editing jars behind modweaver's back is
//! unsupported and may desynchronize state. No cross-process locking is
//! provided; concurrent invocations against one directory are last-writer-wins
//! on the atomic rename.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, WeaverResult};
use crate::provider::ProviderKind;


/// Mod loader variant all compatibility checks are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Fabric,
    Forge,
}

impl Loader {
    /// The string form used in catalog version compatibility lists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fabric => "fabric",
            Self::Forge => "forge",
        }
    }
}

impl std::fmt::Display for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Loader {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fabric" => Ok(Self::Fabric),
            "forge" => Ok(Self::Forge),
            _ => Err(format!("expected 'fabric' or 'forge', got '{s}'")),
        }
    }
}

/// The (target build, loader) pair a workspace is initialized for.
///
/// Immutable once initialized; changing it means re-running `init --force`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Target game build, e.g. "1.17.1".
    pub build: String,
    /// Mod loader variant.
    pub loader: Loader,
}

/// One tracked mod: the manifest's record of an installed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedMod {
    /// Which catalog this mod came from.
    pub provider: ProviderKind,
    /// Provider-scoped mod identifier (not globally unique).
    pub id: String,
    /// Installed version identifier.
    pub version: String,
    /// Artifact filename on disk, unique within the manifest.
    pub filename: String,
    /// Content fingerprint of the installed artifact
    /// (SHA-1 hex for Modrinth, decimal murmur2 for CurseForge).
    pub fingerprint: String,
    /// Pinned mods are never touched by a batch upgrade.
    #[serde(default)]
    pub pinned: bool,
}

/// The persisted record of environment + tracked mods, insertion-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Environment all compatibility checks run against.
    pub environment: Environment,
    /// Tracked mods in insertion order.
    #[serde(default)]
    pub mods: Vec<TrackedMod>,
}

impl Manifest {
    /// Create an empty manifest for the given environment.
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self {
            environment,
            mods: Vec::new(),
        }
    }

    /// Find a tracked mod by (provider, id).
    #[must_use]
    pub fn find(&self, provider: ProviderKind, mod_id: &str) -> Option<&TrackedMod> {
        self.mods
            .iter()
            .find(|m| m.provider == provider && m.id == mod_id)
    }

    /// Mutable lookup by (provider, id).
    pub fn find_mut(&mut self, provider: ProviderKind, mod_id: &str) -> Option<&mut TrackedMod> {
        self.mods
            .iter_mut()
            .find(|m| m.provider == provider && m.id == mod_id)
    }

    /// Whether a (provider, id) pair is tracked.
    #[must_use]
    pub fn is_tracked(&self, provider: ProviderKind, mod_id: &str) -> bool {
        self.find(provider, mod_id).is_some()
    }

    /// The tracked mod owning this artifact filename, if any. Filenames are
    /// unique across the manifest, providers included.
    #[must_use]
    pub fn file_owner(&self, filename: &str) -> Option<&TrackedMod> {
        self.mods.iter().find(|m| m.filename == filename)
    }

    /// Whether any tracked mod owns this artifact filename.
    #[must_use]
    pub fn is_file_tracked(&self, filename: &str) -> bool {
        self.file_owner(filename).is_some()
    }

    /// Append a tracked mod, replacing any prior entry for the same
    /// (provider, id) to preserve the uniqueness invariant.
    pub fn upsert(&mut self, entry: TrackedMod) {
        if let Some(existing) = self.find_mut(entry.provider, &entry.id) {
            *existing = entry;
        } else {
            self.mods.push(entry);
        }
    }

    /// Remove a tracked mod, returning it if present.
    pub fn remove(&mut self, provider: ProviderKind, mod_id: &str) -> Option<TrackedMod> {
        let index = self
            .mods
            .iter()
            .position(|m| m.provider == provider && m.id == mod_id)?;
        Some(self.mods.remove(index))
    }
}

/// Loads and saves the manifest with atomic replacement.
///
/// Each engine operation does its own load/save pair; there is no in-process
/// caching across operations.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Create a store for the manifest at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the persisted manifest.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the manifest (and the artifacts) live in.
    #[must_use]
    pub fn workspace_dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Initialize a fresh manifest for the given environment.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::AlreadyInitialized`] when the file exists and
    /// `force` is not set.
    pub fn init(&self, environment: Environment, force: bool) -> WeaverResult<Manifest> {
        if self.path.exists() && !force {
            return Err(ManifestError::AlreadyInitialized {
                path: self.path.display().to_string(),
            }
            .into());
        }
        let manifest = Manifest::new(environment);
        self.save(&manifest)?;
        Ok(manifest)
    }

    /// Load the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Uninitialized`] when the file does not exist
    /// and [`ManifestError::Corrupted`] when it cannot be parsed. Corruption
    /// is fatal: callers abort before any filesystem mutation.
    pub fn load(&self) -> WeaverResult<Manifest> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::Uninitialized {
                    path: self.path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(ManifestError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                }
                .into());
            }
        };

        toml::from_str(&content).map_err(|e| {
            ManifestError::Corrupted {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Save the manifest atomically.
    ///
    /// The document is serialized to a temp file in the manifest's directory
    /// and renamed into place, so a crash mid-write leaves the prior manifest
    /// readable.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the temp file cannot be written or
    /// the rename fails.
    pub fn save(&self, manifest: &Manifest) -> WeaverResult<()> {
        let content = toml::to_string_pretty(manifest).map_err(|e| ManifestError::Corrupted {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let io_err = |e: std::io::Error| ManifestError::Io {
            path: self.path.display().to_string(),
            source: e,
        };

        let mut temp = tempfile::NamedTempFile::new_in(self.workspace_dir()).map_err(io_err)?;
        temp.write_all(content.as_bytes()).map_err(io_err)?;
        temp.flush().map_err(io_err)?;
        temp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = %self.path.display(), mods = manifest.mods.len(), "manifest saved");
        Ok(())
    }
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote catalog abstraction.
//!
//! ```text
//! ModProvider (dyn trait, BoxFuture methods)
//!   search()            term + environment -> Vec<CatalogEntry>
//!   get_info()          mod id -> CatalogEntry
//!   list_versions()     mod id -> Vec<CatalogVersion> (unfiltered)
//!   match_fingerprint() on-disk file -> CatalogVersion (reverse lookup)
//!   fingerprint_file()  on-disk file -> fingerprint string
//!   fetch_artifact()    CatalogVersion -> file at dest (atomic)
//!
//! Variants: Modrinth (string ids, sha1, token) and
//!           CurseForge (numeric ids, murmur2, anonymous)
//!
//! Retry/backoff lives in crate::net; the engine sees only
//! success or a typed error.
//! ```
//!
//! The two catalogs have different identifier formats, metadata shapes and
//! rate characteristics; the engine depends only on this interface and an
//! explicit [`ProviderKind`] tag passed through every call — never on
//! ambient/global provider state.

use std::path::Path;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::WeaverResult;
use crate::manifest::Environment;

pub mod curseforge;
pub mod modrinth;

/// Tag selecting one of the two catalog backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Modrinth,
    Curseforge,
}

impl ProviderKind {
    /// The tag persisted in the manifest and shown to the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modrinth => "modrinth",
            Self::Curseforge => "curseforge",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modrinth" | "mr" => Ok(Self::Modrinth),
            "curseforge" | "cf" => Ok(Self::Curseforge),
            _ => Err(format!("expected 'modrinth' or 'curseforge', got '{s}'")),
        }
    }
}

/// Catalog metadata for a mod, as shown by `search` and `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Provider-scoped mod identifier.
    pub id: String,
    pub name: String,
    pub author: String,
    pub website: String,
    pub description: String,
    pub categories: Vec<String>,
    /// Total download count, when the catalog reports one.
    pub downloads: Option<u64>,
    /// Upstream source repository, when published.
    pub source_url: Option<String>,
}

/// One published version of a mod. Resolver input; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogVersion {
    /// Mod this version belongs to.
    pub mod_id: String,
    /// Version identifier (resolver tie-break key).
    pub id: String,
    /// Human-readable version number / display name.
    pub version: String,
    /// Artifact filename the catalog publishes.
    pub filename: String,
    /// Download reference.
    pub url: String,
    /// Content fingerprint the catalog declares for the artifact, in the
    /// provider's own format. Used for post-fetch integrity verification.
    pub fingerprint: Option<String>,
    /// Compatible loader variants (lowercase).
    pub loaders: Vec<String>,
    /// Compatible target builds.
    pub game_versions: Vec<String>,
    /// Release timestamp (resolver primary key).
    pub released: DateTime<Utc>,
}

impl CatalogVersion {
    /// Whether this version is compatible with the environment.
    #[must_use]
    pub fn matches(&self, environment: &Environment) -> bool {
        self.game_versions
            .iter()
            .any(|v| v == &environment.build)
            && self
                .loaders
                .iter()
                .any(|l| l == environment.loader.as_str())
    }
}

/// Result of a reverse lookup by content fingerprint.
#[derive(Debug, Clone)]
pub struct FingerprintMatch {
    /// The identified version (carries the mod id).
    pub version: CatalogVersion,
    /// Mod display name, when the catalog could supply one.
    pub name: Option<String>,
    /// The locally computed fingerprint that matched.
    pub fingerprint: String,
}

/// Capability interface over one remote catalog.
///
/// Methods return `BoxFuture` so the trait stays dyn-compatible; the engine
/// holds a `dyn ModProvider` selected per call by [`ProviderKind`].
///
/// Transient network failures are retried inside the adapter (via
/// [`crate::net`]) before a typed error surfaces; not-found and forbidden
/// responses surface immediately.
pub trait ModProvider: Send + Sync {
    /// Which catalog this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Search the catalog. The result page is finite and not restartable.
    fn search<'a>(
        &'a self,
        term: &'a str,
        environment: &'a Environment,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogEntry>>>;

    /// Fetch catalog metadata for a mod.
    fn get_info<'a>(&'a self, mod_id: &'a str) -> BoxFuture<'a, WeaverResult<CatalogEntry>>;

    /// List all published versions, incompatible ones included; filtering is
    /// the resolver's job.
    fn list_versions<'a>(
        &'a self,
        mod_id: &'a str,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogVersion>>>;

    /// Identify an on-disk artifact by content fingerprint.
    fn match_fingerprint<'a>(
        &'a self,
        file: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<FingerprintMatch>>;

    /// Compute this catalog's fingerprint of a local file.
    fn fingerprint_file<'a>(&'a self, file: &'a Path) -> BoxFuture<'a, WeaverResult<String>>;

    /// Download a version's artifact to `dest`. Atomic: either the full
    /// artifact is at the path afterwards, or nothing usable is.
    fn fetch_artifact<'a>(
        &'a self,
        version: &'a CatalogVersion,
        dest: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<()>>;
}

/// Build the adapter for a provider tag.
///
/// `token` is only meaningful for Modrinth and is attached as an
/// Authorization header when present.
#[must_use]
pub fn create(kind: ProviderKind, token: Option<String>) -> Box<dyn ModProvider> {
    match kind {
        ProviderKind::Modrinth => Box::new(modrinth::Modrinth::new(token)),
        ProviderKind::Curseforge => Box::new(curseforge::CurseForge::new()),
    }
}

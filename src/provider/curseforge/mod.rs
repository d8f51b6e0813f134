// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CurseForge catalog adapter.
//!
//! ```text
//! POST addon [id]          addon metadata (array response)
//! GET  addon/{id}/files    all published files
//! POST fingerprint [u32]   reverse lookup by murmur2
//!
//! ids: numeric             fingerprint: murmur2 seed 1, decimal
//! loaders: inferred from the gameVersion list ("Fabric"/"Forge"
//! markers; bare lists predate loaders and default to forge)
//! search: unsupported
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use super::{CatalogEntry, CatalogVersion, FingerprintMatch, ModProvider, ProviderKind};
use crate::error::{NetworkError, ProviderError, WeaverError, WeaverResult};
use crate::manifest::Environment;
use crate::net::{Downloader, RemoteClient};
use crate::utility::hash::curseforge_fingerprint_file;

#[cfg(test)]
mod tests;

const DEFAULT_BASE_URL: &str = "https://addons-ecs.forgesvc.net/api/v2/";

/// Adapter for the CurseForge catalog. Anonymous; no token required.
pub struct CurseForge {
    client: RemoteClient,
}

// --- Wire DTOs ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddonDto {
    id: u64,
    name: String,
    #[serde(default)]
    authors: Vec<AuthorDto>,
    #[serde(default)]
    website_url: String,
    summary: String,
    #[serde(default)]
    categories: Vec<CategoryDto>,
    #[serde(default)]
    download_count: Option<f64>,
    #[serde(default)]
    source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CategoryDto {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileDto {
    id: u64,
    display_name: String,
    file_name: String,
    download_url: String,
    file_date: DateTime<Utc>,
    #[serde(default)]
    game_version: Vec<String>,
    #[serde(default)]
    package_fingerprint: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintResponseDto {
    #[serde(default)]
    exact_matches: Vec<FingerprintMatchDto>,
}

#[derive(Debug, Deserialize)]
struct FingerprintMatchDto {
    id: u64,
    file: FileDto,
}

impl FileDto {
    /// Split the mixed `gameVersion` list into loaders and builds.
    fn into_catalog_version(self, mod_id: &str) -> CatalogVersion {
        let mut loaders = Vec::new();
        if self.game_version.iter().any(|v| v == "Fabric") {
            loaders.push("fabric".to_string());
        }
        if self.game_version.iter().any(|v| v == "Forge") {
            loaders.push("forge".to_string());
        }
        if loaders.is_empty() {
            // in ye ol' days, there was only forge
            loaders.push("forge".to_string());
        }

        let game_versions = self
            .game_version
            .into_iter()
            .filter(|v| v != "Fabric" && v != "Forge")
            .collect();

        CatalogVersion {
            mod_id: mod_id.to_string(),
            id: self.id.to_string(),
            version: self.display_name,
            filename: self.file_name,
            url: self.download_url,
            fingerprint: self.package_fingerprint.map(|f| f.to_string()),
            loaders,
            game_versions,
            released: self.file_date,
        }
    }
}

impl Default for CurseForge {
    fn default() -> Self {
        Self::new()
    }
}

impl CurseForge {
    /// Create an adapter against the public API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create an adapter against a custom API base (tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: RemoteClient::new(base_url),
        }
    }

    fn not_found(&self, mod_id: &str) -> WeaverError {
        ProviderError::ModNotFound {
            provider: self.kind().to_string(),
            mod_id: mod_id.to_string(),
        }
        .into()
    }

    /// Parse the numeric addon id this catalog uses.
    fn numeric_id(&self, mod_id: &str) -> WeaverResult<u64> {
        mod_id.parse().map_err(|_| self.not_found(mod_id))
    }

    async fn addon(&self, mod_id: &str) -> WeaverResult<AddonDto> {
        let id = self.numeric_id(mod_id)?;
        let mut addons: Vec<AddonDto> = self
            .client
            .post_json("addon", &[id])
            .await
            .map_err(|e| match e {
                NetworkError::Http { status: 404, .. } => self.not_found(mod_id),
                other => other.into(),
            })?;

        // the array endpoint answers 200 with an empty list for unknown ids
        if addons.is_empty() {
            return Err(self.not_found(mod_id));
        }
        Ok(addons.swap_remove(0))
    }

    fn entry_from_addon(addon: AddonDto) -> CatalogEntry {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let downloads = addon.download_count.map(|c| c as u64);
        CatalogEntry {
            id: addon.id.to_string(),
            name: addon.name,
            author: addon
                .authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            website: addon.website_url,
            description: addon.summary,
            categories: addon.categories.into_iter().map(|c| c.name).collect(),
            downloads,
            source_url: addon.source_url,
        }
    }

    /// Guess a mod name from an artifact's display name, for fingerprint
    /// matches where the addon lookup fails.
    fn guess_name(display_name: &str) -> String {
        display_name
            .split('-')
            .next()
            .unwrap_or(display_name)
            .split('_')
            .next()
            .unwrap_or(display_name)
            .to_string()
    }
}

impl ModProvider for CurseForge {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Curseforge
    }

    fn search<'a>(
        &'a self,
        _term: &'a str,
        _environment: &'a Environment,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogEntry>>> {
        async move {
            Err(ProviderError::Unsupported {
                provider: self.kind().to_string(),
                operation: "search".to_string(),
            }
            .into())
        }
        .boxed()
    }

    fn get_info<'a>(&'a self, mod_id: &'a str) -> BoxFuture<'a, WeaverResult<CatalogEntry>> {
        async move {
            let addon = self.addon(mod_id).await?;
            Ok(Self::entry_from_addon(addon))
        }
        .boxed()
    }

    fn list_versions<'a>(
        &'a self,
        mod_id: &'a str,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogVersion>>> {
        async move {
            let id = self.numeric_id(mod_id)?;
            let files: Vec<FileDto> = self
                .client
                .get_json(&format!("addon/{id}/files"), &[])
                .await
                .map_err(|e| match e {
                    NetworkError::Http { status: 404, .. } => self.not_found(mod_id),
                    other => other.into(),
                })?;

            debug!(mod_id, files = files.len(), "curseforge file list");
            Ok(files
                .into_iter()
                .map(|f| f.into_catalog_version(mod_id))
                .collect())
        }
        .boxed()
    }

    fn match_fingerprint<'a>(
        &'a self,
        file: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<FingerprintMatch>> {
        async move {
            let fingerprint = curseforge_fingerprint_file(file).await?;
            let response: FingerprintResponseDto = self
                .client
                .post_json("fingerprint", &[fingerprint])
                .await
                .map_err(WeaverError::from)?;

            let Some(matched) = response.exact_matches.into_iter().next() else {
                return Err(ProviderError::FingerprintUnmatched {
                    file: file.display().to_string(),
                }
                .into());
            };

            let mod_id = matched.id.to_string();
            // best effort: a failed addon lookup falls back to a guessed name
            let name = match self.addon(&mod_id).await {
                Ok(addon) => Some(addon.name),
                Err(_) => Some(Self::guess_name(&matched.file.display_name)),
            };

            Ok(FingerprintMatch {
                version: matched.file.into_catalog_version(&mod_id),
                name,
                fingerprint: fingerprint.to_string(),
            })
        }
        .boxed()
    }

    fn fingerprint_file<'a>(&'a self, file: &'a Path) -> BoxFuture<'a, WeaverResult<String>> {
        async move {
            let fingerprint = curseforge_fingerprint_file(file).await?;
            Ok(fingerprint.to_string())
        }
        .boxed()
    }

    fn fetch_artifact<'a>(
        &'a self,
        version: &'a CatalogVersion,
        dest: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<()>> {
        async move {
            Downloader::new()
                .url(&version.url)
                .file(dest)
                .download()
                .await?;
            Ok(())
        }
        .boxed()
    }
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Modrinth catalog adapter.
//!
//! ```text
//! GET mod/{id}                          project metadata + version id list
//! GET version/{id}                      one version (fanned out concurrently)
//! GET mod?query=..&facets=..            search, pre-filtered by environment
//! GET version_file/{sha1}?algorithm=sha1  reverse lookup
//! GET team/{id}/members + user/{id}     author names (best effort)
//!
//! ids: slug-like strings   fingerprint: SHA-1 hex   auth: token header
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, try_join_all};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{CatalogEntry, CatalogVersion, FingerprintMatch, ModProvider, ProviderKind};
use crate::error::{NetworkError, ProviderError, WeaverError, WeaverResult};
use crate::manifest::Environment;
use crate::net::{Downloader, RemoteClient};
use crate::utility::hash::sha1_file;

#[cfg(test)]
mod tests;

const DEFAULT_BASE_URL: &str = "https://api.modrinth.com/api/v1/";

/// Adapter for the Modrinth catalog.
pub struct Modrinth {
    client: RemoteClient,
}

// --- Wire DTOs ---

#[derive(Debug, Deserialize)]
struct ProjectDto {
    id: String,
    slug: Option<String>,
    title: String,
    description: String,
    categories: Vec<String>,
    #[serde(default)]
    downloads: Option<u64>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionDto {
    id: String,
    mod_id: String,
    version_number: String,
    files: Vec<VersionFileDto>,
    #[serde(default)]
    loaders: Vec<String>,
    #[serde(default)]
    game_versions: Vec<String>,
    date_published: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VersionFileDto {
    filename: String,
    url: String,
    #[serde(default)]
    hashes: Option<FileHashesDto>,
}

#[derive(Debug, Deserialize)]
struct FileHashesDto {
    #[serde(default)]
    sha1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseDto {
    hits: Vec<SearchHitDto>,
}

#[derive(Debug, Deserialize)]
struct SearchHitDto {
    mod_id: String,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    page_url: String,
    description: String,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TeamMemberDto {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    #[serde(default)]
    name: Option<String>,
    username: String,
}

impl VersionDto {
    /// Flatten the DTO into a [`CatalogVersion`]; the first file is the
    /// artifact, as the catalog orders primaries first.
    fn into_catalog_version(self) -> WeaverResult<CatalogVersion> {
        let file = self
            .files
            .into_iter()
            .next()
            .ok_or_else(|| WeaverError::Other(
                format!("version '{}' has no files", self.id).into_boxed_str(),
            ))?;
        Ok(CatalogVersion {
            mod_id: self.mod_id,
            id: self.id,
            version: self.version_number,
            filename: file.filename,
            url: file.url,
            fingerprint: file.hashes.and_then(|h| h.sha1),
            loaders: self.loaders,
            game_versions: self.game_versions,
            released: self.date_published,
        })
    }
}

impl Modrinth {
    /// Create an adapter against the public API.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    /// Create an adapter against a custom API base (tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut client = RemoteClient::new(base_url);
        if let Some(token) = token {
            client = client.header("Authorization", token);
        }
        Self { client }
    }

    /// Map catalog HTTP errors onto the typed taxonomy for a mod lookup.
    fn mod_error(&self, mod_id: &str, err: NetworkError) -> WeaverError {
        match err {
            NetworkError::Http { status: 404, .. } => ProviderError::ModNotFound {
                provider: self.kind().to_string(),
                mod_id: mod_id.to_string(),
            }
            .into(),
            NetworkError::Http { status: 401, .. } => ProviderError::MissingToken {
                provider: self.kind().to_string(),
                hint: "--modrinth-token or MODRINTH_TOKEN".to_string(),
            }
            .into(),
            other => other.into(),
        }
    }

    async fn project(&self, mod_id: &str) -> WeaverResult<ProjectDto> {
        self.client
            .get_json::<ProjectDto>(&format!("mod/{mod_id}"), &[])
            .await
            .map_err(|e| self.mod_error(mod_id, e))
    }

    async fn version(&self, version_id: &str) -> WeaverResult<CatalogVersion> {
        let dto: VersionDto = self
            .client
            .get_json(&format!("version/{version_id}"), &[])
            .await
            .map_err(WeaverError::from)?;
        dto.into_catalog_version()
    }

    /// Resolve team member names, best effort: metadata stays useful even
    /// when the team endpoints are unavailable.
    async fn author_names(&self, team: Option<&str>) -> String {
        let Some(team) = team else {
            return String::new();
        };

        let members: Vec<TeamMemberDto> = match self
            .client
            .get_json(&format!("team/{team}/members"), &[])
            .await
        {
            Ok(members) => members,
            Err(e) => {
                warn!(team, error = %e, "couldn't load team members");
                return String::new();
            }
        };

        let lookups = members.iter().map(|m| {
            let path = format!("user/{}", m.user_id);
            async move { self.client.get_json::<UserDto>(&path, &[]).await }
        });
        match try_join_all(lookups).await {
            Ok(users) => users
                .into_iter()
                .map(|u| u.name.unwrap_or(u.username))
                .collect::<Vec<_>>()
                .join(", "),
            Err(e) => {
                warn!(team, error = %e, "couldn't load team users");
                String::new()
            }
        }
    }

    fn entry_from_project(&self, project: ProjectDto, author: String) -> CatalogEntry {
        let slug = project.slug.as_deref().unwrap_or(&project.id);
        CatalogEntry {
            website: format!("https://modrinth.com/mod/{slug}"),
            id: project.id,
            name: project.title,
            author,
            description: project.description,
            categories: project.categories,
            downloads: project.downloads,
            source_url: project.source_url,
        }
    }
}

impl ModProvider for Modrinth {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Modrinth
    }

    fn search<'a>(
        &'a self,
        term: &'a str,
        environment: &'a Environment,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogEntry>>> {
        async move {
            let facets = format!(
                "[[\"versions:{}\"],[\"categories:{}\"]]",
                environment.build, environment.loader
            );
            let response: SearchResponseDto = self
                .client
                .get_json("mod", &[("query", term), ("facets", &facets)])
                .await
                .map_err(WeaverError::from)?;

            debug!(term, hits = response.hits.len(), "modrinth search");
            Ok(response
                .hits
                .into_iter()
                .map(|hit| CatalogEntry {
                    // search results carry a "local-" prefix on ids
                    id: hit.mod_id.replace("local-", ""),
                    name: hit.title,
                    author: hit.author,
                    website: hit.page_url,
                    description: hit.description,
                    categories: hit.categories,
                    downloads: None,
                    source_url: None,
                })
                .collect())
        }
        .boxed()
    }

    fn get_info<'a>(&'a self, mod_id: &'a str) -> BoxFuture<'a, WeaverResult<CatalogEntry>> {
        async move {
            let project = self.project(mod_id).await?;
            let author = self.author_names(project.team.as_deref()).await;
            Ok(self.entry_from_project(project, author))
        }
        .boxed()
    }

    fn list_versions<'a>(
        &'a self,
        mod_id: &'a str,
    ) -> BoxFuture<'a, WeaverResult<Vec<CatalogVersion>>> {
        async move {
            let project = self.project(mod_id).await?;
            let lookups = project.versions.iter().map(|id| self.version(id));
            try_join_all(lookups).await
        }
        .boxed()
    }

    fn match_fingerprint<'a>(
        &'a self,
        file: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<FingerprintMatch>> {
        async move {
            let sha = sha1_file(file).await?;
            let dto: VersionDto = self
                .client
                .get_json(&format!("version_file/{sha}"), &[("algorithm", "sha1")])
                .await
                .map_err(|e| match e {
                    NetworkError::Http { status: 404, .. } => {
                        WeaverError::from(ProviderError::FingerprintUnmatched {
                            file: file.display().to_string(),
                        })
                    }
                    other => other.into(),
                })?;
            let version = dto.into_catalog_version()?;

            // name is best effort; the match itself already identifies the mod
            let name = self
                .project(&version.mod_id)
                .await
                .map(|p| p.title)
                .ok();

            Ok(FingerprintMatch {
                version,
                name,
                fingerprint: sha,
            })
        }
        .boxed()
    }

    fn fingerprint_file<'a>(&'a self, file: &'a Path) -> BoxFuture<'a, WeaverResult<String>> {
        async move { sha1_file(file).await }.boxed()
    }

    fn fetch_artifact<'a>(
        &'a self,
        version: &'a CatalogVersion,
        dest: &'a Path,
    ) -> BoxFuture<'a, WeaverResult<()>> {
        async move {
            let mut downloader = Downloader::new().url(&version.url).file(dest);
            for (name, value) in self.client.headers() {
                downloader = downloader.header(name.clone(), value.clone());
            }
            downloader.download().await?;
            Ok(())
        }
        .boxed()
    }
}

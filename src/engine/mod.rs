// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconciliation engine: the only component with side-effecting,
//! multi-step workflows.
//!
//! ```text
//! per operation:  load manifest -> network work -> apply -> save once
//!
//! state machine per mod:
//!   untracked -> tracked -> (pinned | unpinned) -> removed
//!
//! batch ops (upgrade, discover):
//!   per-mod futures, bounded by a Semaphore, cancellable between units
//!   outcomes collected; failures never abort the batch
//!   all staged updates applied in memory, then exactly one save
//!
//! failure rules:
//!   before fetch          manifest byte-for-byte unchanged, no save
//!   after fetch, pre-save fetched artifact discarded, no save
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EngineError, ProviderError, WeaverResult};
use crate::manifest::{Environment, Manifest, ManifestStore, TrackedMod};
use crate::provider::{CatalogEntry, CatalogVersion, ModProvider, ProviderKind};
use crate::resolver::resolve_latest_compatible;


/// Default bound on concurrently running provider calls within one batch.
const DEFAULT_CONCURRENCY: usize = 4;

/// Per-mod result of a batch or targeted `upgrade`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// A newer compatible version was installed.
    Updated { from: String, to: String },
    /// Already at the latest compatible version.
    UpToDate,
    /// Pinned mods are skipped explicitly, never silently.
    SkippedPinned,
    /// The batch was cancelled before this mod's unit of work started.
    Cancelled,
    /// This mod's upgrade failed; the rest of the batch continued.
    Failed(String),
}

/// Outcome of one mod within an `upgrade` call.
#[derive(Debug, Clone)]
pub struct UpgradeOutcome {
    pub mod_id: String,
    pub status: UpgradeStatus,
}

/// Read-only drift report produced by `outdated`.
#[derive(Debug, Clone)]
pub struct DriftReport {
    pub mod_id: String,
    pub installed: String,
    pub latest: String,
    /// Reported but never auto-acted on.
    pub pinned: bool,
}

/// A mod whose drift check failed at the provider. Collected, never fatal.
#[derive(Debug, Clone)]
pub struct CheckFailure {
    pub mod_id: String,
    pub reason: String,
}

/// Everything `outdated` has to say: drift plus per-mod check failures.
#[derive(Debug, Clone, Default)]
pub struct OutdatedReport {
    pub drift: Vec<DriftReport>,
    pub failures: Vec<CheckFailure>,
}

/// Per-file result of `discover`.
#[derive(Debug, Clone)]
pub enum DiscoverStatus {
    /// The file was identified and is now tracked.
    Tracked(TrackedMod),
    /// Already tracked by filename; left alone.
    AlreadyTracked,
    /// The catalog doesn't know this fingerprint; file left untouched.
    Unmatched,
    /// The batch was cancelled before this file was processed.
    Cancelled,
    Failed(String),
}

/// Outcome of one file within a `discover` call.
#[derive(Debug, Clone)]
pub struct DiscoverOutcome {
    pub file: PathBuf,
    pub status: DiscoverStatus,
}

/// A fetched-and-verified upgrade waiting to be applied to the manifest.
struct StagedUpdate {
    mod_id: String,
    old_filename: String,
    staging_path: PathBuf,
    final_path: PathBuf,
    version: CatalogVersion,
    fingerprint: String,
}

/// Orchestrates all manifest/artifact mutations against one provider.
///
/// Stateless between calls beyond the manifest on disk: every operation
/// performs its own load/save pair, which is also the serialization
/// boundary for concurrent invocations (last writer wins on the atomic
/// rename; real multi-process deployments need an external advisory lock).
pub struct ReconciliationEngine {
    store: ManifestStore,
    provider: Arc<dyn ModProvider>,
    concurrency: usize,
    cancel_token: CancellationToken,
}

impl ReconciliationEngine {
    /// Create an engine over a manifest store and a provider adapter.
    #[must_use]
    pub fn new(store: ManifestStore, provider: Arc<dyn ModProvider>) -> Self {
        Self {
            store,
            provider,
            concurrency: DEFAULT_CONCURRENCY,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Bound the number of concurrent provider calls in batch operations.
    #[must_use]
    pub const fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    /// Use an external cancellation token for cooperative cancellation.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Which provider this engine instance talks to.
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Directory the manifest and artifacts live in.
    #[must_use]
    pub fn workspace_dir(&self) -> PathBuf {
        self.store.workspace_dir()
    }

    /// Initialize a fresh workspace manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::AlreadyInitialized` unless `force` is set.
    pub fn init(&self, environment: Environment, force: bool) -> WeaverResult<Manifest> {
        let manifest = self.store.init(environment, force)?;
        info!(path = %self.store.path().display(), "workspace initialized");
        Ok(manifest)
    }

    /// Load the manifest for display.
    ///
    /// # Errors
    ///
    /// Fails on an uninitialized or corrupted manifest.
    pub fn list(&self) -> WeaverResult<Manifest> {
        self.store.load()
    }

    /// Catalog metadata for a mod. Read-only.
    ///
    /// # Errors
    ///
    /// Fails when the workspace is uninitialized or the mod is unknown
    /// upstream.
    pub async fn info(&self, mod_id: &str) -> WeaverResult<CatalogEntry> {
        self.store.load()?;
        self.provider.get_info(mod_id).await
    }

    /// Search the catalog, pre-filtered by the workspace environment.
    ///
    /// # Errors
    ///
    /// Fails when the provider does not support search.
    pub async fn search(&self, term: &str) -> WeaverResult<Vec<CatalogEntry>> {
        let manifest = self.store.load()?;
        self.provider.search(term, &manifest.environment).await
    }

    /// All published versions of a mod, newest first. When `all` is false,
    /// only versions compatible with the environment are returned.
    ///
    /// # Errors
    ///
    /// Fails when the mod is unknown upstream.
    pub async fn versions(&self, mod_id: &str, all: bool) -> WeaverResult<Vec<CatalogVersion>> {
        let manifest = self.store.load()?;
        let mut versions = self.provider.list_versions(mod_id).await?;
        if !all {
            versions.retain(|v| v.matches(&manifest.environment));
        }
        versions.sort_by(|a, b| b.released.cmp(&a.released).then_with(|| b.id.cmp(&a.id)));
        Ok(versions)
    }

    /// Track and install the latest compatible version of a mod.
    ///
    /// # Errors
    ///
    /// `AlreadyTracked` when (provider, id) is present;
    /// `NoCompatibleVersion` when nothing matches the environment;
    /// `FilenameConflict` when another tracked mod already owns the target
    /// filename; network and integrity failures leave the manifest
    /// unchanged.
    pub async fn add(&self, mod_id: &str) -> WeaverResult<TrackedMod> {
        let mut manifest = self.store.load()?;
        if manifest.is_tracked(self.provider.kind(), mod_id) {
            return Err(EngineError::AlreadyTracked {
                mod_id: mod_id.to_string(),
            }
            .into());
        }

        let versions = self.provider.list_versions(mod_id).await?;
        let best = resolve_latest_compatible(&manifest.environment, &versions)
            .ok_or_else(|| self.no_compatible(mod_id, &manifest.environment))?;
        if let Some(owner) = manifest.file_owner(&best.filename) {
            return Err(EngineError::FilenameConflict {
                filename: best.filename.clone(),
                owner: owner.id.clone(),
            }
            .into());
        }

        let dest = self.store.workspace_dir().join(&best.filename);
        let fingerprint = self.fetch_and_verify(mod_id, best, &dest).await?;

        let entry = TrackedMod {
            provider: self.provider.kind(),
            id: best.mod_id.clone(),
            version: best.id.clone(),
            filename: best.filename.clone(),
            fingerprint,
            pinned: false,
        };
        manifest.upsert(entry.clone());

        if let Err(e) = self.store.save(&manifest) {
            // never leave an artifact the manifest doesn't reference
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(e);
        }

        info!(mod_id, version = %best.version, file = %best.filename, "mod added");
        Ok(entry)
    }

    /// Stop tracking a mod and delete its artifact.
    ///
    /// The manifest entry is removed only after the file deletion succeeds
    /// (or the file is already absent); a failed deletion leaves the mod
    /// tracked rather than silently orphaning a file reference.
    ///
    /// # Errors
    ///
    /// `NotTracked` when the mod is absent; the manifest is unchanged on
    /// any failure.
    pub async fn remove(&self, mod_id: &str) -> WeaverResult<TrackedMod> {
        let mut manifest = self.store.load()?;
        let Some(tracked) = manifest.find(self.provider.kind(), mod_id).cloned() else {
            return Err(EngineError::NotTracked {
                mod_id: mod_id.to_string(),
            }
            .into());
        };

        let artifact = self.store.workspace_dir().join(&tracked.filename);
        match tokio::fs::remove_file(&artifact).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %artifact.display(), "artifact already absent");
            }
            Err(e) => return Err(e.into()),
        }

        manifest.remove(self.provider.kind(), mod_id);
        self.store.save(&manifest)?;
        info!(mod_id, file = %tracked.filename, "mod removed");
        Ok(tracked)
    }

    /// Set or clear the pinned flag. No network or filesystem effect.
    ///
    /// # Errors
    ///
    /// `NotTracked` when the mod is absent.
    pub fn set_pinned(&self, mod_id: &str, pinned: bool) -> WeaverResult<()> {
        let mut manifest = self.store.load()?;
        let Some(tracked) = manifest.find_mut(self.provider.kind(), mod_id) else {
            return Err(EngineError::NotTracked {
                mod_id: mod_id.to_string(),
            }
            .into());
        };
        tracked.pinned = pinned;
        self.store.save(&manifest)?;
        debug!(mod_id, pinned, "pin flag updated");
        Ok(())
    }

    /// Report every tracked mod whose installed version differs from the
    /// latest compatible one. Pure read; pinned mods are included and
    /// flagged, never acted on.
    ///
    /// # Errors
    ///
    /// Fails only on manifest problems; per-mod provider errors are
    /// collected as [`CheckFailure`]s, one mod's failure never hides the
    /// rest of the report.
    pub async fn outdated(&self) -> WeaverResult<OutdatedReport> {
        let manifest = self.store.load()?;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let checks = manifest
            .mods
            .iter()
            .filter(|m| m.provider == self.provider.kind())
            .map(|tracked| {
                let semaphore = Arc::clone(&semaphore);
                let environment = manifest.environment.clone();
                async move {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    match self.provider.list_versions(&tracked.id).await {
                        Ok(versions) => Ok(resolve_latest_compatible(&environment, &versions)
                            .filter(|best| best.id != tracked.version)
                            .map(|best| DriftReport {
                                mod_id: tracked.id.clone(),
                                installed: tracked.version.clone(),
                                latest: best.id.clone(),
                                pinned: tracked.pinned,
                            })),
                        Err(e) => {
                            warn!(mod_id = %tracked.id, error = %e, "outdated check failed");
                            Err(CheckFailure {
                                mod_id: tracked.id.clone(),
                                reason: e.to_string(),
                            })
                        }
                    }
                }
            });

        let results = futures_util::future::join_all(checks).await;
        let mut report = OutdatedReport::default();
        for result in results {
            match result {
                Ok(Some(drift)) => report.drift.push(drift),
                Ok(None) => {}
                Err(failure) => report.failures.push(failure),
            }
        }
        Ok(report)
    }

    /// Upgrade one mod, or every tracked mod of this provider when
    /// `mod_id` is `None`.
    ///
    /// All fetch/verify work runs first (concurrently, bounded); staged
    /// updates are then applied to the in-memory manifest and saved in
    /// exactly one write. One mod's failure never aborts the batch.
    ///
    /// # Errors
    ///
    /// `NotTracked` for a targeted upgrade of an absent mod; manifest
    /// load/save failures.
    pub async fn upgrade(&self, mod_id: Option<&str>) -> WeaverResult<Vec<UpgradeOutcome>> {
        let mut manifest = self.store.load()?;

        let targets: Vec<TrackedMod> = match mod_id {
            Some(id) => {
                let Some(tracked) = manifest.find(self.provider.kind(), id) else {
                    return Err(EngineError::NotTracked {
                        mod_id: id.to_string(),
                    }
                    .into());
                };
                vec![tracked.clone()]
            }
            None => manifest
                .mods
                .iter()
                .filter(|m| m.provider == self.provider.kind())
                .cloned()
                .collect(),
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let environment = manifest.environment.clone();

        let units = targets.iter().map(|tracked| {
            let semaphore = Arc::clone(&semaphore);
            let environment = environment.clone();
            async move {
                if self.cancel_token.is_cancelled() {
                    return (tracked, UpgradeStatus::Cancelled, None);
                }
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                if tracked.pinned {
                    return (tracked, UpgradeStatus::SkippedPinned, None);
                }
                match self.stage_upgrade(tracked, &environment).await {
                    Ok(Some(staged)) => {
                        let status = UpgradeStatus::Updated {
                            from: tracked.version.clone(),
                            to: staged.version.id.clone(),
                        };
                        (tracked, status, Some(staged))
                    }
                    Ok(None) => (tracked, UpgradeStatus::UpToDate, None),
                    Err(e) => (tracked, UpgradeStatus::Failed(e.to_string()), None),
                }
            }
        });

        let results = futures_util::future::join_all(units).await;

        // Apply phase: serialized, after all fetches completed.
        let mut outcomes = Vec::with_capacity(results.len());
        let mut dirty = false;
        for (tracked, status, staged) in results {
            if let Some(staged) = staged {
                if let Err(e) = self.apply_staged(&mut manifest, staged).await {
                    outcomes.push(UpgradeOutcome {
                        mod_id: tracked.id.clone(),
                        status: UpgradeStatus::Failed(e.to_string()),
                    });
                    continue;
                }
                dirty = true;
            }
            outcomes.push(UpgradeOutcome {
                mod_id: tracked.id.clone(),
                status,
            });
        }

        if dirty {
            self.store.save(&manifest)?;
        }
        Ok(outcomes)
    }

    /// Install an explicit version, skipping resolution entirely.
    ///
    /// The only path that may move a mod to an older version; callers are
    /// expected to `pin` afterwards to keep a later batch upgrade from
    /// reverting it.
    ///
    /// # Errors
    ///
    /// `VersionNotFound` when the catalog lacks that version;
    /// `FilenameConflict` when another tracked mod owns the target filename;
    /// network and integrity failures leave the manifest unchanged.
    pub async fn install_version(&self, mod_id: &str, version_id: &str) -> WeaverResult<TrackedMod> {
        let mut manifest = self.store.load()?;

        let versions = self.provider.list_versions(mod_id).await?;
        let Some(version) = versions.iter().find(|v| v.id == version_id) else {
            return Err(ProviderError::VersionNotFound {
                provider: self.provider.kind().to_string(),
                mod_id: mod_id.to_string(),
                version_id: version_id.to_string(),
            }
            .into());
        };

        let previous = manifest.find(self.provider.kind(), mod_id).cloned();
        if let Some(owner) = manifest.file_owner(&version.filename)
            && !(owner.provider == self.provider.kind() && owner.id == version.mod_id)
        {
            return Err(EngineError::FilenameConflict {
                filename: version.filename.clone(),
                owner: owner.id.clone(),
            }
            .into());
        }
        let dest = self.store.workspace_dir().join(&version.filename);
        let fingerprint = self.fetch_and_verify(mod_id, version, &dest).await?;

        let entry = TrackedMod {
            provider: self.provider.kind(),
            id: version.mod_id.clone(),
            version: version.id.clone(),
            filename: version.filename.clone(),
            fingerprint,
            pinned: previous.as_ref().is_some_and(|p| p.pinned),
        };
        manifest.upsert(entry.clone());

        if let Err(e) = self.store.save(&manifest) {
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(e);
        }

        // old artifact goes last, once the manifest references the new one
        if let Some(previous) = &previous
            && previous.filename != version.filename
        {
            let old_path = self.store.workspace_dir().join(&previous.filename);
            let _ = tokio::fs::remove_file(&old_path).await;
        }

        info!(mod_id, version = %version.version, "explicit version installed");
        Ok(entry)
    }

    /// Identify untracked artifact files by content fingerprint and start
    /// tracking them without fetching anything.
    ///
    /// Idempotent: files whose names the manifest already owns are skipped
    /// before hashing, so a rerun with no filesystem changes leaves the
    /// manifest identical.
    ///
    /// # Errors
    ///
    /// Fails only on manifest problems; per-file errors become outcomes.
    pub async fn discover(&self, files: &[PathBuf]) -> WeaverResult<Vec<DiscoverOutcome>> {
        let mut manifest = self.store.load()?;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let units = files.iter().map(|file| {
            let semaphore = Arc::clone(&semaphore);
            let tracked_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let known = manifest.is_file_tracked(&tracked_name);
            async move {
                if self.cancel_token.is_cancelled() {
                    return (file, tracked_name, DiscoverStatus::Cancelled);
                }
                if known {
                    return (file, tracked_name, DiscoverStatus::AlreadyTracked);
                }
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                match self.provider.match_fingerprint(file).await {
                    Ok(matched) => {
                        let entry = TrackedMod {
                            provider: self.provider.kind(),
                            id: matched.version.mod_id.clone(),
                            version: matched.version.id.clone(),
                            // keep the on-disk name, not the catalog's
                            filename: tracked_name.clone(),
                            fingerprint: matched.fingerprint,
                            pinned: false,
                        };
                        (file, tracked_name, DiscoverStatus::Tracked(entry))
                    }
                    Err(e) if is_unmatched(&e) => (file, tracked_name, DiscoverStatus::Unmatched),
                    Err(e) => (file, tracked_name, DiscoverStatus::Failed(e.to_string())),
                }
            }
        });

        let results = futures_util::future::join_all(units).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut dirty = false;
        for (file, _name, status) in results {
            if let DiscoverStatus::Tracked(entry) = &status {
                manifest.upsert(entry.clone());
                dirty = true;
            }
            outcomes.push(DiscoverOutcome {
                file: file.clone(),
                status,
            });
        }

        if dirty {
            self.store.save(&manifest)?;
        }
        Ok(outcomes)
    }

    // --- internals ---

    fn no_compatible(&self, mod_id: &str, environment: &Environment) -> crate::error::WeaverError {
        ProviderError::NoCompatibleVersion {
            mod_id: mod_id.to_string(),
            build: environment.build.clone(),
            loader: environment.loader.to_string(),
        }
        .into()
    }

    /// Fetch an artifact and verify it against the catalog's declared
    /// fingerprint. On any failure the fetched file is discarded.
    async fn fetch_and_verify(
        &self,
        mod_id: &str,
        version: &CatalogVersion,
        dest: &Path,
    ) -> WeaverResult<String> {
        self.provider.fetch_artifact(version, dest).await?;

        let actual = match self.provider.fingerprint_file(dest).await {
            Ok(actual) => actual,
            Err(e) => {
                let _ = tokio::fs::remove_file(dest).await;
                return Err(e);
            }
        };

        if let Some(expected) = &version.fingerprint
            && expected != &actual
        {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(EngineError::IntegrityMismatch {
                mod_id: mod_id.to_string(),
                expected: expected.clone(),
                actual,
            }
            .into());
        }

        Ok(actual)
    }

    /// Resolve and fetch one mod's upgrade into a staging path. `Ok(None)`
    /// means already up to date.
    async fn stage_upgrade(
        &self,
        tracked: &TrackedMod,
        environment: &Environment,
    ) -> WeaverResult<Option<StagedUpdate>> {
        let versions = self.provider.list_versions(&tracked.id).await?;
        let Some(best) = resolve_latest_compatible(environment, &versions) else {
            return Err(self.no_compatible(&tracked.id, environment));
        };
        if best.id == tracked.version {
            return Ok(None);
        }

        let dir = self.store.workspace_dir();
        let final_path = dir.join(&best.filename);
        let staging_path = dir.join(format!("{}.part", best.filename));
        let fingerprint = self
            .fetch_and_verify(&tracked.id, best, &staging_path)
            .await?;

        Ok(Some(StagedUpdate {
            mod_id: tracked.id.clone(),
            old_filename: tracked.filename.clone(),
            staging_path,
            final_path,
            version: best.clone(),
            fingerprint,
        }))
    }

    /// Move a staged artifact into place, drop the old artifact and update
    /// the manifest entry in memory. Serialized with every other mutation.
    async fn apply_staged(
        &self,
        manifest: &mut Manifest,
        staged: StagedUpdate,
    ) -> WeaverResult<()> {
        if let Some(owner) = manifest.file_owner(&staged.version.filename)
            && !(owner.provider == self.provider.kind() && owner.id == staged.mod_id)
        {
            let conflict = EngineError::FilenameConflict {
                filename: staged.version.filename.clone(),
                owner: owner.id.clone(),
            };
            let _ = tokio::fs::remove_file(&staged.staging_path).await;
            return Err(conflict.into());
        }

        let old_path = self.store.workspace_dir().join(&staged.old_filename);

        // rename refuses to clobber on some platforms; the old artifact is
        // going away either way
        if staged.old_filename == staged.version.filename && old_path.exists() {
            tokio::fs::remove_file(&old_path).await?;
        }
        if let Err(e) = tokio::fs::rename(&staged.staging_path, &staged.final_path).await {
            let _ = tokio::fs::remove_file(&staged.staging_path).await;
            return Err(e.into());
        }
        if staged.old_filename != staged.version.filename {
            match tokio::fs::remove_file(&old_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(file = %old_path.display(), error = %e, "couldn't delete old artifact"),
            }
        }

        if let Some(entry) = manifest.find_mut(self.provider.kind(), &staged.mod_id) {
            entry.version = staged.version.id.clone();
            entry.filename = staged.version.filename.clone();
            entry.fingerprint = staged.fingerprint;
        }
        info!(mod_id = %staged.mod_id, version = %staged.version.version, "mod upgraded");
        Ok(())
    }
}

/// Whether an error is the benign "fingerprint not in catalog" case.
fn is_unmatched(err: &crate::error::WeaverError) -> bool {
    matches!(
        err,
        crate::error::WeaverError::Provider(boxed)
            if matches!(**boxed, ProviderError::FingerprintUnmatched { .. })
    )
}

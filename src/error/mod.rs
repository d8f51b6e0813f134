// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            WeaverError (~24 bytes)
//!                  |
//!     +--------+---+----+--------+------+
//!     |        |        |        |      |
//!     v        v        v        v      v
//! Manifest Provider  Engine  Network  Io/Other
//!   Box      Box       Box     Box    Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Manifest Uninitialized, AlreadyInitialized, Corrupted, Io
//!   Provider ModNotFound, VersionNotFound, NoCompatibleVersion,
//!            FingerprintUnmatched, MissingToken, Unsupported
//!   Engine   AlreadyTracked, NotTracked, FilenameConflict,
//!            IntegrityMismatch, Cancelled
//!   Network  Http, Reqwest, RetriesExhausted, Interrupted, Io
//!
//! All variants boxed => WeaverError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`WeaverError`].
pub type WeaverResult<T> = std::result::Result<T, WeaverError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum WeaverError {
    /// Manifest load, save or parse failed.
    #[error("manifest error: {0}")]
    Manifest(#[from] Box<ManifestError>),

    /// Remote catalog reported a problem with a mod or version.
    #[error("provider error: {0}")]
    Provider(#[from] Box<ProviderError>),

    /// Reconciliation invariant violated.
    #[error("{0}")]
    Engine(#[from] Box<EngineError>),

    /// Network operation failed after retries.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for WeaverError {
                fn from(err: $error) -> Self {
                    WeaverError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ManifestError => Manifest,
    ProviderError => Provider,
    EngineError => Engine,
    NetworkError => Network,
    std::io::Error => Io,
}

// --- Manifest Errors ---

/// Errors from loading, parsing or saving the mod manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No manifest exists at the given path; `init` has not been run.
    #[error("no manifest found at '{path}' (run `modweaver init` first)")]
    Uninitialized { path: String },

    /// `init` refused to overwrite an existing manifest.
    #[error("manifest already exists at '{path}' (use --force to overwrite)")]
    AlreadyInitialized { path: String },

    /// The persisted manifest is unreadable or malformed. Always fatal;
    /// no operation touches the filesystem after seeing this.
    #[error("manifest at '{path}' is corrupted: {message}")]
    Corrupted { path: String, message: String },

    /// I/O failure while reading or replacing the manifest.
    #[error("manifest I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Provider Errors ---

/// Errors surfaced by a remote catalog.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The catalog has no mod under this identifier.
    #[error("no mod with id '{mod_id}' on {provider}")]
    ModNotFound { provider: String, mod_id: String },

    /// The catalog has the mod but not this version.
    #[error("mod '{mod_id}' has no version '{version_id}' on {provider}")]
    VersionNotFound {
        provider: String,
        mod_id: String,
        version_id: String,
    },

    /// No published version satisfies the environment's build + loader.
    #[error("no version of '{mod_id}' is compatible with {build}/{loader}")]
    NoCompatibleVersion {
        mod_id: String,
        build: String,
        loader: String,
    },

    /// Reverse lookup by content fingerprint found nothing.
    #[error("couldn't identify the mod in '{file}'")]
    FingerprintUnmatched { file: String },

    /// The catalog requires an authentication token that was not supplied.
    #[error("{provider} requires an authentication token (set {hint})")]
    MissingToken { provider: String, hint: String },

    /// The selected provider does not implement this capability.
    #[error("{provider} does not support {operation}")]
    Unsupported { provider: String, operation: String },
}

// --- Engine Errors ---

/// Reconciliation engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `add` on a (provider, mod id) pair already in the manifest.
    #[error("mod '{mod_id}' is already tracked")]
    AlreadyTracked { mod_id: String },

    /// Operation targeted a mod the manifest does not track.
    #[error("mod '{mod_id}' is not tracked")]
    NotTracked { mod_id: String },

    /// Two tracked mods may not share an artifact filename.
    #[error("artifact filename '{filename}' already belongs to mod '{owner}'")]
    FilenameConflict { filename: String, owner: String },

    /// Fetched artifact's fingerprint does not match the catalog's.
    #[error("artifact for '{mod_id}' failed integrity check: expected {expected}, got {actual}")]
    IntegrityMismatch {
        mod_id: String,
        expected: String,
        actual: String,
    },

    /// Batch operation was cancelled between per-mod units of work.
    #[error("operation cancelled")]
    Cancelled,
}

// --- Network Errors ---

/// Network operation errors.
///
/// Transient failures are retried inside [`crate::net`] with bounded
/// exponential backoff; only the post-budget failure surfaces here.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response (non-retryable statuses surface immediately).
    #[error("http error {status}: {url}")]
    Http { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Transient failures exhausted the retry budget.
    #[error("giving up on {url} after {attempts} attempts: {message}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        message: String,
    },

    /// Download was interrupted by user or signal.
    #[error("download interrupted")]
    Interrupted,

    /// I/O error during download.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests;

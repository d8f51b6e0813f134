// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network module with retrying JSON calls and async downloads.
//!
//! ```text
//! RemoteClient::new(base_url)
//!   .header() .max_attempts()
//!        |
//!        +-------------+
//!        v             v
//!    get_json()    post_json()
//!        |
//!        v
//!   attempt loop: transport error / 5xx / 429 -> backoff, retry
//!                 other 4xx -> NetworkError::Http immediately
//!
//! Downloader::new()
//!   .url() .file() .header() .progress() .silent()
//!        |
//!        v
//!   download() -> streamed to file, progress bar/spinner
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Interruption:  AtomicBool -> cleanup partial -> Interrupted
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use crate::error::NetworkError;

/// Result type for network operations, carrying the typed network error so
/// callers can match on HTTP status.
pub type NetResult<T> = std::result::Result<T, NetworkError>;

/// Number of attempts (first try + retries) for transient failures.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles per attempt.
const BASE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Global HTTP client - initialized once, reused across all requests.
/// Falls back to a basic client if custom configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("modweaver-rs/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Whether an HTTP status is worth retrying. Not-found, forbidden and other
/// client errors are definitive; server errors and throttling are not.
const fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Exponential backoff delay for the given zero-based attempt index.
fn backoff_delay(attempt: u32) -> Duration {
    BASE_RETRY_DELAY * 2u32.saturating_pow(attempt)
}

/// JSON API client bound to a base URL, with bounded retry.
///
/// Transient failures (transport errors, 5xx, 429) are retried with
/// exponential backoff up to the attempt budget; all other HTTP errors
/// surface immediately as [`NetworkError::Http`].
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    headers: Vec<(String, String)>,
    max_attempts: u32,
}

impl RemoteClient {
    /// Create a client for the given API base URL (trailing slash expected).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: global_client().clone(),
            base_url: base_url.into(),
            headers: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Add a header sent with every request (e.g. an authorization token).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the retry budget.
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Headers shared by every request from this client.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`NetworkError`] for definitive HTTP errors, or
    /// [`NetworkError::RetriesExhausted`] once the retry budget is spent.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> NetResult<T> {
        let url = self.url_for(path);
        self.request_with_retry(&url, || {
            let mut request = self.client.get(&url).query(query);
            for (name, value) in &self.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            request
        })
        .await
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Same error contract as [`Self::get_json`].
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> NetResult<T> {
        let url = self.url_for(path);
        self.request_with_retry(&url, || {
            let mut request = self.client.post(&url).json(body);
            for (name, value) in &self.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            request
        })
        .await
    }

    /// Attempt loop shared by GET and POST.
    async fn request_with_retry<T, F>(&self, url: &str, build: F) -> NetResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_message = String::new();

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(attempt - 1);
                debug!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                tokio::time::sleep(delay).await;
            }

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        trace!(url, status = status.as_u16(), "request ok");
                        return response.json::<T>().await.map_err(NetworkError::Reqwest);
                    }
                    if !is_retryable_status(status.as_u16()) {
                        return Err(NetworkError::Http {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                    warn!(url, status = status.as_u16(), "transient http error");
                    last_message = format!("http status {}", status.as_u16());
                }
                Err(e) => {
                    warn!(url, error = %e, "transport error");
                    last_message = e.to_string();
                }
            }
        }

        Err(NetworkError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            message: last_message,
        })
    }
}

/// RAII guard that removes a partial download file on Drop unless explicitly kept.
///
/// Ensures partial files are cleaned up on error paths, not just interrupts.
/// Blocking deletion is fine here: it is sub-millisecond and only runs on
/// error paths.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    /// Mark the download as complete - file will NOT be deleted on drop.
    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Pre-validated progress bar style for known file sizes.
fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} @ {binary_bytes_per_sec} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Pre-validated spinner style for unknown file sizes.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bytes} @ {binary_bytes_per_sec}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Progress display style for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Show a visual progress bar with speed and ETA
    #[default]
    Bar,
    /// Show a spinner (when total size is unknown)
    Spinner,
    /// No visual progress (silent mode)
    Silent,
}

/// Async HTTP downloader with builder pattern.
///
/// Streams the response body to a file; the file only survives a fully
/// successful download. Transient failures are retried like JSON calls.
///
/// # Example
/// ```ignore
/// use modweaver_rs::net::Downloader;
///
/// Downloader::new()
///     .url("https://cdn.modrinth.com/data/abc/sodium.jar")
///     .file("mods/sodium.jar")
///     .download()
///     .await?;
/// ```
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    headers: Vec<(String, String)>,
    interrupt: Arc<AtomicBool>,
    progress_display: ProgressDisplay,
    max_attempts: u32,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    /// Create a new downloader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            headers: Vec::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            progress_display: ProgressDisplay::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the URL to download from.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the output file path.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Add a custom header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the progress display style.
    #[must_use]
    pub const fn progress(mut self, style: ProgressDisplay) -> Self {
        self.progress_display = style;
        self
    }

    /// Disable progress display (silent mode).
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.progress_display = ProgressDisplay::Silent;
        self
    }

    /// Get a handle to the interrupt flag.
    /// Set to true to interrupt an in-progress download.
    #[must_use]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Create a progress bar for the download.
    fn create_progress_bar(&self, total_size: u64) -> Option<ProgressBar> {
        match self.progress_display {
            ProgressDisplay::Silent => None,
            ProgressDisplay::Spinner | ProgressDisplay::Bar if total_size == 0 => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                Some(pb)
            }
            ProgressDisplay::Bar => {
                let pb = ProgressBar::new(total_size);
                pb.set_style(bar_style());
                Some(pb)
            }
            ProgressDisplay::Spinner => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                Some(pb)
            }
        }
    }

    /// Download to the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The request fails or returns a non-success status after the
    ///   retry budget is spent.
    /// - Parent directories cannot be created.
    /// - The output file cannot be created or written to.
    /// - The download is interrupted.
    pub async fn download(&self) -> NetResult<()> {
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| NetworkError::RetriesExhausted {
                url: String::new(),
                attempts: 0,
                message: "no URL provided".to_string(),
            })?;
        let output = self
            .output_file
            .as_ref()
            .ok_or_else(|| NetworkError::RetriesExhausted {
                url: url.clone(),
                attempts: 0,
                message: "no output file specified".to_string(),
            })?;

        let mut last_message = String::new();

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(attempt - 1);
                debug!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying download");
                tokio::time::sleep(delay).await;
            }

            match self.try_download(url, output).await {
                Ok(()) => return Ok(()),
                // Interrupts and definitive client errors are not retried
                Err(e @ NetworkError::Interrupted) => return Err(e),
                Err(e @ NetworkError::Http { status, .. }) if !is_retryable_status(status) => {
                    return Err(e);
                }
                Err(e) => {
                    warn!(url, error = %e, "download attempt failed");
                    last_message = e.to_string();
                }
            }
        }

        Err(NetworkError::RetriesExhausted {
            url: url.clone(),
            attempts: self.max_attempts,
            message: last_message,
        })
    }

    /// One download attempt; partial output is removed on any failure.
    async fn try_download(&self, url: &str, output: &PathBuf) -> NetResult<()> {
        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(NetworkError::Reqwest)?;

        if !response.status().is_success() {
            return Err(NetworkError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        let progress_bar = self.create_progress_bar(total_size);

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(output).await?;

        // RAII guard ensures partial file cleanup on any error path
        let mut guard = PartialFileGuard::new(output.clone());

        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            if self.interrupt.load(Ordering::Relaxed) {
                if let Some(pb) = &progress_bar {
                    pb.abandon_with_message("interrupted");
                }
                // Guard will clean up the partial file on drop
                return Err(NetworkError::Interrupted);
            }

            let chunk = chunk.map_err(NetworkError::Reqwest)?;
            file.write_all(&chunk).await?;

            if let Some(pb) = &progress_bar {
                pb.inc(chunk.len() as u64);
            }
        }

        file.flush().await?;

        // Download successful - keep the file
        guard.keep();

        if let Some(pb) = progress_bar {
            pb.finish_with_message("done");
        }

        Ok(())
    }
}

// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content fingerprinting for mod artifacts.
//!
//! ```text
//! Modrinth:   SHA-1 over raw file bytes, lowercase hex
//! CurseForge: MurmurHash2 (seed 1) over file bytes with
//!             whitespace (TAB LF CR SPACE) stripped, decimal
//! ```
//!
//! Both fingerprints are carried in the manifest as strings; the provider
//! tag decides how to interpret them.

use std::path::Path;

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::error::WeaverResult;

/// Compute the lowercase hex SHA-1 of a byte slice.
#[must_use]
pub fn sha1_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the lowercase hex SHA-1 of a file, streaming in 8 KiB chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn sha1_file(path: &Path) -> WeaverResult<String> {
    let mut file = tokio::fs::File::open(path).await?;

    let mut hasher = Sha1::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Classic 32-bit `MurmurHash2`.
#[must_use]
pub fn murmur2(data: &[u8], seed: u32) -> u32 {
    const M: u32 = 0x5bd1_e995;
    const R: u32 = 24;

    #[allow(clippy::cast_possible_truncation)]
    let mut h: u32 = seed ^ (data.len() as u32);

    let mut chunks = data.chunks_exact(4);
    for chunk in chunks.by_ref() {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

/// CurseForge's artifact fingerprint: murmur2 with seed 1 over the file
/// bytes with whitespace (TAB, LF, CR, SPACE) removed.
#[must_use]
pub fn curseforge_fingerprint(data: &[u8]) -> u32 {
    let stripped: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !matches!(b, 9 | 10 | 13 | 32))
        .collect();
    murmur2(&stripped, 1)
}

/// CurseForge fingerprint of a file.
///
/// The whole file is read into memory; mod jars are small enough that the
/// whitespace-stripping pass dominates anyway.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn curseforge_fingerprint_file(path: &Path) -> WeaverResult<u32> {
    let data = tokio::fs::read(path).await?;
    Ok(curseforge_fingerprint(&data))
}

#[cfg(test)]
mod tests;

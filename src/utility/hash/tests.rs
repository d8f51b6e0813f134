// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{curseforge_fingerprint, curseforge_fingerprint_file, murmur2, sha1_bytes, sha1_file};
use crate::error::WeaverError;
use tempfile::TempDir;

#[test]
fn sha1_known_vector() {
    assert_eq!(
        sha1_bytes(b"abc"),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[tokio::test]
async fn sha1_file_matches_bytes() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("mod.jar");
    tokio::fs::write(&path, b"jar contents").await.expect("write");

    let from_file = sha1_file(&path).await.expect("hash file");
    assert_eq!(from_file, sha1_bytes(b"jar contents"));
}

#[tokio::test]
async fn hashing_a_missing_file_is_a_typed_io_error() {
    let missing = Path::new("/no/such/dir/mod.jar");

    let err = sha1_file(missing).await.expect_err("missing file");
    assert!(matches!(err, WeaverError::Io(_)), "{err}");

    let err = curseforge_fingerprint_file(missing)
        .await
        .expect_err("missing file");
    assert!(matches!(err, WeaverError::Io(_)), "{err}");
}

#[test]
fn murmur2_is_deterministic() {
    let a = murmur2(b"some mod bytes", 1);
    let b = murmur2(b"some mod bytes", 1);
    assert_eq!(a, b);
    assert_ne!(a, murmur2(b"other mod bytes", 1));
    assert_ne!(a, murmur2(b"some mod bytes", 2));
}

#[test]
fn curseforge_fingerprint_ignores_whitespace() {
    // TAB, LF, CR, SPACE must not affect the fingerprint
    assert_eq!(
        curseforge_fingerprint(b"a b\tc\nd\re"),
        curseforge_fingerprint(b"abcde")
    );
    assert_ne!(
        curseforge_fingerprint(b"abcde"),
        curseforge_fingerprint(b"abcdf")
    );
}

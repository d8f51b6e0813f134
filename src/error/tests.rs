// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{EngineError, ManifestError, ProviderError, WeaverError, WeaverResult};

#[test]
fn test_manifest_error_display() {
    let err = ManifestError::Uninitialized {
        path: ".mods.toml".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"no manifest found at '.mods.toml' (run `modweaver init` first)"
    );
}

#[test]
fn test_no_compatible_version_display() {
    let err = ProviderError::NoCompatibleVersion {
        mod_id: "sodium".to_string(),
        build: "1.17.1".to_string(),
        loader: "fabric".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"no version of 'sodium' is compatible with 1.17.1/fabric"
    );
}

#[test]
fn test_integrity_mismatch_display() {
    let err = EngineError::IntegrityMismatch {
        mod_id: "sodium".to_string(),
        expected: "aabb".to_string(),
        actual: "ccdd".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"artifact for 'sodium' failed integrity check: expected aabb, got ccdd"
    );
}

#[test]
fn test_weaver_error_size() {
    // WeaverError should be reasonably small
    // Box<str> variants are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<WeaverError>();
    assert!(size <= 24, "WeaverError is {size} bytes, expected <= 24");
}

#[test]
fn test_weaver_result_size() {
    let size = std::mem::size_of::<WeaverResult<()>>();
    assert!(size <= 24, "WeaverResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_sub_error_boxes_through_from() {
    let err: WeaverError = EngineError::NotTracked {
        mod_id: "abc".to_string(),
    }
    .into();
    assert!(matches!(err, WeaverError::Engine(_)));
}

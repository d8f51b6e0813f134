// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::CurseForge;
use crate::manifest::{Environment, Loader};
use crate::provider::ModProvider;
use crate::utility::hash::curseforge_fingerprint;

fn adapter(server: &MockServer) -> CurseForge {
    CurseForge::with_base_url(format!("{}/", server.uri()))
}

fn addon_json() -> serde_json::Value {
    json!([{
        "id": 238222,
        "name": "Just Enough Items",
        "authors": [{ "name": "mezz" }, { "name": "way2muchnoise" }],
        "websiteUrl": "https://www.curseforge.com/minecraft/mc-mods/jei",
        "summary": "item and recipe viewing",
        "categories": [{ "name": "Map and Information" }],
        "downloadCount": 1234.0,
        "sourceUrl": "https://github.com/mezz/JustEnoughItems"
    }])
}

fn file_json(id: u64, display: &str, game_version: &[&str]) -> serde_json::Value {
    json!({
        "id": id,
        "displayName": display,
        "fileName": format!("{display}.jar"),
        "downloadUrl": format!("https://edge.example.com/{display}.jar"),
        "fileDate": "2021-06-01T00:00:00Z",
        "gameVersion": game_version,
        "packageFingerprint": 123_456_789_u64
    })
}

#[tokio::test]
async fn get_info_parses_addon_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/addon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(addon_json()))
        .expect(1)
        .mount(&server)
        .await;

    let entry = adapter(&server).get_info("238222").await.expect("info");

    assert_eq!(entry.id, "238222");
    assert_eq!(entry.name, "Just Enough Items");
    assert_eq!(entry.author, "mezz, way2muchnoise");
    assert_eq!(entry.downloads, Some(1234));
    assert_eq!(entry.categories, vec!["Map and Information"]);
}

#[tokio::test]
async fn non_numeric_id_is_not_found_without_a_request() {
    let server = MockServer::start().await;
    // no mocks mounted; a request would 404 the mock server itself

    let err = adapter(&server).get_info("jei").await.expect_err("bad id");
    assert!(err.to_string().contains("no mod with id 'jei'"), "{err}");
}

#[tokio::test]
async fn empty_addon_response_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/addon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = adapter(&server).get_info("999999").await.expect_err("empty");
    assert!(err.to_string().contains("no mod with id"), "{err}");
}

#[tokio::test]
async fn list_versions_infers_loaders_from_game_version_markers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/addon/238222/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            file_json(1, "jei-fabric-8.0.0", &["1.17.1", "Fabric"]),
            file_json(2, "jei-forge-8.0.0", &["1.17.1", "Forge"]),
            file_json(3, "jei-ancient-1.0.0", &["1.7.10"]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let versions = adapter(&server).list_versions("238222").await.expect("files");
    assert_eq!(versions.len(), 3);

    let fabric = &versions[0];
    assert_eq!(fabric.id, "1");
    assert_eq!(fabric.loaders, vec!["fabric"]);
    assert_eq!(fabric.game_versions, vec!["1.17.1"], "markers are stripped");
    assert_eq!(fabric.fingerprint.as_deref(), Some("123456789"));

    assert_eq!(versions[1].loaders, vec!["forge"]);
    // files that predate loader tagging default to forge
    assert_eq!(versions[2].loaders, vec!["forge"]);
}

#[tokio::test]
async fn search_is_unsupported() {
    let server = MockServer::start().await;
    let environment = Environment {
        build: "1.17.1".to_string(),
        loader: Loader::Fabric,
    };

    let err = adapter(&server)
        .search("jei", &environment)
        .await
        .expect_err("unsupported");
    assert!(err.to_string().contains("does not support search"), "{err}");
}

#[tokio::test]
async fn match_fingerprint_resolves_exact_match() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("jei.jar");
    tokio::fs::write(&jar, b"jei bytes").await.expect("write");
    let expected = curseforge_fingerprint(b"jei bytes");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fingerprint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "exactMatches": [{
                "id": 238222,
                "file": file_json(1, "jei-fabric-8.0.0", &["1.17.1", "Fabric"])
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/addon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(addon_json()))
        .mount(&server)
        .await;

    let matched = adapter(&server).match_fingerprint(&jar).await.expect("match");

    assert_eq!(matched.version.mod_id, "238222");
    assert_eq!(matched.version.id, "1");
    assert_eq!(matched.name.as_deref(), Some("Just Enough Items"));
    assert_eq!(matched.fingerprint, expected.to_string());
}

#[tokio::test]
async fn match_fingerprint_guesses_name_when_addon_lookup_fails() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("jei.jar");
    tokio::fs::write(&jar, b"jei bytes").await.expect("write");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fingerprint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "exactMatches": [{
                "id": 238222,
                "file": file_json(1, "jei-fabric-8.0.0", &["1.17.1", "Fabric"])
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/addon"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let matched = adapter(&server).match_fingerprint(&jar).await.expect("match");
    assert_eq!(matched.name.as_deref(), Some("jei"));
}

#[tokio::test]
async fn unknown_fingerprint_maps_to_unmatched() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("mystery.jar");
    tokio::fs::write(&jar, b"not on curseforge").await.expect("write");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fingerprint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exactMatches": [] })))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .match_fingerprint(&jar)
        .await
        .expect_err("no match");
    assert!(err.to_string().contains("couldn't identify"), "{err}");
}

#[tokio::test]
async fn fingerprint_file_uses_whitespace_stripped_murmur2() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("jei.jar");
    tokio::fs::write(&jar, b"some \n jar\r\ncontent").await.expect("write");

    let server = MockServer::start().await;
    let fingerprint = adapter(&server).fingerprint_file(&jar).await.expect("hash");

    assert_eq!(
        fingerprint,
        curseforge_fingerprint(b"some \n jar\r\ncontent").to_string()
    );
    assert_eq!(
        fingerprint,
        curseforge_fingerprint(b"somejarcontent").to_string()
    );
}

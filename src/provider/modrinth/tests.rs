// modweaver-rs: Minecraft Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::Modrinth;
use crate::manifest::{Environment, Loader};
use crate::provider::{CatalogVersion, ModProvider};

// sha1("abc")
const ABC_SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";

fn env_1_17_fabric() -> Environment {
    Environment {
        build: "1.17.1".to_string(),
        loader: Loader::Fabric,
    }
}

fn adapter(server: &MockServer, token: Option<&str>) -> Modrinth {
    Modrinth::with_base_url(format!("{}/", server.uri()), token.map(ToString::to_string))
}

fn project_json() -> serde_json::Value {
    json!({
        "id": "AANobbMI",
        "slug": "sodium",
        "title": "Sodium",
        "description": "Modern rendering engine",
        "categories": ["optimization"],
        "downloads": 4200,
        "source_url": "https://github.com/CaffeineMC/sodium-fabric",
        "team": "team1",
        "versions": ["ver1", "ver2"]
    })
}

fn version_json(id: &str, number: &str, date: &str) -> serde_json::Value {
    json!({
        "id": id,
        "mod_id": "AANobbMI",
        "version_number": number,
        "files": [{
            "filename": format!("sodium-{number}.jar"),
            "url": format!("https://cdn.example.com/sodium-{number}.jar"),
            "hashes": { "sha1": ABC_SHA1 }
        }],
        "loaders": ["fabric"],
        "game_versions": ["1.17.1"],
        "date_published": date
    })
}

#[tokio::test]
async fn get_info_resolves_project_and_team_authors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/sodium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team/team1/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "user_id": "u1" }, { "user_id": "u2" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/u1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "JellySquid", "username": "jellysquid3" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/u2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": null, "username": "2no2name" })),
        )
        .mount(&server)
        .await;

    let entry = adapter(&server, None)
        .get_info("sodium")
        .await
        .expect("info");

    assert_eq!(entry.id, "AANobbMI");
    assert_eq!(entry.name, "Sodium");
    assert_eq!(entry.author, "JellySquid, 2no2name");
    assert_eq!(entry.website, "https://modrinth.com/mod/sodium");
    assert_eq!(entry.downloads, Some(4200));
}

#[tokio::test]
async fn get_info_survives_broken_team_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/sodium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team/team1/members"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let entry = adapter(&server, None)
        .get_info("sodium")
        .await
        .expect("info without authors");
    assert_eq!(entry.name, "Sodium");
    assert!(entry.author.is_empty());
}

#[tokio::test]
async fn unknown_mod_maps_to_mod_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/nope"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = adapter(&server, None)
        .get_info("nope")
        .await
        .expect_err("404");
    assert!(err.to_string().contains("no mod with id 'nope'"), "{err}");
}

#[tokio::test]
async fn unauthorized_maps_to_missing_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/private-mod"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = adapter(&server, None)
        .get_info("private-mod")
        .await
        .expect_err("401");
    assert!(err.to_string().contains("MODRINTH_TOKEN"), "{err}");
}

#[tokio::test]
async fn token_is_sent_as_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/sodium"))
        .and(header("Authorization", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team/team1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    adapter(&server, Some("secret-token"))
        .get_info("sodium")
        .await
        .expect("authorized");
}

#[tokio::test]
async fn list_versions_fans_out_over_the_id_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod/sodium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/version/ver1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(version_json("ver1", "0.3.3", "2021-01-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/version/ver2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(version_json("ver2", "0.3.4", "2021-06-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let versions = adapter(&server, None)
        .list_versions("sodium")
        .await
        .expect("versions");

    assert_eq!(versions.len(), 2);
    let ver2 = versions.iter().find(|v| v.id == "ver2").expect("ver2");
    assert_eq!(ver2.mod_id, "AANobbMI");
    assert_eq!(ver2.version, "0.3.4");
    assert_eq!(ver2.filename, "sodium-0.3.4.jar");
    assert_eq!(ver2.fingerprint.as_deref(), Some(ABC_SHA1));
    assert_eq!(ver2.loaders, vec!["fabric"]);
}

#[tokio::test]
async fn search_sends_environment_facets_and_strips_local_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mod"))
        .and(query_param("query", "sodium"))
        .and(query_param(
            "facets",
            "[[\"versions:1.17.1\"],[\"categories:fabric\"]]",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{
                "mod_id": "local-AANobbMI",
                "title": "Sodium",
                "author": "jellysquid3",
                "page_url": "https://modrinth.com/mod/sodium",
                "description": "Modern rendering engine",
                "categories": ["optimization"]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = adapter(&server, None)
        .search("sodium", &env_1_17_fabric())
        .await
        .expect("search");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "AANobbMI");
    assert_eq!(hits[0].author, "jellysquid3");
}

#[tokio::test]
async fn match_fingerprint_looks_up_by_sha1() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("sodium.jar");
    tokio::fs::write(&jar, b"abc").await.expect("write");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/version_file/{ABC_SHA1}")))
        .and(query_param("algorithm", "sha1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(version_json("ver2", "0.3.4", "2021-06-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mod/AANobbMI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team/team1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let matched = adapter(&server, None)
        .match_fingerprint(&jar)
        .await
        .expect("match");

    assert_eq!(matched.version.id, "ver2");
    assert_eq!(matched.version.mod_id, "AANobbMI");
    assert_eq!(matched.name.as_deref(), Some("Sodium"));
    assert_eq!(matched.fingerprint, ABC_SHA1);
}

#[tokio::test]
async fn unknown_fingerprint_maps_to_unmatched() {
    let temp = TempDir::new().expect("temp dir");
    let jar = temp.path().join("mystery.jar");
    tokio::fs::write(&jar, b"not in the catalog").await.expect("write");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = adapter(&server, None)
        .match_fingerprint(&jar)
        .await
        .expect_err("unmatched");
    assert!(err.to_string().contains("couldn't identify"), "{err}");
}

#[tokio::test]
async fn fetch_artifact_streams_to_dest_with_auth_header() {
    let temp = TempDir::new().expect("temp dir");
    let dest = temp.path().join("sodium-0.3.4.jar");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn/sodium-0.3.4.jar"))
        .and(header("Authorization", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let version = CatalogVersion {
        mod_id: "AANobbMI".to_string(),
        id: "ver2".to_string(),
        version: "0.3.4".to_string(),
        filename: "sodium-0.3.4.jar".to_string(),
        url: format!("{}/cdn/sodium-0.3.4.jar", server.uri()),
        fingerprint: None,
        loaders: vec!["fabric".to_string()],
        game_versions: vec!["1.17.1".to_string()],
        released: chrono::Utc::now(),
    };

    adapter(&server, Some("secret-token"))
        .fetch_artifact(&version, &dest)
        .await
        .expect("download");

    let bytes = tokio::fs::read(&dest).await.expect("artifact");
    assert_eq!(bytes, b"jar bytes");
}

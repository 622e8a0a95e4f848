//! End-to-end verification tests against a local HTTP server.
//!
//! The server stands in for both the GitHub API and documentation hosts,
//! so reachability, 404 handling, and batch isolation are exercised
//! without touching the network.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use toolshed_core::registry::{load_entries, VerificationStatus};
use toolshed_core::schema::SchemaStore;
use toolshed_core::verify::Verifier;

fn repo_schema_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.join("schemas")
}

/// Minimal HTTP/1.1 server. Knows the GitHub repos endpoint for
/// `good/tool` and a `/docs` page; everything else is a 404.
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let response = match path.as_str() {
                    "/repos/good/tool" => {
                        let body = json!({
                            "stargazers_count": 120,
                            "forks_count": 10,
                            "watchers_count": 120,
                            "open_issues_count": 4,
                            "pushed_at": "2026-05-20T10:00:00Z",
                            "language": "Rust",
                            "license": {"spdx_id": "MIT"},
                            "archived": false,
                            "disabled": false,
                            "private": false,
                            "fork": false,
                            "topics": ["streaming", "remote-play"]
                        })
                        .to_string();
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    }
                    "/repos/archived/tool" => {
                        let body = json!({
                            "stargazers_count": 40,
                            "forks_count": 2,
                            "pushed_at": "2020-01-05T10:00:00Z",
                            "language": "Python",
                            "archived": true,
                            "disabled": false,
                            "private": false
                        })
                        .to_string();
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    }
                    "/docs" => {
                        "HTTP/1.1 200 OK\r\ncontent-type: text/html; charset=utf-8\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                            .to_string()
                    }
                    "/manual.pdf" => {
                        "HTTP/1.1 200 OK\r\ncontent-type: application/pdf\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                            .to_string()
                    }
                    _ => {
                        let body = r#"{"message":"Not Found"}"#;
                        format!(
                            "HTTP/1.1 404 Not Found\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    }
                };

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

fn write_tool(dir: &Path, rel: &str, value: &Value) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn verifier(store: &SchemaStore, base: &str) -> Verifier {
    Verifier::new(store, Some(std::time::Duration::from_secs(2)))
        .unwrap()
        .with_github_api_base(base)
}

#[tokio::test]
async fn reachable_repository_verifies_and_updates_entry() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/good.json",
        &json!({
            "name": "Good Tool",
            "slug": "good-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "A tool whose repository responds",
            "documentation": format!("{base}/docs"),
            "license": "MIT",
            "tags": ["utility"],
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 2, true)
        .await;

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Verified);
    assert!(outcome.repository_reachable);
    assert!(outcome.issues.is_empty(), "{:?}", outcome.issues);

    let docs = outcome.documentation.as_ref().unwrap();
    assert!(docs.reachable);
    assert_eq!(docs.status_code, Some(200));
    assert!(docs.content_type.as_deref().unwrap().contains("text/html"));

    let metrics = outcome.metrics.as_ref().unwrap();
    assert_eq!(metrics.stars, 120);
    assert_eq!(metrics.forks, 10);
    assert_eq!(metrics.last_commit.as_deref(), Some("2026-05-20"));

    let details = outcome.details.as_ref().unwrap();
    assert_eq!(details.watchers, 120);
    assert_eq!(details.open_issues, 4);
    assert_eq!(details.language.as_deref(), Some("Rust"));
    assert_eq!(details.license.as_deref(), Some("MIT"));
    assert!(!details.fork);
    assert_eq!(details.topics, vec!["streaming", "remote-play"]);

    // Update mode persisted the verification block and backfilled language
    let reloaded = load_entries(tmp.path()).unwrap();
    let raw = &reloaded.entries[0].raw;
    assert_eq!(raw["verification"]["status"], "verified");
    assert_eq!(raw["verification"]["method"], "automated");
    assert_eq!(raw["metrics"]["stars"], 120);
    assert_eq!(raw["language"], "Rust");
}

#[tokio::test]
async fn missing_repository_fails_without_clobbering_metrics() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/gone.json",
        &json!({
            "name": "Gone Tool",
            "slug": "gone-tool",
            "repository": "https://github.com/missing/tool",
            "short-description": "A tool whose repository is gone",
            "compatibility": {"platforms": ["windows"]},
            "metrics": {"stars": 7, "forks": 1, "last_commit": "2024-01-01"}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 2, true)
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Failed);
    assert!(!outcome.repository_reachable);
    assert!(outcome.details.is_none());
    assert!(outcome
        .issues
        .iter()
        .any(|issue| issue.contains("404")), "{:?}", outcome.issues);

    // Stale metrics stay as authored when the fetch fails
    let reloaded = load_entries(tmp.path()).unwrap();
    let raw = &reloaded.entries[0].raw;
    assert_eq!(raw["verification"]["status"], "failed");
    assert_eq!(raw["metrics"]["stars"], 7);
}

#[tokio::test]
async fn deprecated_entries_are_skipped_untouched() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/old.json",
        &json!({
            "name": "Old Tool",
            "slug": "old-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "Once useful",
            "compatibility": {"platforms": ["windows"]},
            "deprecated": true
        }),
    );
    let before = std::fs::read_to_string(tmp.path().join("utilities/old.json")).unwrap();

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 2, true)
        .await;

    let outcome = &outcomes[0];
    assert!(outcome.skipped);
    assert_eq!(outcome.status, VerificationStatus::Deprecated);

    let after = std::fs::read_to_string(tmp.path().join("utilities/old.json")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn archived_repository_is_flagged_but_still_verified() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/archived.json",
        &json!({
            "name": "Archived Tool",
            "slug": "archived-tool",
            "repository": "https://github.com/archived/tool",
            "short-description": "Still reachable, no longer developed",
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 2, false)
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Verified);
    assert!(outcome
        .issues
        .iter()
        .any(|issue| issue.contains("archived")));
}

#[tokio::test]
async fn non_html_documentation_is_flagged() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/pdf-docs.json",
        &json!({
            "name": "Pdf Docs Tool",
            "slug": "pdf-docs-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "Documented only as a PDF",
            "documentation": format!("{base}/manual.pdf"),
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 2, false)
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Verified);

    let docs = outcome.documentation.as_ref().unwrap();
    assert!(docs.reachable);
    assert_eq!(docs.content_type.as_deref(), Some("application/pdf"));
    assert!(outcome
        .issues
        .iter()
        .any(|issue| issue.contains("may not be HTML")), "{:?}", outcome.issues);
}

#[tokio::test]
async fn transport_error_is_retried_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // First connection dropped before any response; the retry is served.
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);

        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let body = json!({
            "stargazers_count": 9,
            "forks_count": 1,
            "pushed_at": "2026-05-20T10:00:00Z"
        })
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    let base = format!("http://{addr}");
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/flaky.json",
        &json!({
            "name": "Flaky Tool",
            "slug": "flaky-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "First connection attempt is dropped",
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 1, false)
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Verified, "{:?}", outcome.issues);
    assert_eq!(outcome.metrics.as_ref().unwrap().stars, 9);
}

#[tokio::test]
async fn stalled_response_times_out_and_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Never answers within the client timeout, on any attempt.
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                    .await;
            });
        }
    });

    let base = format!("http://{addr}");
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/stalled.json",
        &json!({
            "name": "Stalled Tool",
            "slug": "stalled-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "Repository host never answers in time",
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let verifier = Verifier::new(&store, Some(std::time::Duration::from_millis(300)))
        .unwrap()
        .with_github_api_base(&base);
    let outcomes = verifier.verify_batch(report.entries, 1, false).await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, VerificationStatus::Failed);
    assert!(
        outcome.issues.iter().any(|issue| issue.contains("timeout")),
        "{:?}",
        outcome.issues
    );
}

#[tokio::test]
async fn batch_failures_stay_isolated() {
    let base = spawn_server().await;
    let store = SchemaStore::load(&repo_schema_dir()).unwrap();
    let tmp = TempDir::new().unwrap();

    write_tool(
        tmp.path(),
        "utilities/good.json",
        &json!({
            "name": "Good Tool",
            "slug": "good-tool",
            "repository": "https://github.com/good/tool",
            "short-description": "Responds fine",
            "compatibility": {"platforms": ["windows"]}
        }),
    );
    write_tool(
        tmp.path(),
        "utilities/gone.json",
        &json!({
            "name": "Gone Tool",
            "slug": "gone-tool",
            "repository": "https://github.com/missing/tool",
            "short-description": "Does not respond",
            "compatibility": {"platforms": ["windows"]}
        }),
    );

    let report = load_entries(tmp.path()).unwrap();
    let outcomes = verifier(&store, &base)
        .verify_batch(report.entries, 4, false)
        .await;

    // Sorted by file path regardless of completion order
    assert_eq!(outcomes[0].file, "utilities/gone.json");
    assert_eq!(outcomes[1].file, "utilities/good.json");
    assert_eq!(outcomes[0].status, VerificationStatus::Failed);
    assert_eq!(outcomes[1].status, VerificationStatus::Verified);
}

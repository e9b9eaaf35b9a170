#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Empty config file so a user's own config never leaks into tests.
fn empty_config() -> &'static Path {
    static CONFIG: OnceLock<(TempDir, std::path::PathBuf)> = OnceLock::new();
    let (_, path) = CONFIG.get_or_init(|| {
        let dir = tempfile::tempdir().expect("failed to create config dir for tests");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").expect("failed to write empty config");
        (dir, path)
    });
    path
}

/// Create a configured `docex` command suitable for integration tests.
#[allow(dead_code)]
pub fn docex_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docex"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("DOCEX_TOKEN");
    cmd.env_remove("DOCEX_BASE_URL");
    cmd.env("DOCEX_CONFIG", empty_config());
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Serve `categories` as the only page of the category listing.
#[allow(dead_code)]
pub async fn mount_categories(server: &MockServer, categories: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/categories"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

//! End-to-end checks of the `folio` binary

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    let workdir = tempfile::tempdir().unwrap();
    cmd.current_dir(workdir.keep())
        .env_remove("FOLIO_API_URL")
        .env_remove("VITE_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_reveal_replays_scroll_sequence() {
    folio()
        .args([
            "reveal",
            "--viewport",
            "1000",
            "--section",
            "main:0:700",
            "--section",
            "services:900:600",
            "--section",
            "research:2400:500",
            "--scroll",
            "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("revealed main at scroll 0"))
        .stdout(predicate::str::contains("revealed services at scroll 500"))
        .stdout(predicate::str::contains("still hidden: research"));
}

#[test]
fn test_reveal_fails_open_without_viewport() {
    folio()
        .args(["reveal", "--viewport", "0", "--section", "contact:5000:400"])
        .assert()
        .success()
        .stdout(predicate::str::contains("all sections shown"))
        .stdout(predicate::str::contains("still hidden").not());
}

#[test]
fn test_submit_rejects_empty_name() {
    folio()
        .args([
            "submit",
            "--name",
            "",
            "--email",
            "ada@example.com",
            "--message",
            "Hi",
            "--api-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_against_stub_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let assert = tokio::task::spawn_blocking(move || {
        folio()
            .args([
                "submit",
                "--name",
                "Ada",
                "--email",
                "ada@example.com",
                "--message",
                "Hi",
                "--api-url",
                uri.as_str(),
            ])
            .assert()
    })
    .await
    .unwrap();

    assert.success().stdout(predicate::str::contains("Message Sent!"));
}

#[test]
fn test_config_prints_defaults() {
    folio()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[contact]"))
        .stdout(predicate::str::contains("reset_delay_ms = 3000"));
}

#[test]
fn test_zero_request_timeout_refuses_to_start() {
    folio()
        .env("FOLIO_CONTACT__REQUEST_TIMEOUT_MS", "0")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("request_timeout_ms"));
}

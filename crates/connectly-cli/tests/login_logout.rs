//! Integration tests for the authentication lifecycle.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

use assert_cmd::Command;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connectly(home: &Path, base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("connectly").unwrap();
    cmd.env("CONNECTLY_HOME", home).env("CONNECTLY_BASE_URL", base_url);
    cmd
}

fn seed_session(home: &Path) {
    fs::create_dir_all(home).unwrap();
    fs::write(home.join("session.json"), r#"{"token": "abc123"}"#).unwrap();
}

/// Test: login against a service issuing a token stores the session and
/// makes protected navigation allowed.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_token_and_unlocks_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args(["login", "--email", "a@b.com", "--password", "secret1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as a@b.com"));

    let session_path = temp.path().join("session.json");
    assert!(session_path.exists(), "session.json should exist");
    let contents = fs::read_to_string(&session_path).unwrap();
    assert!(contents.contains("abc123"), "token should be persisted");

    // Navigation to a protected screen is now allowed.
    connectly(temp.path(), &server.uri())
        .arg("profile")
        .assert()
        .success();
}

/// Test: the remote rejection message is surfaced, and no session is stored.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect password"))
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args(["login", "--email", "a@b.com", "--password", "wrong-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    assert!(!temp.path().join("session.json").exists());
}

/// Test: a 2xx response with an unparsable body is an error, not a crash.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>welcome!</html>"))
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args(["login", "--email", "a@b.com", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed response"));

    assert!(!temp.path().join("session.json").exists());
}

/// Test: a password/confirmation mismatch fails locally and performs no
/// network call at all.
#[tokio::test(flavor = "multi_thread")]
async fn test_register_password_mismatch_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "abc123"})))
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args([
            "register",
            "--first-name",
            "Jane",
            "--last-name",
            "Smith",
            "--email",
            "jane@example.com",
            "--password",
            "secret1",
            "--confirm-password",
            "secret2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("do not match"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no request should reach the service");
    assert!(!temp.path().join("session.json").exists());
}

/// Test: successful registration signs the new account in.
#[tokio::test(flavor = "multi_thread")]
async fn test_register_stores_token() {
    let server = MockServer::start().await;
    let expected_body = json!({
        "firstName": "Jane",
        "lastName": "Smith",
        "email": "jane@example.com",
        "password": "secret1",
    });
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json_string(expected_body.to_string()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "fresh-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args([
            "register",
            "--first-name",
            "Jane",
            "--last-name",
            "Smith",
            "--email",
            "jane@example.com",
            "--password",
            "secret1",
            "--confirm-password",
            "secret1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Connectly"));

    let contents = fs::read_to_string(temp.path().join("session.json")).unwrap();
    assert!(contents.contains("fresh-token"));
}

/// Test: logout clears the session, and doing it again is still a success.
#[test]
fn test_logout_is_idempotent() {
    let temp = tempdir().unwrap();
    seed_session(temp.path());

    let mut cmd = Command::cargo_bin("connectly").unwrap();
    cmd.env("CONNECTLY_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!temp.path().join("session.json").exists());

    let mut cmd = Command::cargo_bin("connectly").unwrap();
    cmd.env("CONNECTLY_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}

/// Test: whoami reflects the session without touching the network.
#[test]
fn test_whoami_reports_session_state() {
    let temp = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("connectly").unwrap();
    cmd.env("CONNECTLY_HOME", temp.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Anonymous"));

    seed_session(temp.path());
    let mut cmd = Command::cargo_bin("connectly").unwrap();
    cmd.env("CONNECTLY_HOME", temp.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in."));
}

/// Test: the password can be supplied on stdin instead of a flag.
#[tokio::test(flavor = "multi_thread")]
async fn test_login_reads_password_from_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    let mut child = StdCommand::cargo_bin("connectly")
        .unwrap()
        .env("CONNECTLY_HOME", temp.path())
        .env("CONNECTLY_BASE_URL", server.uri())
        .args(["login", "--email", "a@b.com"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin.write_all(b"secret1\n").expect("Failed to write to stdin");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    assert!(output.status.success(), "Command failed: {output:?}");
    assert!(temp.path().join("session.json").exists());
}

/// Test: session.json has restricted permissions on Unix.
#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_session_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    connectly(temp.path(), &server.uri())
        .args(["login", "--email", "a@b.com", "--password", "secret1"])
        .assert()
        .success();

    let mode = fs::metadata(temp.path().join("session.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600, "session.json should have 0600 permissions");
}

//! OsascriptRunner against a stand-in `osascript` script.
#![cfg(unix)]

mod common;

use std::path::Path;

use add_trusted_cert::platform::{ElevatedCommand, ElevatedRunner, OsascriptRunner};
use add_trusted_cert::{compile, execute, ElevationError, TrustError, TrustRequest};

/// Shell snippet that sets `$errfile` to the redirect target in the AppleScript (`-e "$2"`).
const ERRFILE: &str = r#"errfile=$(printf '%s\n' "$2" | sed -n "s/.* 2>'\([^']*\)'.*/\1/p")"#;

fn security_cmd() -> ElevatedCommand {
    ElevatedCommand {
        program: "security".into(),
        args: compile(&TrustRequest::new().admin(), Path::new("/tmp/a.pem")).into_args(),
        prompt: "Install dev CA".into(),
    }
}

fn runner(dir: &Path, body: &str) -> OsascriptRunner {
    let script = common::write_script(dir, "osascript", body);
    OsascriptRunner::new(script.to_string_lossy())
}

#[tokio::test]
async fn success_returns_stdout() {
    let dir = common::temp_home();
    let r = runner(dir.path(), "echo 'certificate added'");
    let out = r.run(&security_cmd()).await.unwrap();
    assert_eq!(out.stdout, "certificate added\n");
    assert_eq!(out.stderr, "");
}

#[tokio::test]
async fn script_carries_command_and_prompt() {
    let dir = common::temp_home();
    let r = runner(dir.path(), r#"printf '%s' "$2""#);
    let out = r.run(&security_cmd()).await.unwrap();
    assert!(out.stdout.starts_with(
        "do shell script \"security add-trusted-cert -d -k /Library/Keychains/System.keychain /tmp/a.pem 2>'"
    ));
    assert!(out
        .stdout
        .ends_with("with prompt \"Install dev CA\" with administrator privileges without altering line endings"));
}

#[tokio::test]
async fn tool_stderr_is_captured_on_success() {
    let dir = common::temp_home();
    let body = format!(
        "{ERRFILE}\necho 'SecTrustSettingsSetTrustSettings: The authorization was denied.' > \"$errfile\"\necho done"
    );
    let r = runner(dir.path(), &body);

    let out = r.run(&security_cmd()).await.unwrap();
    assert_eq!(out.stdout, "done\n");
    assert_eq!(
        out.stderr,
        "SecTrustSettingsSetTrustSettings: The authorization was denied.\n"
    );

    let inv = compile(&TrustRequest::new(), Path::new("/tmp/a.pem"));
    let err = execute(&r, &inv, "security", "Install dev CA")
        .await
        .unwrap_err();
    match err {
        TrustError::Tool(text) => {
            assert_eq!(text, "SecTrustSettingsSetTrustSettings: The authorization was denied.\n")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_dialog_is_declined() {
    let dir = common::temp_home();
    let r = runner(
        dir.path(),
        "echo '0:120: execution error: User canceled. (-128)' >&2\nexit 1",
    );
    let err = r.run(&security_cmd()).await.unwrap_err();
    assert!(matches!(err, ElevationError::Declined));
}

#[tokio::test]
async fn other_failure_mentioning_128_is_not_a_cancel() {
    let dir = common::temp_home();
    let r = runner(
        dir.path(),
        "echo '0:99: execution error: Error reading file /tmp/build-128/ca.pem (1)' >&2\nexit 1",
    );
    match r.run(&security_cmd()).await.unwrap_err() {
        ElevationError::Failed { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert_eq!(
                stderr,
                "0:99: execution error: Error reading file /tmp/build-128/ca.pem (1)\n"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failing_tool_reports_its_own_stderr() {
    let dir = common::temp_home();
    let body = format!(
        "{ERRFILE}\necho 'SecCertificateCreateFromData: Unknown format in import.' > \"$errfile\"\necho '0:99: execution error:  (1)' >&2\nexit 1"
    );
    let r = runner(dir.path(), &body);
    match r.run(&security_cmd()).await.unwrap_err() {
        ElevationError::Failed { stderr, .. } => {
            assert_eq!(stderr, "SecCertificateCreateFromData: Unknown format in import.\n");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_osascript_is_spawn_error() {
    let r = OsascriptRunner::new("/nonexistent/osascript");
    let err = r.run(&security_cmd()).await.unwrap_err();
    assert!(matches!(err, ElevationError::Spawn { .. }));
}

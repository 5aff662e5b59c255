//! Shared test helpers.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use add_trusted_cert::platform::{ElevatedCommand, ElevatedRunner, RunOutput};
use add_trusted_cert::ElevationError;
use tempfile::TempDir;

/// Create a temp directory for use as ADD_TRUSTED_CERT_HOME.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("atc_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| Path::new(".").into()))
        .expect("temp dir")
}

/// Write an executable shell script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a freshly generated self-signed PEM certificate into `dir`.
pub fn write_test_cert(dir: &Path) -> PathBuf {
    let rcgen::CertifiedKey { cert, .. } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let path = dir.join("test-ca.pem");
    std::fs::write(&path, cert.pem()).unwrap();
    path
}

type Response = Box<dyn Fn() -> Result<RunOutput, ElevationError> + Send + Sync>;

/// Runner that records every command and answers with a canned response.
pub struct MockRunner {
    calls: Mutex<Vec<ElevatedCommand>>,
    respond: Response,
}

impl MockRunner {
    pub fn new(
        respond: impl Fn() -> Result<RunOutput, ElevationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Succeeds with the given streams.
    pub fn output(stdout: &'static str, stderr: &'static str) -> Self {
        Self::new(move || {
            Ok(RunOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            })
        })
    }

    pub fn calls(&self) -> Vec<ElevatedCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl ElevatedRunner for MockRunner {
    async fn run(&self, cmd: &ElevatedCommand) -> Result<RunOutput, ElevationError> {
        self.calls.lock().unwrap().push(cmd.clone());
        (self.respond)()
    }
}

//! Platform abstraction for running the trust tool with elevated privileges.

use std::future::Future;
use std::process::Output;

use serde::Deserialize;
use tokio::process::Command;

use crate::error::ElevationError;

pub mod osascript;

pub use osascript::OsascriptRunner;

/// A program invocation that may need administrator rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatedCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Label shown in the authentication dialog.
    pub prompt: String,
}

impl ElevatedCommand {
    /// Program and arguments joined by spaces, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a command, elevating privileges as needed.
pub trait ElevatedRunner: Send + Sync {
    fn run(
        &self,
        cmd: &ElevatedCommand,
    ) -> impl Future<Output = Result<RunOutput, ElevationError>> + Send;
}

/// How to obtain privileges for the trust tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Elevation {
    /// Run directly when already root, otherwise ask via the macOS dialog.
    #[default]
    Auto,
    /// Always ask via `osascript ... with administrator privileges`.
    Osascript,
    /// Never elevate.
    None,
}

/// Runs the program as-is with the current privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner;

impl ElevatedRunner for DirectRunner {
    async fn run(&self, cmd: &ElevatedCommand) -> Result<RunOutput, ElevationError> {
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .output()
            .await
            .map_err(|source| ElevationError::Spawn {
                program: cmd.program.clone(),
                source,
            })?;
        completed(&cmd.program, output)
    }
}

/// Turn a finished process into its output, or an error when it exited unsuccessfully.
pub(crate) fn completed(program: &str, output: Output) -> Result<RunOutput, ElevationError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        return Err(ElevationError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }
    Ok(RunOutput { stdout, stderr })
}

/// Runner picked from an [`Elevation`] setting.
#[derive(Debug, Clone)]
pub enum DefaultRunner {
    Direct(DirectRunner),
    Osascript(OsascriptRunner),
}

impl ElevatedRunner for DefaultRunner {
    async fn run(&self, cmd: &ElevatedCommand) -> Result<RunOutput, ElevationError> {
        match self {
            DefaultRunner::Direct(r) => r.run(cmd).await,
            DefaultRunner::Osascript(r) => r.run(cmd).await,
        }
    }
}

/// Get the runner for `elevation` on this machine.
pub fn default_runner(elevation: Elevation) -> DefaultRunner {
    match elevation {
        Elevation::None => DefaultRunner::Direct(DirectRunner),
        Elevation::Osascript => DefaultRunner::Osascript(OsascriptRunner::default()),
        Elevation::Auto if is_root() => DefaultRunner::Direct(DirectRunner),
        Elevation::Auto => DefaultRunner::Osascript(OsascriptRunner::default()),
    }
}

#[cfg(unix)]
fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_elevates() {
        assert!(matches!(
            default_runner(Elevation::None),
            DefaultRunner::Direct(_)
        ));
        assert!(matches!(
            default_runner(Elevation::Osascript),
            DefaultRunner::Osascript(_)
        ));
    }

    #[test]
    fn command_line_is_space_joined() {
        let cmd = ElevatedCommand {
            program: "security".into(),
            args: vec!["add-trusted-cert".into(), "/tmp/a b.pem".into()],
            prompt: String::new(),
        };
        assert_eq!(cmd.command_line(), "security add-trusted-cert /tmp/a b.pem");
    }
}

//! macOS elevation through `osascript` and the system authentication dialog.

use std::path::Path;

use tokio::process::Command;

use super::{completed, ElevatedCommand, ElevatedRunner, RunOutput};
use crate::error::ElevationError;

/// Trailer of the AppleScript error for a cancelled dialog.
const USER_CANCELED: &str = "(-128)";

/// Runs commands via `do shell script ... with administrator privileges`.
///
/// `do shell script` only returns standard output, so the command's error
/// stream is redirected to a temp file and read back afterwards.
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    osascript: String,
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self::new("osascript")
    }
}

impl OsascriptRunner {
    pub fn new(osascript: impl Into<String>) -> Self {
        Self {
            osascript: osascript.into(),
        }
    }

    /// The AppleScript source that runs `cmd` as administrator, sending its
    /// error stream to `stderr_to`.
    ///
    /// Every token is shell-quoted, so arguments reach the program unchanged.
    pub fn script(cmd: &ElevatedCommand, stderr_to: &Path) -> String {
        let line = std::iter::once(&cmd.program)
            .chain(cmd.args.iter())
            .map(|t| shell_quote(t))
            .collect::<Vec<_>>()
            .join(" ");
        let redirect = quote(&stderr_to.to_string_lossy());
        format!(
            "do shell script \"{}\" with prompt \"{}\" with administrator privileges without altering line endings",
            applescript_escape(&format!("{line} 2>{redirect}")),
            applescript_escape(&cmd.prompt),
        )
    }
}

impl ElevatedRunner for OsascriptRunner {
    async fn run(&self, cmd: &ElevatedCommand) -> Result<RunOutput, ElevationError> {
        let spawn_err = |source| ElevationError::Spawn {
            program: self.osascript.clone(),
            source,
        };
        let stderr_file = tempfile::NamedTempFile::new().map_err(spawn_err)?;
        let output = Command::new(&self.osascript)
            .args(["-e", &Self::script(cmd, stderr_file.path())])
            .output()
            .await
            .map_err(spawn_err)?;
        // Unreadable means the shell never got as far as the redirect.
        let tool_stderr = tokio::fs::read_to_string(stderr_file.path())
            .await
            .unwrap_or_default();

        match completed(&self.osascript, output) {
            Ok(out) => Ok(RunOutput {
                stdout: out.stdout,
                stderr: tool_stderr,
            }),
            Err(ElevationError::Failed { stderr, .. }) if is_cancel(&stderr) => {
                Err(ElevationError::Declined)
            }
            Err(ElevationError::Failed {
                program,
                code,
                stderr,
            }) => Err(ElevationError::Failed {
                program,
                code,
                stderr: if tool_stderr.is_empty() {
                    stderr
                } else {
                    tool_stderr
                },
            }),
            Err(e) => Err(e),
        }
    }
}

/// osascript reports a cancelled dialog as `... execution error: User canceled. (-128)`.
fn is_cancel(stderr: &str) -> bool {
    stderr.trim_end().ends_with(USER_CANCELED)
}

fn shell_quote(token: &str) -> String {
    if !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c))
    {
        return token.to_string();
    }
    quote(token)
}

fn quote(token: &str) -> String {
    format!("'{}'", token.replace('\'', r"'\''"))
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

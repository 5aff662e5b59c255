//! Adding certificates to the trust store.

use std::path::Path;

use crate::compile::{compile, Invocation};
use crate::config::{DEFAULT_PROMPT, DEFAULT_TOOL};
use crate::error::TrustError;
use crate::platform::{default_runner, Elevation, ElevatedCommand, ElevatedRunner};
use crate::request::TrustRequest;

/// Run `tool` with the compiled arguments through `runner`.
///
/// The runner is called exactly once. Its error is returned unchanged; a
/// non-empty error stream fails the call with that text; otherwise the
/// tool's standard output is returned as-is.
pub async fn execute<R: ElevatedRunner>(
    runner: &R,
    invocation: &Invocation,
    tool: &str,
    prompt: &str,
) -> Result<String, TrustError> {
    let cmd = ElevatedCommand {
        program: tool.to_string(),
        args: invocation.args().to_vec(),
        prompt: prompt.to_string(),
    };
    tracing::debug!(command = %cmd.command_line(), "executing security add-trusted-cert");

    let output = runner.run(&cmd).await.inspect_err(|e| {
        tracing::warn!(error = %e, "elevated execution failed");
    })?;

    if !output.stderr.is_empty() {
        tracing::warn!(stderr = %output.stderr.trim_end(), "{tool} reported an error");
        return Err(TrustError::Tool(output.stderr));
    }

    tracing::info!(tool, "certificate added");
    Ok(output.stdout)
}

/// Add `cert_file` to the trust store, asking for authentication when needed.
pub async fn add_trusted_cert(
    request: &TrustRequest,
    cert_file: &Path,
) -> Result<String, TrustError> {
    add_trusted_cert_with_runner(&default_runner(Elevation::Auto), request, cert_file).await
}

/// Add `cert_file` using the provided runner (for testing).
pub async fn add_trusted_cert_with_runner<R: ElevatedRunner>(
    runner: &R,
    request: &TrustRequest,
    cert_file: &Path,
) -> Result<String, TrustError> {
    let invocation = compile(request, cert_file);
    execute(runner, &invocation, DEFAULT_TOOL, DEFAULT_PROMPT).await
}

//! Compiles a [`TrustRequest`] into `security add-trusted-cert` arguments.

use std::fmt::Display;
use std::path::Path;

use serde::Serialize;

use crate::policy::AllowedError;
use crate::request::{non_empty_path, OneOrMany, ScalarErrorFlag, TrustRequest};

pub const OPERATION: &str = "add-trusted-cert";

const FLAG_ADMIN: &str = "-d";
const FLAG_RESULT_TYPE: &str = "-r";
const FLAG_POLICY: &str = "-p";
const FLAG_APP_PATH: &str = "-a";
const FLAG_POLICY_STRING: &str = "-s";
const FLAG_ALLOWED_ERROR: &str = "-e";
const FLAG_KEY_USAGE: &str = "-u";
const FLAG_KEYCHAIN: &str = "-k";
const FLAG_SETTINGS_IN: &str = "-i";
const FLAG_SETTINGS_OUT: &str = "-o";

/// Ordered argument list for one invocation, operation first, certificate last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Invocation {
    args: Vec<String>,
}

impl Invocation {
    fn new() -> Self {
        Self {
            args: vec![OPERATION.to_string()],
        }
    }

    fn push(&mut self, token: impl Display) {
        self.args.push(token.to_string());
    }

    fn push_pair(&mut self, flag: &str, value: impl Display) {
        self.push(flag);
        self.push(value);
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// `tool` followed by every argument, space separated. No quoting is applied.
    pub fn command_line(&self, tool: &str) -> String {
        std::iter::once(tool)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the argument list for adding `cert_file` with the options in `request`.
///
/// Never fails: unset (or empty) options simply contribute no flags. Values are
/// passed through as given; the `security` tool judges whether they make sense.
pub fn compile(request: &TrustRequest, cert_file: &Path) -> Invocation {
    let keychain = request.resolved_keychain();
    let mut inv = Invocation::new();

    if request.add_to_admin_store {
        inv.push(FLAG_ADMIN);
    }

    if let Some(result_type) = request.result_type {
        inv.push_pair(FLAG_RESULT_TYPE, result_type);
    }

    if let Some(policies) = &request.policy_constraint {
        for policy in policies.iter() {
            inv.push_pair(FLAG_POLICY, policy);
        }
    }

    if let Some(app) = non_empty_path(&request.app_path) {
        inv.push_pair(FLAG_APP_PATH, app.display());
    }

    if let Some(s) = request.policy_string.as_deref().filter(|s| !s.is_empty()) {
        inv.push_pair(FLAG_POLICY_STRING, s);
    }

    // A lone code of 0 is treated as unset, like a zero key usage.
    let allowed_error = request
        .allowed_error
        .as_ref()
        .filter(|e| !matches!(e, OneOrMany::One(AllowedError::Code(0))));
    if let Some(errors) = allowed_error {
        let flag = match request.scalar_error_flag {
            ScalarErrorFlag::PolicyConstraint if errors.is_one() => FLAG_POLICY,
            _ => FLAG_ALLOWED_ERROR,
        };
        for err in errors.iter() {
            inv.push_pair(flag, err);
        }
    }

    // A zero mask is treated as unset.
    if let Some(usage) = request.key_usage.filter(|u| u.code() != 0) {
        inv.push_pair(FLAG_KEY_USAGE, usage);
    }

    inv.push_pair(FLAG_KEYCHAIN, keychain.display());

    if let Some(path) = non_empty_path(&request.settings_file_in) {
        inv.push_pair(FLAG_SETTINGS_IN, path.display());
    }

    if let Some(path) = non_empty_path(&request.settings_file_out) {
        inv.push_pair(FLAG_SETTINGS_OUT, path.display());
    }

    inv.push(cert_file.display());
    inv
}

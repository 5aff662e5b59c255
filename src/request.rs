//! Trust operation request: the options for one `add-trusted-cert` call.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::policy::{AllowedError, KeyUsage, PolicyConstraint, ResultType};

/// Keychain used when the request names none.
pub const DEFAULT_KEYCHAIN: &str = "/Library/Keychains/System.keychain";

/// A single value or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v).iter(),
            OneOrMany::Many(v) => v.iter(),
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(v: T) -> Self {
        OneOrMany::One(v)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(v: Vec<T>) -> Self {
        OneOrMany::Many(v)
    }
}

/// Flag emitted for a single (non-list) allowed error.
///
/// Historically a lone allowed error went out under `-p`, while a list used
/// `-e` per element. `PolicyConstraint` keeps that behaviour; `AllowedError`
/// always uses `-e`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarErrorFlag {
    #[default]
    PolicyConstraint,
    AllowedError,
}

/// Options for adding a trusted certificate. Unset fields emit no flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustRequest {
    /// Target the admin (system-wide) trust settings instead of the user's.
    #[serde(default)]
    pub add_to_admin_store: bool,
    pub result_type: Option<ResultType>,
    pub policy_constraint: Option<OneOrMany<PolicyConstraint>>,
    pub app_path: Option<PathBuf>,
    pub policy_string: Option<String>,
    pub allowed_error: Option<OneOrMany<AllowedError>>,
    pub key_usage: Option<KeyUsage>,
    pub keychain: Option<PathBuf>,
    pub settings_file_in: Option<PathBuf>,
    pub settings_file_out: Option<PathBuf>,
    #[serde(default)]
    pub scalar_error_flag: ScalarErrorFlag,
}

impl TrustRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin(mut self) -> Self {
        self.add_to_admin_store = true;
        self
    }

    pub fn result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = Some(result_type);
        self
    }

    pub fn policy_constraint(mut self, p: impl Into<OneOrMany<PolicyConstraint>>) -> Self {
        self.policy_constraint = Some(p.into());
        self
    }

    pub fn app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(path.into());
        self
    }

    pub fn policy_string(mut self, s: impl Into<String>) -> Self {
        self.policy_string = Some(s.into());
        self
    }

    pub fn allowed_error(mut self, e: impl Into<OneOrMany<AllowedError>>) -> Self {
        self.allowed_error = Some(e.into());
        self
    }

    pub fn key_usage(mut self, usage: KeyUsage) -> Self {
        self.key_usage = Some(usage);
        self
    }

    pub fn keychain(mut self, path: impl Into<PathBuf>) -> Self {
        self.keychain = Some(path.into());
        self
    }

    pub fn settings_file_in(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file_in = Some(path.into());
        self
    }

    pub fn settings_file_out(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file_out = Some(path.into());
        self
    }

    pub fn scalar_error_flag(mut self, flag: ScalarErrorFlag) -> Self {
        self.scalar_error_flag = flag;
        self
    }

    /// Keychain the certificate goes into: the requested one, else [`DEFAULT_KEYCHAIN`].
    pub fn resolved_keychain(&self) -> &Path {
        non_empty_path(&self.keychain).unwrap_or_else(|| Path::new(DEFAULT_KEYCHAIN))
    }

    /// Layer `self` over `base`: every field set here wins.
    pub fn overlay(self, base: TrustRequest) -> TrustRequest {
        TrustRequest {
            add_to_admin_store: self.add_to_admin_store || base.add_to_admin_store,
            result_type: self.result_type.or(base.result_type),
            policy_constraint: self.policy_constraint.or(base.policy_constraint),
            app_path: self.app_path.or(base.app_path),
            policy_string: self.policy_string.or(base.policy_string),
            allowed_error: self.allowed_error.or(base.allowed_error),
            key_usage: self.key_usage.or(base.key_usage),
            keychain: self.keychain.or(base.keychain),
            settings_file_in: self.settings_file_in.or(base.settings_file_in),
            settings_file_out: self.settings_file_out.or(base.settings_file_out),
            scalar_error_flag: if self.scalar_error_flag != ScalarErrorFlag::default() {
                self.scalar_error_flag
            } else {
                base.scalar_error_flag
            },
        }
    }
}

/// Empty paths count as unset.
pub(crate) fn non_empty_path(p: &Option<PathBuf>) -> Option<&Path> {
    p.as_deref().filter(|p| !p.as_os_str().is_empty())
}

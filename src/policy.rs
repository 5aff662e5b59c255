//! Trust policy vocabulary accepted by `security add-trusted-cert`.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Policy a trust setting is restricted to (`-p`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
pub enum PolicyConstraint {
    #[serde(rename = "ssl")]
    #[value(name = "ssl")]
    Ssl,
    #[serde(rename = "smime")]
    #[value(name = "smime")]
    Smime,
    #[serde(rename = "codeSign")]
    #[value(name = "codeSign")]
    CodeSign,
    #[serde(rename = "ipSec")]
    #[value(name = "ipSec")]
    IpSec,
    #[serde(rename = "basic")]
    #[value(name = "basic")]
    Basic,
    #[serde(rename = "swUpdate")]
    #[value(name = "swUpdate")]
    SwUpdate,
    #[serde(rename = "pkgSign")]
    #[value(name = "pkgSign")]
    PkgSign,
    #[serde(rename = "eap")]
    #[value(name = "eap")]
    Eap,
    #[serde(rename = "macappstore")]
    #[value(name = "macappstore")]
    MacAppStore,
    #[serde(rename = "appleId")]
    #[value(name = "appleId")]
    AppleId,
    #[serde(rename = "timestamping")]
    #[value(name = "timestamping")]
    Timestamping,
}

impl PolicyConstraint {
    pub const ALL: [PolicyConstraint; 11] = [
        Self::Ssl,
        Self::Smime,
        Self::CodeSign,
        Self::IpSec,
        Self::Basic,
        Self::SwUpdate,
        Self::PkgSign,
        Self::Eap,
        Self::MacAppStore,
        Self::AppleId,
        Self::Timestamping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssl => "ssl",
            Self::Smime => "smime",
            Self::CodeSign => "codeSign",
            Self::IpSec => "ipSec",
            Self::Basic => "basic",
            Self::SwUpdate => "swUpdate",
            Self::PkgSign => "pkgSign",
            Self::Eap => "eap",
            Self::MacAppStore => "macappstore",
            Self::AppleId => "appleId",
            Self::Timestamping => "timestamping",
        }
    }
}

impl fmt::Display for PolicyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown policy constraint: {s}"))
    }
}

/// Trust disposition assigned to the certificate (`-r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
pub enum ResultType {
    /// For root certificates.
    #[serde(rename = "trustRoot")]
    #[value(name = "trustRoot")]
    TrustRoot,
    /// Trusts everything the certificate signs, even when it is not a root.
    #[serde(rename = "trustAsRoot")]
    #[value(name = "trustAsRoot")]
    TrustAsRoot,
    #[serde(rename = "deny")]
    #[value(name = "deny")]
    Deny,
    #[serde(rename = "unspecified")]
    #[value(name = "unspecified")]
    Unspecified,
}

impl ResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrustRoot => "trustRoot",
            Self::TrustAsRoot => "trustAsRoot",
            Self::Deny => "deny",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::TrustRoot,
            Self::TrustAsRoot,
            Self::Deny,
            Self::Unspecified,
        ]
        .into_iter()
        .find(|r| r.as_str() == s)
        .ok_or_else(|| format!("unknown result type: {s}"))
    }
}

/// Validation error to tolerate (`-e`): a named error or a raw status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "AllowedErrorRepr")]
pub enum AllowedError {
    CertExpired,
    HostnameMismatch,
    Code(i32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AllowedErrorRepr {
    Code(i32),
    Name(String),
}

impl TryFrom<AllowedErrorRepr> for AllowedError {
    type Error = String;

    fn try_from(repr: AllowedErrorRepr) -> Result<Self, Self::Error> {
        match repr {
            AllowedErrorRepr::Code(code) => Ok(Self::Code(code)),
            AllowedErrorRepr::Name(name) => name.parse(),
        }
    }
}

impl fmt::Display for AllowedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CertExpired => f.write_str("certExpired"),
            Self::HostnameMismatch => f.write_str("hostnameMismatch"),
            Self::Code(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for AllowedError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certExpired" => Ok(Self::CertExpired),
            "hostnameMismatch" => Ok(Self::HostnameMismatch),
            other => other
                .parse::<i32>()
                .map(Self::Code)
                .map_err(|_| format!("unknown allowed error: {other}")),
        }
    }
}

/// Key usage bitmask (`-u`).
///
/// Usages are OR-ed together, so repeating one counts it once. The named
/// codes are distinct bits, so for distinct usages this equals their sum.
/// `ANY` absorbs everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct KeyUsage(pub i32);

impl KeyUsage {
    pub const ANY: KeyUsage = KeyUsage(-1);
    pub const SIGN: KeyUsage = KeyUsage(1);
    pub const ENCRYPT_DECRYPT_DATA: KeyUsage = KeyUsage(2);
    pub const ENCRYPT_DECRYPT_KEY: KeyUsage = KeyUsage(4);
    pub const SIGN_CERTIFICATE: KeyUsage = KeyUsage(8);
    pub const SIGN_REVOCATION: KeyUsage = KeyUsage(16);
    pub const KEY_EXCHANGE: KeyUsage = KeyUsage(32);

    const NAMED: [(&'static str, KeyUsage); 7] = [
        ("any", Self::ANY),
        ("sign", Self::SIGN),
        ("encryptDecryptData", Self::ENCRYPT_DECRYPT_DATA),
        ("encryptDecryptKey", Self::ENCRYPT_DECRYPT_KEY),
        ("signCertificate", Self::SIGN_CERTIFICATE),
        ("signRevocation", Self::SIGN_REVOCATION),
        ("keyExchange", Self::KEY_EXCHANGE),
    ];

    pub fn code(self) -> i32 {
        self.0
    }

    /// Fold usages into one mask. `ANY` absorbs everything else.
    pub fn combine(usages: impl IntoIterator<Item = KeyUsage>) -> Option<KeyUsage> {
        usages.into_iter().reduce(|acc, u| acc | u)
    }
}

impl BitOr for KeyUsage {
    type Output = KeyUsage;

    fn bitor(self, rhs: KeyUsage) -> KeyUsage {
        if self == Self::ANY || rhs == Self::ANY {
            Self::ANY
        } else {
            KeyUsage(self.0 | rhs.0)
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KeyUsage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, usage)) = Self::NAMED.iter().find(|(name, _)| *name == s) {
            return Ok(*usage);
        }
        s.parse::<i32>()
            .map(KeyUsage)
            .map_err(|_| format!("unknown key usage: {s}"))
    }
}

//! add-trusted-cert - add certificates to the macOS trust settings via `security`.

pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod platform;
pub mod policy;
pub mod request;
pub mod trust;

pub use compile::{compile, Invocation};
pub use error::{ElevationError, TrustError};
pub use policy::{AllowedError, KeyUsage, PolicyConstraint, ResultType};
pub use request::{OneOrMany, ScalarErrorFlag, TrustRequest, DEFAULT_KEYCHAIN};
pub use trust::{add_trusted_cert, add_trusted_cert_with_runner, execute};

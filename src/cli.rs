//! CLI definitions and command routing.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::compile::compile;
use crate::config::{Config, ConfigPaths};
use crate::platform::{default_runner, Elevation};
use crate::policy::{AllowedError, KeyUsage, PolicyConstraint, ResultType};
use crate::request::{OneOrMany, TrustRequest};

#[derive(Parser)]
#[command(name = "add-trusted-cert")]
#[command(about = "Add a certificate (DER or PEM) to the user or admin trust settings")]
pub struct Cli {
    /// Certificate file to add
    pub cert_file: PathBuf,

    /// Add to the admin cert store (default: user trust settings)
    #[arg(short = 'd', long = "admin")]
    pub admin: bool,

    /// Trust result to assign
    #[arg(short = 'r', long, value_enum)]
    pub result_type: Option<ResultType>,

    /// Restrict trust to a policy (repeatable)
    #[arg(short = 'p', long = "policy", value_enum)]
    pub policy: Vec<PolicyConstraint>,

    /// Restrict trust to an application
    #[arg(short = 'a', long)]
    pub app_path: Option<PathBuf>,

    /// Policy-specific string (e.g. a hostname for ssl)
    #[arg(short = 's', long)]
    pub policy_string: Option<String>,

    /// Validation error to allow: certExpired, hostnameMismatch or a status code (repeatable)
    #[arg(short = 'e', long, allow_negative_numbers = true)]
    pub allowed_error: Vec<AllowedError>,

    /// Key usage by name or code; repeated values are OR-ed into one mask
    #[arg(short = 'u', long, allow_negative_numbers = true)]
    pub key_usage: Vec<KeyUsage>,

    /// Keychain to add the certificate to [default: /Library/Keychains/System.keychain]
    #[arg(short = 'k', long)]
    pub keychain: Option<PathBuf>,

    /// Input trust settings file
    #[arg(short = 'i', long = "settings-in")]
    pub settings_in: Option<PathBuf>,

    /// Output trust settings file
    #[arg(short = 'o', long = "settings-out")]
    pub settings_out: Option<PathBuf>,

    /// Config file [default: config.toml in the config dir or ADD_TRUSTED_CERT_HOME]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Trust tool to invoke
    #[arg(long)]
    pub tool: Option<String>,

    /// Label shown in the authentication dialog
    #[arg(long)]
    pub prompt: Option<String>,

    /// How to obtain administrator privileges
    #[arg(long, value_enum)]
    pub elevation: Option<Elevation>,

    /// Print the command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the command as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Request options given on the command line.
    pub fn request(&self) -> TrustRequest {
        TrustRequest {
            add_to_admin_store: self.admin,
            result_type: self.result_type,
            policy_constraint: non_empty(&self.policy),
            app_path: self.app_path.clone(),
            policy_string: self.policy_string.clone(),
            allowed_error: non_empty(&self.allowed_error),
            key_usage: KeyUsage::combine(self.key_usage.iter().copied()),
            keychain: self.keychain.clone(),
            settings_file_in: self.settings_in.clone(),
            settings_file_out: self.settings_out.clone(),
            ..TrustRequest::default()
        }
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<OneOrMany<T>> {
    (!values.is_empty()).then(|| OneOrMany::Many(values.to_vec()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

/// Run CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            anyhow::ensure!(path.is_file(), "Config file not found: {}", path.display());
            Config::load(path)?
        }
        None => Config::load(&ConfigPaths::default_paths().config_file)?,
    };

    let request = cli.request().overlay(config.request);
    let tool = cli.tool.unwrap_or(config.runner.tool);
    let prompt = cli.prompt.unwrap_or(config.runner.prompt);
    let elevation = cli.elevation.unwrap_or(config.runner.elevation);

    let invocation = compile(&request, &cli.cert_file);

    if cli.dry_run {
        if cli.json {
            let doc = serde_json::json!({ "tool": tool, "args": invocation });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            println!("{}", invocation.command_line(&tool));
        }
        return Ok(());
    }

    anyhow::ensure!(
        cli.cert_file.is_file(),
        "Certificate file not found: {}",
        cli.cert_file.display()
    );

    let runner = default_runner(elevation);
    let rt = tokio::runtime::Runtime::new()?;
    let output = rt
        .block_on(crate::trust::execute(&runner, &invocation, &tool, &prompt))
        .with_context(|| format!("{tool} add-trusted-cert failed"))?;
    print!("{output}");
    Ok(())
}

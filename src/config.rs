use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, str::FromStr};

/// Which store back-ends the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// DynamoDB tables and an S3 bucket, resolved through the default AWS chain.
    Aws,
    /// Process-local maps; nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown storage backend `{}` (expected `aws` or `memory`)", other),
        }
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub burger_table: String,
    pub order_table: String,
    pub image_bucket: String,
    pub region: String,
    pub cors_origin: String,
    pub cors_max_age_secs: u64,
    pub max_upload_bytes: usize,
    pub storage: StorageBackend,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Burger shop API: burgers, orders and images")]
pub struct Args {
    /// Host to bind to (overrides BURGER_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BURGER_API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Burger table name (overrides BURGER_TABLE)
    #[arg(long)]
    pub burger_table: Option<String>,

    /// Order table name (overrides ORDER_TABLE)
    #[arg(long)]
    pub order_table: Option<String>,

    /// Image bucket name (overrides IMAGE_BUCKET)
    #[arg(long)]
    pub image_bucket: Option<String>,

    /// AWS region, also used in public image URLs (overrides REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Single origin allowed by CORS (overrides CORS_ORIGIN)
    #[arg(long)]
    pub cors_origin: Option<String>,

    /// CORS preflight cache lifetime in seconds (overrides CORS_MAX_AGE)
    #[arg(long)]
    pub cors_max_age: Option<u64>,

    /// Largest accepted image upload body in bytes (overrides MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Storage backend: `aws` or `memory` (overrides STORAGE)
    #[arg(long)]
    pub storage: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            burger_table: "burgers".into(),
            order_table: "orders".into(),
            image_bucket: "burger-images".into(),
            region: "us-east-1".into(),
            cors_origin: "http://localhost:4000".into(),
            cors_max_age_secs: 1800,
            max_upload_bytes: 10 * 1024 * 1024,
            storage: StorageBackend::Aws,
        }
    }
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse())
    }

    /// Layer `args` over the environment over the defaults.
    fn merge(args: Args) -> Result<Self> {
        let defaults = Self::default();

        // --- Environment fallback ---
        let env_host = env::var("BURGER_API_HOST").unwrap_or(defaults.host);
        let env_port = parse_env("BURGER_API_PORT", defaults.port)?;
        let env_burger_table = env::var("BURGER_TABLE").unwrap_or(defaults.burger_table);
        let env_order_table = env::var("ORDER_TABLE").unwrap_or(defaults.order_table);
        let env_bucket = env::var("IMAGE_BUCKET").unwrap_or(defaults.image_bucket);
        let env_region = env::var("REGION").unwrap_or(defaults.region);
        let env_origin = env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);
        let env_max_age = parse_env("CORS_MAX_AGE", defaults.cors_max_age_secs)?;
        let env_upload_limit = parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        let env_storage = match env::var("STORAGE") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => defaults.storage,
        };

        // --- Merge ---
        let storage = match args.storage {
            Some(value) => value.parse::<StorageBackend>()?,
            None => env_storage,
        };

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            burger_table: args.burger_table.unwrap_or(env_burger_table),
            order_table: args.order_table.unwrap_or(env_order_table),
            image_bucket: args.image_bucket.unwrap_or(env_bucket),
            region: args.region.unwrap_or(env_region),
            cors_origin: args.cors_origin.unwrap_or(env_origin),
            cors_max_age_secs: args.cors_max_age.unwrap_or(env_max_age),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_upload_limit),
            storage,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read `name` from the environment, falling back to `default` when unset.
fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("AWS".parse::<StorageBackend>().unwrap(), StorageBackend::Aws);
        assert_eq!(
            "memory".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn cli_flags_override_limits() {
        let args = Args::try_parse_from([
            "burger-api",
            "--cors-max-age",
            "60",
            "--max-upload-bytes",
            "1024",
            "--storage",
            "memory",
        ])
        .unwrap();

        let cfg = AppConfig::merge(args).unwrap();
        assert_eq!(cfg.cors_max_age_secs, 60);
        assert_eq!(cfg.max_upload_bytes, 1024);
        assert_eq!(cfg.storage, StorageBackend::Memory);
    }

    #[test]
    fn parse_env_falls_back_when_unset() {
        let value = parse_env("BURGER_API_TEST_UNSET_VARIABLE", 42u16).unwrap();
        assert_eq!(value, 42);
    }
}

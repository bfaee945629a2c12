//! Configuration loading and representation.
//!
//! All settings come from environment variables, read once at startup.
//! Every value has a default so a bare `cargo run` serves from in-memory
//! backends.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_TABLE: &str = "product";
pub const DEFAULT_UPLOAD_BUCKET: &str = "ak-aws-bucket-8122";
pub const DEFAULT_UPLOAD_KEY: &str = "example.txt";
pub const DEFAULT_UPLOAD_BODY: &str = "Hello, world!";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which backends the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    InMemory,
    Aws,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    /// Endpoint override for local emulators.
    pub endpoint_url: Option<String>,
    pub table_name: String,
}

/// Target and content of the fixed-text upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub bucket: String,
    pub key: String,
    pub body: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            key: DEFAULT_UPLOAD_KEY.to_string(),
            body: DEFAULT_UPLOAD_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub backend: Backend,
    pub aws: AwsSettings,
    pub upload: UploadSettings,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str, default: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let raw_addr = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let raw_backend = get("USE_AWS_BACKENDS", "false");
        let backend = match raw_backend.trim().parse::<bool>() {
            Ok(true) => Backend::Aws,
            Ok(false) => Backend::InMemory,
            Err(e) => {
                return Err(ConfigError::Invalid {
                    var: "USE_AWS_BACKENDS",
                    value: raw_backend,
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            backend,
            aws: AwsSettings {
                region: get("AWS_REGION", DEFAULT_REGION),
                endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.trim().is_empty()),
                table_name: get("PRODUCT_TABLE", DEFAULT_TABLE),
            },
            upload: UploadSettings {
                bucket: get("UPLOAD_BUCKET", DEFAULT_UPLOAD_BUCKET),
                key: get("UPLOAD_KEY", DEFAULT_UPLOAD_KEY),
                body: get("UPLOAD_BODY", DEFAULT_UPLOAD_BODY),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(s.backend, Backend::InMemory);
        assert_eq!(s.aws.region, "us-west-2");
        assert_eq!(s.aws.endpoint_url, None);
        assert_eq!(s.aws.table_name, "product");
        assert_eq!(s.upload, UploadSettings::default());
        assert_eq!(s.upload.body, "Hello, world!");
    }

    #[test]
    fn overrides_are_applied() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("USE_AWS_BACKENDS", "true"),
            ("AWS_REGION", "eu-central-1"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
            ("PRODUCT_TABLE", "products-dev"),
            ("UPLOAD_BUCKET", "dev-bucket"),
            ("UPLOAD_KEY", "hello.txt"),
        ])
        .unwrap();

        assert_eq!(s.bind_addr.port(), 3000);
        assert_eq!(s.backend, Backend::Aws);
        assert_eq!(s.aws.region, "eu-central-1");
        assert_eq!(s.aws.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(s.aws.table_name, "products-dev");
        assert_eq!(s.upload.bucket, "dev-bucket");
        assert_eq!(s.upload.key, "hello.txt");
        assert_eq!(s.upload.body, "Hello, world!");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("PRODUCT_TABLE", "  "), ("AWS_ENDPOINT_URL", "")]).unwrap();
        assert_eq!(s.aws.table_name, "product");
        assert_eq!(s.aws.endpoint_url, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = settings(&[("BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = settings(&[("USE_AWS_BACKENDS", "yes")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "USE_AWS_BACKENDS", .. }));
    }
}

use std::{net::Ipv4Addr, path::PathBuf};

use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;

/// What the account layer does when the users file cannot be read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoragePolicy {
    /// Fail the request with a 500.
    #[default]
    Strict,
    /// Log and carry on: a failed load reads as an empty table, a failed save is ignored.
    Lenient,
}

impl StoragePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    pub users_file: PathBuf,
    pub static_dir: PathBuf,
    pub storage_policy: StoragePolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => parse_port(&raw).unwrap_or_else(|| {
                warn!(value = %raw, default = DEFAULT_PORT, "invalid PORT, using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let storage_policy = match std::env::var("STORAGE_POLICY") {
            Ok(raw) => StoragePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown STORAGE_POLICY, using strict");
                StoragePolicy::Strict
            }),
            Err(_) => StoragePolicy::default(),
        };

        Self {
            host: Ipv4Addr::LOCALHOST,
            port,
            users_file: std::env::var("USERS_FILE")
                .unwrap_or_else(|_| "users.json".into())
                .into(),
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".into())
                .into(),
            storage_policy,
        }
    }

    /// Applies the optional positional port argument. A non-numeric value keeps
    /// the current port and logs a warning.
    pub fn with_port_arg(mut self, arg: Option<&str>) -> Self {
        if let Some(raw) = arg {
            match parse_port(raw) {
                Some(port) => self.port = port,
                None => warn!(value = %raw, port = self.port, "invalid port arg, using default"),
            }
        }
        self
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            host: Ipv4Addr::LOCALHOST,
            port: DEFAULT_PORT,
            users_file: "users.json".into(),
            static_dir: "static".into(),
            storage_policy: StoragePolicy::Strict,
        }
    }

    #[test]
    fn port_arg_overrides_port() {
        let cfg = base().with_port_arg(Some("8081"));
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn non_numeric_port_arg_keeps_default() {
        let cfg = base().with_port_arg(Some("abc"));
        assert_eq!(cfg.port, DEFAULT_PORT);
        let cfg = base().with_port_arg(Some("70000"));
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn missing_port_arg_is_noop() {
        assert_eq!(base().with_port_arg(None).port, DEFAULT_PORT);
    }

    #[test]
    fn storage_policy_parsing() {
        assert_eq!(StoragePolicy::parse("strict"), Some(StoragePolicy::Strict));
        assert_eq!(StoragePolicy::parse(" Lenient "), Some(StoragePolicy::Lenient));
        assert_eq!(StoragePolicy::parse("yolo"), None);
    }
}

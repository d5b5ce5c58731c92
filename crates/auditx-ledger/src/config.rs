//! Ledger connection configuration
//!
//! Resolution order used by [`LedgerConfig::from_env`]:
//! 1. `SURREALDB_ENDPOINT` + credentials: authenticated remote ledger
//! 2. `SURREALDB_URL`: unauthenticated URL (`ws://`, `mem://`, ...)
//! 3. local persistence under `.auditx/db`

use std::time::Duration;

/// Default bound on every backend round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default local persistence directory.
pub const DEFAULT_LOCAL_PATH: &str = ".auditx/db";

/// Credentials for an authenticated SurrealDB endpoint
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

/// Where and how to reach the ledger's backing store
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Connection URL (`wss://...`, `mem://`, `surrealkv://path`)
    pub endpoint: String,
    /// Present for authenticated endpoints only
    pub credentials: Option<Credentials>,
    /// Namespace (default: "auditx")
    pub namespace: String,
    /// Database name (default: "ledger")
    pub database: String,
    /// Upper bound for a single record/lookup round-trip
    pub timeout: Duration,
}

impl LedgerConfig {
    /// Configuration for an unauthenticated endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            namespace: "auditx".to_string(),
            database: "ledger".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Ephemeral in-process store
    pub fn in_memory() -> Self {
        Self::new("mem://")
    }

    /// Embedded on-disk store at `path`
    pub fn local(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(format!("surrealkv://{}", path.as_ref().display()))
    }

    /// Set credentials for a database user
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        is_root: bool,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
            is_root,
        });
        self
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Set the per-operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether this configuration points at the embedded file store
    pub fn local_path(&self) -> Option<&str> {
        self.endpoint.strip_prefix("surrealkv://")
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT, SURREALDB_USERNAME, SURREALDB_PASSWORD (all three or none)
    /// - SURREALDB_ROOT (optional, default: "false")
    /// - SURREALDB_URL (used when no endpoint is set)
    /// - SURREALDB_NAMESPACE (optional, default: "auditx")
    /// - SURREALDB_DATABASE (optional, default: "ledger")
    /// - AUDITX_LEDGER_TIMEOUT_MS (optional, default: 5000)
    pub fn from_env() -> std::result::Result<Self, String> {
        let env = |key: &str| std::env::var(key).ok();

        let mut config = match env("SURREALDB_ENDPOINT") {
            Some(endpoint) => {
                let username = env("SURREALDB_USERNAME").ok_or("SURREALDB_USERNAME not set")?;
                let password = env("SURREALDB_PASSWORD").ok_or("SURREALDB_PASSWORD not set")?;
                let is_root = env("SURREALDB_ROOT")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false);
                Self::new(endpoint).with_credentials(username, password, is_root)
            }
            None => match env("SURREALDB_URL") {
                Some(url) => Self::new(url),
                None => Self::local(DEFAULT_LOCAL_PATH),
            },
        };

        if let Some(ns) = env("SURREALDB_NAMESPACE") {
            config.namespace = ns;
        }
        if let Some(db) = env("SURREALDB_DATABASE") {
            config.database = db;
        }
        if let Some(ms) = env("AUDITX_LEDGER_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| format!("AUDITX_LEDGER_TIMEOUT_MS is not a number: {ms}"))?;
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = LedgerConfig::in_memory();
        assert_eq!(config.endpoint, "mem://");
        assert_eq!(config.namespace, "auditx");
        assert_eq!(config.database, "ledger");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn local_path_is_detected() {
        let config = LedgerConfig::local("/tmp/ledger");
        assert_eq!(config.local_path(), Some("/tmp/ledger"));
        assert_eq!(LedgerConfig::in_memory().local_path(), None);
    }

    #[test]
    fn credentials_and_timeout() {
        let config = LedgerConfig::new("wss://example")
            .with_credentials("u", "p", true)
            .with_timeout(Duration::from_millis(250));
        let creds = config.credentials.unwrap();
        assert!(creds.is_root);
        assert_eq!(creds.username, "u");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}

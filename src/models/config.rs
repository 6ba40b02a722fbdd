use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DbError;

/// Runtime values substituted into the bundled dump.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImportConfig {
    /// Prefix the host database uses for every table, e.g. `wp_`.
    pub table_prefix: String,
    /// Prefix owned by this schema, appended after `table_prefix`, e.g. `slds_`.
    pub db_prefix: String,
    /// Default character set for columns.
    pub charset: String,
    /// Default collation for columns.
    pub collate: String,
    /// Table options clause. Derived from `charset` and `collate` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset_collate: Option<String>,
}

impl ImportConfig {
    pub fn new(table_prefix: &str, db_prefix: &str, charset: &str, collate: &str) -> Self {
        Self {
            table_prefix: table_prefix.to_string(),
            db_prefix: db_prefix.to_string(),
            charset: charset.to_string(),
            collate: collate.to_string(),
            charset_collate: None,
        }
    }

    pub fn with_charset_collate(mut self, clause: &str) -> Self {
        self.charset_collate = Some(clause.to_string());
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DbError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Rejects settings that would leave a bare `CHARACTER SET` or `COLLATE`
    /// in the rewritten column declarations.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.charset.trim().is_empty() {
            return Err(DbError::Config("charset must not be empty".to_string()));
        }
        if self.collate.trim().is_empty() {
            return Err(DbError::Config("collate must not be empty".to_string()));
        }
        Ok(())
    }

    /// Both prefixes joined; this replaces the dump's placeholder prefix.
    pub fn full_prefix(&self) -> String {
        format!("{}{}", self.table_prefix, self.db_prefix)
    }

    /// Physical name of a logical table, e.g. `log` -> `wp_slds_log`.
    pub fn table_name(&self, logical_name: &str) -> String {
        format!("{}{}", self.full_prefix(), logical_name)
    }

    /// The clause written in place of the dump's `ENGINE=... COLLATE=...` suffix.
    pub fn charset_collate(&self) -> String {
        if let Some(clause) = &self.charset_collate {
            return clause.clone();
        }

        let mut clause = String::new();
        if !self.charset.is_empty() {
            clause.push_str("DEFAULT CHARACTER SET ");
            clause.push_str(&self.charset);
        }
        if !self.collate.is_empty() {
            if !clause.is_empty() {
                clause.push(' ');
            }
            clause.push_str("COLLATE ");
            clause.push_str(&self.collate);
        }
        clause
    }
}

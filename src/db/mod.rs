use crate::errors::DbError;
use async_trait::async_trait;

pub mod mysql;

/// Database capabilities the importer needs.
#[async_trait]
pub trait DbClient {
    async fn execute(&self, query: &str) -> Result<(), DbError>;
    /// Creates the table described by a `CREATE TABLE IF NOT EXISTS` statement
    /// when it is absent, and brings the types of existing columns in line
    /// with it. Does not add columns to a table that already exists.
    async fn sync_table(&self, statement: &str) -> Result<(), DbError>;
    /// Names of the columns currently present in `table_name`.
    async fn list_columns(&self, table_name: &str) -> Result<Vec<String>, DbError>;
}

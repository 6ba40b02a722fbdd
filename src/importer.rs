use std::path::Path;

use log::{debug, info, warn};

use crate::{
    db::DbClient,
    errors::DbError,
    models::{
        config::ImportConfig,
        statement::{AddedColumn, ImportReport, ParsedStatement},
    },
    parser,
};

/// Applies a bundled schema dump to a live database.
///
/// Tables are created when missing; columns declared in the dump but absent
/// from an existing table are added one `ALTER TABLE ... ADD` at a time.
/// Running the same dump twice leaves the database untouched the second time.
pub struct SchemaImporter<'a> {
    client: &'a (dyn DbClient + Send + Sync),
    config: &'a ImportConfig,
}

impl<'a> SchemaImporter<'a> {
    pub fn new(client: &'a (dyn DbClient + Send + Sync), config: &'a ImportConfig) -> Self {
        Self { client, config }
    }

    pub fn table_name(&self, logical_name: &str) -> String {
        self.config.table_name(logical_name)
    }

    /// Extracted and rewritten statements, without touching the database.
    pub fn inspect(&self, sql: &str) -> Vec<ParsedStatement> {
        parser::inspect(sql, self.config)
    }

    pub async fn import_file(&self, path: &Path) -> Result<ImportReport, DbError> {
        let sql = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DbError::Import(format!("{}: {}", path.display(), e)))?;
        self.import(&sql).await
    }

    pub async fn import(&self, sql: &str) -> Result<ImportReport, DbError> {
        self.config.validate()?;
        let statements = self.inspect(sql);
        let mut report = ImportReport::default();

        if statements.is_empty() {
            debug!("No CREATE TABLE statements found, nothing to import");
            return Ok(report);
        }

        for statement in statements {
            let Some(table) = statement.table.as_deref() else {
                warn!(
                    "Skipping statement without a `CREATE TABLE IF NOT EXISTS` table name: {}",
                    first_line(&statement.query)
                );
                report.statements_skipped += 1;
                continue;
            };

            self.client.sync_table(&statement.query).await?;
            report.tables_synced.push(table.to_string());

            // sync_table never adds columns to a table that already existed.
            let current = self.client.list_columns(table).await?;
            for column in &statement.columns {
                if current.iter().any(|c| c == &column.name) {
                    continue;
                }

                info!("Adding column {} to {}", column.name, table);
                let query = format!("ALTER TABLE {} ADD {}", table, column.declaration);
                self.client.execute(&query).await?;
                report.columns_added.push(AddedColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                });
            }
        }

        info!(
            "Synced {} tables, added {} columns, skipped {} statements",
            report.tables_synced.len(),
            report.columns_added.len(),
            report.statements_skipped
        );

        Ok(report)
    }
}

fn first_line(query: &str) -> &str {
    query.lines().next().unwrap_or_default().trim()
}

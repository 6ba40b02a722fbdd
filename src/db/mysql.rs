use async_trait::async_trait;
use log::{debug, info};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool, Row};

use crate::{
    errors::DbError,
    models::schema::{ColumnSchema, TableSchema},
    parser,
};

use super::DbClient;

pub struct MySqlClient {
    pub pool: MySqlPool,
}

impl MySqlClient {
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn describe_table(&self, table_name: &str) -> Result<TableSchema, DbError> {
        let query = r#"
            SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
                   CAST(COLUMN_TYPE AS CHAR) AS column_type,
                   CAST(IS_NULLABLE AS CHAR) AS is_nullable,
                   CAST(COLUMN_DEFAULT AS CHAR) AS column_default
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;
        let rows = sqlx::query(query)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        let columns = rows
            .iter()
            .map(|row| {
                Ok(ColumnSchema {
                    name: row.try_get("column_name")?,
                    data_type: row.try_get("column_type")?,
                    is_nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                    default: row.try_get("column_default")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(TableSchema {
            table_name: table_name.to_string(),
            columns,
        })
    }

    /// Rewrites existing columns whose declared type differs from the live one.
    async fn upgrade_column_types(&self, statement: &str) -> Result<(), DbError> {
        let parsed = parser::parse_statement(statement.to_string());
        let Some(table) = parsed.table.as_deref() else {
            return Ok(());
        };

        let live = self.describe_table(table).await?;
        for column in parser::columns_to_upgrade(&parsed, &live) {
            let live_type = live
                .column(&column.name)
                .map(|c| c.data_type.as_str())
                .unwrap_or_default();
            info!(
                "Changing {}.{} from {} to {}",
                table, column.name, live_type, column.declaration
            );
            let query = format!(
                "ALTER TABLE {} CHANGE COLUMN `{}` {}",
                table, column.name, column.declaration
            );
            self.execute(&query).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl DbClient for MySqlClient {
    async fn execute(&self, query: &str) -> Result<(), DbError> {
        debug!("Executing: {}", query);
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;
        Ok(())
    }

    async fn sync_table(&self, statement: &str) -> Result<(), DbError> {
        self.execute(statement).await?;
        self.upgrade_column_types(statement).await
    }

    async fn list_columns(&self, table_name: &str) -> Result<Vec<String>, DbError> {
        let query = r#"
            SELECT DISTINCT CAST(COLUMN_NAME AS CHAR) AS column_name
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        "#;
        let rows = sqlx::query(query)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        let columns = rows
            .iter()
            .map(|row| row.try_get::<String, _>("column_name"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns)
    }
}

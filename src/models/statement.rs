use serde::{Deserialize, Serialize};

/// One backtick-quoted column line of a CREATE TABLE statement.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Full declaration line, trimmed, without the trailing comma.
    pub declaration: String,
}

/// A rewritten CREATE TABLE statement together with what was read out of it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParsedStatement {
    pub query: String,
    /// `None` when the statement does not follow the `CREATE TABLE IF NOT EXISTS` form.
    pub table: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl ParsedStatement {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Adds a column; a repeated name replaces the earlier declaration in place.
    pub(crate) fn push_column(&mut self, name: String, declaration: String) {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.declaration = declaration,
            None => self.columns.push(ColumnDefinition { name, declaration }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddedColumn {
    pub table: String,
    pub column: String,
}

/// What a single import run did to the database.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub tables_synced: Vec<String>,
    pub columns_added: Vec<AddedColumn>,
    pub statements_skipped: usize,
}

impl ImportReport {
    pub fn no_columns_added(&self) -> bool {
        self.columns_added.is_empty()
    }
}

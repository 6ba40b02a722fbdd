//! Text-level handling of the bundled dump.
//!
//! The dump is authored against fixed placeholder values so it can be exported
//! straight from a development database. Everything here is a pure function of
//! the dump text and the [`ImportConfig`]; nothing touches a database.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    config::ImportConfig,
    schema::TableSchema,
    statement::{ColumnDefinition, ParsedStatement},
};

/// Table prefix the dump is authored with.
pub const PLACEHOLDER_PREFIX: &str = "wp_slds_";
/// Table options suffix the dump is authored with.
pub const PLACEHOLDER_TABLE_OPTIONS: &str =
    "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_520_ci";
pub const PLACEHOLDER_COLUMN_CHARSET: &str = "CHARACTER SET utf8mb4";
pub const PLACEHOLDER_COLUMN_COLLATE: &str = "COLLATE utf8mb4_unicode_520_ci";

static CREATE_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)CREATE TABLE .*?;").expect("valid create table regex"));

static TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CREATE TABLE IF NOT EXISTS `([^`]+)`").expect("valid table name regex")
});

const INTEGER_TYPES: [&str; 5] = ["tinyint", "smallint", "mediumint", "int", "bigint"];

/// Every `CREATE TABLE ... ;` in document order, semicolon included.
pub fn extract_statements(sql: &str) -> Vec<&str> {
    CREATE_TABLE_RE.find_iter(sql).map(|m| m.as_str()).collect()
}

/// Swaps the placeholder prefix, table options and column charset/collation
/// for the configured values. Replacement is textual and applies to every
/// occurrence.
pub fn rewrite(statement: &str, config: &ImportConfig) -> String {
    statement
        .replace(PLACEHOLDER_PREFIX, &config.full_prefix())
        .replace(PLACEHOLDER_TABLE_OPTIONS, &config.charset_collate())
        .replace(
            PLACEHOLDER_COLUMN_CHARSET,
            &format!("CHARACTER SET {}", config.charset),
        )
        .replace(
            PLACEHOLDER_COLUMN_COLLATE,
            &format!("COLLATE {}", config.collate),
        )
}

pub fn table_name(statement: &str) -> Option<String> {
    TABLE_NAME_RE
        .captures(statement)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Splits a column line into its name and declaration. Returns `None` for
/// anything that is not a backtick-quoted column line.
pub fn parse_column_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let rest = line.strip_prefix('`')?;
    let end = rest.find('`')?;
    let name = &rest[..end];
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), line.trim_matches(',').to_string()))
}

/// Reads the table name and column lines out of an already rewritten statement.
pub fn parse_statement(query: String) -> ParsedStatement {
    let mut parsed = ParsedStatement {
        table: table_name(&query),
        columns: Vec::new(),
        query: String::new(),
    };

    for line in query.lines() {
        if let Some((name, declaration)) = parse_column_line(line) {
            parsed.push_column(name, declaration);
        }
    }

    parsed.query = query;
    parsed
}

/// Extraction, rewriting and inspection of a whole dump.
pub fn inspect(sql: &str, config: &ImportConfig) -> Vec<ParsedStatement> {
    extract_statements(sql)
        .into_iter()
        .map(|raw| parse_statement(rewrite(raw, config)))
        .collect()
}

/// The type part of a column declaration, e.g. `bigint(20) unsigned` for
/// `` `id` bigint(20) unsigned NOT NULL``.
pub fn declared_type(declaration: &str) -> Option<String> {
    let rest = declaration.trim().strip_prefix('`')?;
    let end = rest.find('`')?;
    let rest = rest[end + 1..].trim_start();

    let mut depth = 0usize;
    let mut base_end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                base_end = i;
                break;
            }
            _ => {}
        }
    }

    let base = &rest[..base_end];
    if base.is_empty() {
        return None;
    }

    let mut ty = base.to_string();
    for word in rest[base_end..].split_whitespace() {
        let lower = word.to_ascii_lowercase();
        if lower == "unsigned" || lower == "zerofill" {
            ty.push(' ');
            ty.push_str(&lower);
        } else {
            break;
        }
    }
    Some(ty)
}

/// Canonical form for comparing a declared type against the catalog's
/// `COLUMN_TYPE`: lowercase, no spaces inside parentheses, integer display
/// widths dropped, and the aliases and implicit widths MySQL fills in
/// (`bool`, bare `char`, bare `decimal`, `year(4)`) spelled out.
pub fn normalize_type(ty: &str) -> String {
    let compact = compact_type(ty);

    let base_len = compact
        .find(|c: char| c == '(' || c == ' ')
        .unwrap_or(compact.len());
    let (base, rest) = compact.split_at(base_len);
    let parens = rest
        .strip_prefix('(')
        .and_then(|inner| inner.find(')').map(|close| (inner, close)));
    let (args, modifiers) = match parens {
        Some((inner, close)) => (Some(&inner[..close]), &inner[close + 1..]),
        None => (None, rest),
    };

    match base {
        "bool" | "boolean" => format!("tinyint{}", modifiers),
        "integer" => format!("int{}", modifiers),
        b if INTEGER_TYPES.contains(&b) => format!("{}{}", b, modifiers),
        "char" if args.is_none() => format!("char(1){}", modifiers),
        "decimal" | "dec" | "numeric" | "fixed" => {
            let args = match args {
                None => "10,0".to_string(),
                Some(a) if !a.contains(',') => format!("{},0", a),
                Some(a) => a.to_string(),
            };
            format!("decimal({}){}", args, modifiers)
        }
        "year" => format!("year{}", modifiers),
        _ => compact.clone(),
    }
}

/// Lowercases and collapses whitespace; drops it entirely inside parentheses.
fn compact_type(ty: &str) -> String {
    let lower = ty.trim().to_ascii_lowercase();

    let mut compact = String::with_capacity(lower.len());
    let mut depth = 0usize;
    let mut last_space = false;
    for c in lower.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() {
            if depth > 0 || last_space {
                continue;
            }
            last_space = true;
            compact.push(' ');
        } else {
            last_space = false;
            compact.push(c);
        }
    }
    compact
}

/// Declared columns that already exist in `live` with a different type.
/// Columns missing from `live` are not included.
pub fn columns_to_upgrade<'s>(
    statement: &'s ParsedStatement,
    live: &TableSchema,
) -> Vec<&'s ColumnDefinition> {
    statement
        .columns
        .iter()
        .filter(|column| {
            let Some(existing) = live.column(&column.name) else {
                return false;
            };
            match declared_type(&column.declaration) {
                Some(declared) => normalize_type(&declared) != normalize_type(&existing.data_type),
                None => false,
            }
        })
        .collect()
}

pub mod cli;
pub mod db;
pub mod errors;
pub mod importer;
pub mod models;
pub mod pagination;
pub mod parser;

pub use db::{mysql::MySqlClient, DbClient};
pub use errors::DbError;
pub use importer::SchemaImporter;
pub use models::{
    config::ImportConfig,
    statement::{ImportReport, ParsedStatement},
};
pub use pagination::{resolve_limit, resolve_page, LimitResolver};

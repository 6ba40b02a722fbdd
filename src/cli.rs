use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;

use crate::{
    db::mysql::MySqlClient, errors::DbError, importer::SchemaImporter,
    models::config::ImportConfig, parser,
};

#[derive(Parser, Debug)]
#[command(name = "schemasync", version, about = "Apply a bundled schema dump to a MySQL database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing tables and add missing columns.
    Import {
        dump: PathBuf,
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[command(flatten)]
        settings: ConfigArgs,
    },
    /// Print the rewritten statements as JSON without connecting.
    Inspect {
        dump: PathBuf,
        #[command(flatten)]
        settings: ConfigArgs,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// JSON file with the import settings; overrides the flags below.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, env = "TABLE_PREFIX", default_value = "wp_")]
    pub table_prefix: String,
    #[arg(long, env = "DB_PREFIX", default_value = "slds_")]
    pub db_prefix: String,
    #[arg(long, env = "DB_CHARSET", default_value = "utf8mb4")]
    pub charset: String,
    #[arg(long, env = "DB_COLLATE", default_value = "utf8mb4_unicode_520_ci")]
    pub collate: String,
    #[arg(long, env = "DB_CHARSET_COLLATE")]
    pub charset_collate: Option<String>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<ImportConfig, DbError> {
        let config = match &self.config {
            Some(path) => ImportConfig::from_json_file(path)?,
            None => {
                let config = ImportConfig::new(
                    &self.table_prefix,
                    &self.db_prefix,
                    &self.charset,
                    &self.collate,
                );
                match &self.charset_collate {
                    Some(clause) => config.with_charset_collate(clause),
                    None => config,
                }
            }
        };
        config.validate()?;
        Ok(config)
    }
}

fn read_dump(path: &Path) -> Result<String, DbError> {
    std::fs::read_to_string(path).map_err(|e| DbError::Import(format!("{}: {}", path.display(), e)))
}

pub async fn run(cli: Cli) -> Result<(), DbError> {
    match cli.command {
        Command::Import {
            dump,
            database_url,
            settings,
        } => {
            let config = settings.resolve()?;
            let client = MySqlClient::connect(&database_url).await?;
            info!("Importing {}", dump.display());

            let importer = SchemaImporter::new(&client, &config);
            let report = importer.import_file(&dump).await?;

            for added in &report.columns_added {
                println!("added {}.{}", added.table, added.column);
            }
            if report.no_columns_added() {
                println!("{} tables synced, no columns added", report.tables_synced.len());
            } else {
                println!(
                    "{} tables synced, {} columns added",
                    report.tables_synced.len(),
                    report.columns_added.len()
                );
            }
            if report.statements_skipped > 0 {
                println!("{} statements skipped", report.statements_skipped);
            }
        }
        Command::Inspect { dump, settings } => {
            let config = settings.resolve()?;
            let statements = parser::inspect(&read_dump(&dump)?, &config);
            let json = serde_json::to_string_pretty(&statements)
                .map_err(|e| DbError::General(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::try_parse_from([
            "schemasync",
            "import",
            "schema.sql",
            "--database-url",
            "mysql://root@localhost/wordpress",
            "--db-prefix",
            "demo_",
        ])
        .unwrap();

        match cli.command {
            Command::Import {
                dump,
                database_url,
                settings,
            } => {
                assert_eq!(dump, PathBuf::from("schema.sql"));
                assert_eq!(database_url, "mysql://root@localhost/wordpress");
                assert_eq!(settings.db_prefix, "demo_");
                assert!(!settings.collate.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_args_resolve() {
        let args = ConfigArgs {
            config: None,
            table_prefix: "wp_".to_string(),
            db_prefix: "demo_".to_string(),
            charset: "utf8".to_string(),
            collate: "utf8_general_ci".to_string(),
            charset_collate: Some("ENGINE=InnoDB".to_string()),
        };

        let config = args.resolve().unwrap();
        assert_eq!(config.table_name("log"), "wp_demo_log");
        assert_eq!(config.charset_collate(), "ENGINE=InnoDB");
    }

    #[test]
    fn test_config_args_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"table_prefix": "site_", "db_prefix": "x_", "charset": "latin1", "collate": "latin1_swedish_ci"}"#,
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(path),
            table_prefix: "wp_".to_string(),
            db_prefix: "demo_".to_string(),
            charset: "utf8".to_string(),
            collate: String::new(),
            charset_collate: None,
        };

        let config = args.resolve().unwrap();
        assert_eq!(config.full_prefix(), "site_x_");
        assert_eq!(config.charset, "latin1");
    }

    #[test]
    fn test_config_args_rejects_empty_collate() {
        let args = ConfigArgs {
            config: None,
            table_prefix: "wp_".to_string(),
            db_prefix: "slds_".to_string(),
            charset: "utf8mb4".to_string(),
            collate: String::new(),
            charset_collate: None,
        };

        assert!(matches!(args.resolve(), Err(DbError::Config(_))));
    }
}

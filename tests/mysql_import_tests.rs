use schemasync::db::mysql::MySqlClient;
use schemasync::db::DbClient;
use schemasync::{ImportConfig, SchemaImporter};
use std::env;

const DUMP_V1: &str = "CREATE TABLE IF NOT EXISTS `wp_slds_it_log` (
  `id` bigint(20) unsigned NOT NULL AUTO_INCREMENT,
  `msg` varchar(50) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_520_ci NOT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_520_ci;
";

const DUMP_V2: &str = "CREATE TABLE IF NOT EXISTS `wp_slds_it_log` (
  `id` bigint(20) unsigned NOT NULL AUTO_INCREMENT,
  `msg` text CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_520_ci NOT NULL,
  `level` varchar(20) NOT NULL DEFAULT 'info',
  `created_at` datetime DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_520_ci;
";

/// Connects to `DATABASE_URL` (MySQL) and drops `table`. Returns `None` when
/// the variable is not set so the suite can run without a database.
async fn setup_test_db(table: &str) -> Option<MySqlClient> {
    dotenv::dotenv().ok();
    let database_url = env::var("DATABASE_URL").ok()?;
    let client = MySqlClient::connect(&database_url)
        .await
        .expect("Failed to connect to the database");

    client
        .execute(&format!("DROP TABLE IF EXISTS {}", table))
        .await
        .unwrap();

    Some(client)
}

fn config(db_prefix: &str) -> ImportConfig {
    ImportConfig::new("wp_", db_prefix, "utf8mb4", "utf8mb4_general_ci")
}

#[tokio::test]
async fn test_import_creates_then_upgrades_table() {
    let Some(client) = setup_test_db("wp_it_it_log").await else {
        return;
    };
    let config = config("it_");
    let importer = SchemaImporter::new(&client, &config);

    let report = importer.import(DUMP_V1).await.unwrap();
    assert_eq!(report.tables_synced, vec!["wp_it_it_log".to_string()]);
    assert!(report.columns_added.is_empty());

    let report = importer.import(DUMP_V2).await.unwrap();
    let added: Vec<_> = report
        .columns_added
        .iter()
        .map(|c| c.column.as_str())
        .collect();
    assert_eq!(added, vec!["level", "created_at"]);

    let columns = client.list_columns("wp_it_it_log").await.unwrap();
    assert_eq!(columns.len(), 4);

    let schema = client.describe_table("wp_it_it_log").await.unwrap();
    let msg = schema.columns.iter().find(|c| c.name == "msg").unwrap();
    assert_eq!(msg.data_type, "text");
}

#[tokio::test]
async fn test_import_twice_is_noop() {
    let Some(client) = setup_test_db("wp_it2_it_log").await else {
        return;
    };
    let config = config("it2_");
    let importer = SchemaImporter::new(&client, &config);

    importer.import(DUMP_V2).await.unwrap();
    let second = importer.import(DUMP_V2).await.unwrap();

    assert!(second.columns_added.is_empty());
    assert_eq!(second.tables_synced.len(), 1);
}

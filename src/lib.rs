use crate::analysis::ShiftAnalyzer;
use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};
use std::sync::Arc;
use tracing::info;
use tracing::instrument;
use tracing::warn;

pub mod analysis;
#[cfg(test)]
pub mod analysis_test;
pub mod app;
pub mod cli;
pub mod error;
pub mod llm;
pub mod prompt_composer;
pub mod prompts;
pub mod records;
pub mod response_parser;
pub mod shift_notes;

pub mod test_utils;

// Shared by the server and the tests
pub struct AppState {
    pub db: Pool<SqliteConnectionManager>,
    // None when the model endpoint is not configured; checked once per request
    pub analyzer: Option<Arc<ShiftAnalyzer>>,
    #[allow(dead_code)]
    temp_db_path: Option<tempfile::NamedTempFile>,
}

impl AppState {
    pub fn new_for_testing() -> Self {
        Self::new_for_testing_with_analyzer(None)
    }

    pub fn new_for_testing_with_analyzer(
        analyzer: Option<Arc<ShiftAnalyzer>>,
    ) -> Self {
        let temp_db_file = tempfile::NamedTempFile::new()
            .expect("Failed to create temporary database file");
        let db_path = temp_db_file
            .path()
            .to_str()
            .expect("Failed to get database temp file path")
            .to_string();

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::new(manager).expect("Failed to create database pool");

        let mut conn = pool.get().expect("Failed to get connection");
        init_carelog_db(&mut conn).expect("Failed to initialize database");

        Self {
            db: pool,
            analyzer,
            // Kept so the file is removed when the state is dropped
            temp_db_path: Some(temp_db_file),
        }
    }
}

pub struct AppConfig {
    pub db_pool: Pool<SqliteConnectionManager>,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: Option<String>,
    pub model: String,
}

pub fn create_app_state(config: AppConfig) -> Arc<AppState> {
    let analyzer = match ShiftAnalyzer::from_config(
        config.gemini_api_key,
        config.gemini_api_base,
        &config.model,
    ) {
        Ok(analyzer) => {
            info!("Shift analysis available using model {}", config.model);
            Some(Arc::new(analyzer))
        }
        Err(e) => {
            warn!("Shift analysis not available: {}", e);
            None
        }
    };

    Arc::new(AppState {
        db: config.db_pool,
        analyzer,
        temp_db_path: None,
    })
}

fn carelog_migration_steps() -> Vec<M<'static>> {
    vec![
        M::up(
            r#"
            CREATE TABLE IF NOT EXISTS care_recipients (
                id TEXT PRIMARY KEY,
                name TEXT,
                profile TEXT                          -- JSON object of profile attributes
            );

            CREATE TABLE IF NOT EXISTS shifts (
                uuid TEXT PRIMARY KEY,
                care_recipient_id TEXT,
                shift_no INTEGER,
                date TEXT,                            -- Date in YYYY-MM-DD format
                day INTEGER,
                start_time TEXT,
                end_time TEXT,
                content TEXT,                         -- Free-text notes for the whole shift
                FOREIGN KEY(care_recipient_id) REFERENCES care_recipients(id)
            );
            "#,
        ),
        M::up(
            r#"
            CREATE TABLE IF NOT EXISTS shift_notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                shift_uuid TEXT NOT NULL,
                caregiver_name TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(shift_uuid) REFERENCES shifts(uuid)
            );

            CREATE INDEX IF NOT EXISTS idx_shift_notes_shift_created
                ON shift_notes(shift_uuid, created_at);
            "#,
        ),
    ]
}

// Database initialization
#[instrument(skip(conn))]
pub fn init_carelog_db(conn: &mut Connection) -> Result<()> {
    info!("Initializing carelog database");
    conn.pragma_update(None, "journal_mode", "WAL")?;

    let migrations = Migrations::new(carelog_migration_steps());
    migrations.to_latest(conn)?;

    Ok(())
}


#[cfg(test)]
mod app_state_tests {
    use super::{create_app_state, AppConfig};
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;
    use tempfile::NamedTempFile;

    fn temp_pool() -> (Pool<SqliteConnectionManager>, NamedTempFile) {
        let temp_file = NamedTempFile::new().expect("temp sqlite file");
        let manager = SqliteConnectionManager::file(
            temp_file.path().to_str().expect("temp path"),
        );
        let pool = Pool::new(manager).expect("pool");
        (pool, temp_file)
    }

    #[test]
    fn create_app_state_without_api_key_disables_analysis() {
        let (db_pool, _db_file) = temp_pool();

        let state = create_app_state(AppConfig {
            db_pool,
            gemini_api_key: None,
            gemini_api_base: None,
            model: "gemini-2.5-flash".to_string(),
        });
        assert!(state.analyzer.is_none());
    }

    #[test]
    fn create_app_state_with_api_key_enables_analysis() {
        let (db_pool, _db_file) = temp_pool();

        let state = create_app_state(AppConfig {
            db_pool,
            gemini_api_key: Some("test-key".to_string()),
            gemini_api_base: None,
            model: "gemini-2.5-flash".to_string(),
        });
        let analyzer = state.analyzer.as_ref().expect("analyzer configured");
        assert_eq!(analyzer.model(), "gemini-2.5-flash");
    }
}

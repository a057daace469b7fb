use crate::config::DatabaseConfig;
use duckdb::{Connection, Result as DbResult};
use std::sync::{Arc, Mutex};
use tracing::info;

pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = r#"
CREATE SEQUENCE IF NOT EXISTS seq_chats_id;

CREATE TABLE IF NOT EXISTS analyses (
    id VARCHAR PRIMARY KEY,
    session_id VARCHAR NOT NULL,
    kind VARCHAR NOT NULL,
    mode VARCHAR NOT NULL,
    input_type VARCHAR NOT NULL,
    content TEXT NOT NULL,
    result TEXT NOT NULL,
    overall_score INTEGER NOT NULL,
    narrative_source VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_analyses_session ON analyses(session_id, created_at);

CREATE TABLE IF NOT EXISTS chats (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_chats_id'),
    session_id VARCHAR NOT NULL,
    role VARCHAR NOT NULL,
    content TEXT NOT NULL,
    topic VARCHAR,
    source VARCHAR,
    created_at VARCHAR NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chats_session ON chats(session_id, id);

CREATE TABLE IF NOT EXISTS library_contributions (
    id VARCHAR PRIMARY KEY,
    term VARCHAR NOT NULL,
    definition TEXT NOT NULL,
    layer VARCHAR,
    contributor VARCHAR NOT NULL,
    status VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL,
    reviewed_at VARCHAR
);
"#;

/// An empty path opens an in-memory database.
pub fn get_connection(config: &DatabaseConfig) -> DbResult<DbPool> {
    let conn = if config.path.is_empty() || config.path == ":memory:" {
        info!("Opening in-memory DuckDB database");
        Connection::open_in_memory()?
    } else {
        info!("Connecting to DuckDB at {}", config.path);
        Connection::open(&config.path)?
    };

    init_schema(&conn)?;

    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_schema(conn: &Connection) -> DbResult<()> {
    info!("Initializing database schema");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

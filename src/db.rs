use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::models::{Analysis, AnalysisSummary, StoredAnalysis};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analyses (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            payload     TEXT NOT NULL,
            ingested_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_analyses_ingested ON analyses(ingested_at);
        ",
    )?;
    Ok(())
}

/// Content-addressed id: hex SHA-256 of the document's full text.
pub fn analysis_id(all_text: &str) -> String {
    hex::encode(Sha256::digest(all_text.as_bytes()))
}

/// Store an analysis under its content id, replacing any earlier record for
/// the same text.
pub fn save_analysis(conn: &Connection, analysis: &Analysis) -> Result<String> {
    let id = analysis_id(&analysis.all_text);
    let payload = serde_json::to_string(analysis)?;
    conn.execute(
        "INSERT OR REPLACE INTO analyses (id, title, payload, ingested_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![id, analysis.title, payload, Utc::now().to_rfc3339()],
    )?;
    Ok(id)
}

pub fn get_analysis(conn: &Connection, id: &str) -> Result<Option<StoredAnalysis>> {
    let row = conn
        .query_row(
            "SELECT payload, ingested_at FROM analyses WHERE id = ?1",
            params![id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let Some((payload, ingested_at)) = row else {
        return Ok(None);
    };
    let analysis: Analysis = serde_json::from_str(&payload)
        .with_context(|| format!("Corrupt payload for analysis {}", id))?;
    let ingested_at = DateTime::parse_from_rfc3339(&ingested_at)
        .with_context(|| format!("Bad timestamp for analysis {}", id))?
        .with_timezone(&Utc);

    Ok(Some(StoredAnalysis {
        id: id.to_string(),
        ingested_at,
        analysis,
    }))
}

pub fn list_analyses(conn: &Connection) -> Result<Vec<AnalysisSummary>> {
    let mut stmt = conn.prepare("SELECT id, title FROM analyses ORDER BY ingested_at, id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AnalysisSummary {
                id: row.get(0)?,
                title: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

use crate::errors::PipelineError;
use crate::store::models::ArtifactMeta;
use rusqlite::{params, Connection, OptionalExtension};

/// Next free version number for an artifact name. Versions start at v0.
pub fn next_version(conn: &Connection, name: &str) -> Result<i64, PipelineError> {
    conn.query_row(
        "SELECT COALESCE(MAX(version) + 1, 0) FROM artifacts WHERE name = ?",
        params![name],
        |r| r.get(0),
    )
    .map_err(|e| PipelineError::DbError(format!("next version failed: {e}")))
}

pub fn insert_artifact(conn: &Connection, meta: &ArtifactMeta) -> Result<i64, PipelineError> {
    conn.execute(
        r#"
        INSERT INTO artifacts
            (name, version, kind, description, file_name, rel_path, sha256, size_bytes, created_by_run, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            meta.name,
            meta.version,
            meta.kind,
            meta.description,
            meta.file_name,
            meta.rel_path,
            meta.sha256,
            meta.size_bytes,
            meta.created_by_run,
            meta.created_at,
        ],
    )
    .map_err(|e| PipelineError::DbError(format!("insert artifact failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn find_latest(conn: &Connection, name: &str) -> Result<Option<ArtifactMeta>, PipelineError> {
    conn.query_row(
        &format!("{SELECT_META} WHERE name = ? ORDER BY version DESC LIMIT 1"),
        params![name],
        row_to_meta,
    )
    .optional()
    .map_err(|e| PipelineError::DbError(format!("lookup latest failed: {e}")))
}

pub fn find_version(
    conn: &Connection,
    name: &str,
    version: i64,
) -> Result<Option<ArtifactMeta>, PipelineError> {
    conn.query_row(
        &format!("{SELECT_META} WHERE name = ? AND version = ?"),
        params![name, version],
        row_to_meta,
    )
    .optional()
    .map_err(|e| PipelineError::DbError(format!("lookup version failed: {e}")))
}

pub fn list_artifacts(conn: &Connection) -> Result<Vec<ArtifactMeta>, PipelineError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_META} ORDER BY name, version"))
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], row_to_meta)
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| PipelineError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// Records that a run consumed an artifact version (lineage).
pub fn record_use(
    conn: &Connection,
    run_id: i64,
    artifact_id: i64,
    now: i64,
) -> Result<(), PipelineError> {
    conn.execute(
        "INSERT INTO artifact_uses (run_id, artifact_id, used_at) VALUES (?, ?, ?)
         ON CONFLICT(run_id, artifact_id) DO NOTHING",
        params![run_id, artifact_id, now],
    )
    .map_err(|e| PipelineError::DbError(format!("record use failed: {e}")))?;
    Ok(())
}

/// Artifact ids a run consumed, oldest use first.
pub fn uses_for_run(conn: &Connection, run_id: i64) -> Result<Vec<i64>, PipelineError> {
    let mut stmt = conn
        .prepare("SELECT artifact_id FROM artifact_uses WHERE run_id = ? ORDER BY used_at, artifact_id")
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![run_id], |r| r.get(0))
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| PipelineError::DbError(e.to_string()))?);
    }
    Ok(out)
}

const SELECT_META: &str = "SELECT id, name, version, kind, description, file_name, rel_path, sha256, size_bytes, created_by_run, created_at FROM artifacts";

fn row_to_meta(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArtifactMeta> {
    Ok(ArtifactMeta {
        id: row.get(0)?,
        name: row.get(1)?,
        version: row.get(2)?,
        kind: row.get(3)?,
        description: row.get(4)?,
        file_name: row.get(5)?,
        rel_path: row.get(6)?,
        sha256: row.get(7)?,
        size_bytes: row.get(8)?,
        created_by_run: row.get(9)?,
        created_at: row.get(10)?,
    })
}

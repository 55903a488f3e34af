use crate::errors::PipelineError;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct Run {
    pub id: i64,
    pub job_type: String,
    pub config: Option<String>,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub rows_in: Option<i64>,
    pub rows_out: Option<i64>,
    pub success: Option<bool>,
    pub error_message: Option<String>,
    pub summary: Option<String>,
}

pub fn start_run(
    conn: &Connection,
    job_type: &str,
    config_json: &str,
    now: i64,
) -> Result<i64, PipelineError> {
    conn.execute(
        "INSERT INTO runs (job_type, config, started_at, success) VALUES (?, ?, ?, 0)",
        params![job_type, config_json, now],
    )
    .map_err(|e| PipelineError::DbError(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub fn finish_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    rows_in: Option<usize>,
    rows_out: Option<usize>,
    success: bool,
    error: Option<String>,
    summary_json: Option<String>,
) -> Result<(), PipelineError> {
    conn.execute(
        "UPDATE runs SET finished_at = ?, rows_in = ?, rows_out = ?, success = ?, error_message = ?, summary = ? WHERE id = ?",
        params![
            now,
            rows_in.map(|n| n as i64),
            rows_out.map(|n| n as i64),
            success,
            error,
            summary_json,
            run_id
        ],
    )
    .map_err(|e| PipelineError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_run(conn: &Connection, run_id: i64) -> Result<Run, PipelineError> {
    conn.query_row(
        "SELECT id, job_type, config, started_at, finished_at, rows_in, rows_out, success, error_message, summary
         FROM runs WHERE id = ?",
        params![run_id],
        row_to_run,
    )
    .map_err(|e| PipelineError::DbError(e.to_string()))
}

pub fn get_recent_runs(conn: &Connection, limit: usize) -> Result<Vec<Run>, PipelineError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, job_type, config, started_at, finished_at, rows_in, rows_out, success, error_message, summary
             FROM runs ORDER BY started_at DESC, id DESC LIMIT ?",
        )
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], row_to_run)
        .map_err(|e| PipelineError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| PipelineError::DbError(e.to_string()))?);
    }
    Ok(runs)
}

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<Run> {
    Ok(Run {
        id: row.get(0)?,
        job_type: row.get(1)?,
        config: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        rows_in: row.get(5)?,
        rows_out: row.get(6)?,
        success: row.get(7)?,
        error_message: row.get(8)?,
        summary: row.get(9)?,
    })
}

use std::fs;

use serde_json::json;

use crate::cli::{CleanArgs, FetchArgs, ProfileArgs};
use crate::dataset;
use crate::db::connection::Database;
use crate::db::{now_unix, runs};
use crate::domain::logic::clean_listings;
use crate::errors::{PipelineError, PipelineResult};
use crate::profile::DatasetProfile;
use crate::spreadsheets::export_profile_xlsx;
use crate::store::models::{ArtifactMeta, ArtifactRef};
use crate::store::ArtifactStore;
use crate::templates::profile_page;

/// What a finished job hands back to the run tracker.
struct RunOutcome {
    rows_in: Option<usize>,
    rows_out: Option<usize>,
    summary: Option<serde_json::Value>,
}

/// Brackets a job body in a tracked run: insert the run row, execute, then
/// close the row with success or the error message. The error is returned
/// either way so the process exit code reflects it.
fn with_run<F>(db: &Database, job_type: &str, config_json: String, body: F) -> PipelineResult<()>
where
    F: FnOnce(i64) -> PipelineResult<RunOutcome>,
{
    let run_id = db.with_conn(|conn| runs::start_run(conn, job_type, &config_json, now_unix()))?;
    log::info!("Run {run_id} ({job_type}) started");

    match body(run_id) {
        Ok(outcome) => {
            db.with_conn(|conn| {
                runs::finish_run(
                    conn,
                    run_id,
                    now_unix(),
                    outcome.rows_in,
                    outcome.rows_out,
                    true,
                    None,
                    outcome.summary.map(|s| s.to_string()),
                )
            })?;
            log::info!("✅ Run {run_id} ({job_type}) finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Run {run_id} ({job_type}) failed: {e}");
            let _ = db.with_conn(|conn| {
                runs::finish_run(
                    conn,
                    run_id,
                    now_unix(),
                    None,
                    None,
                    false,
                    Some(e.to_string()),
                    None,
                )
            });
            Err(e)
        }
    }
}

fn config_json<T: serde::Serialize>(args: &T) -> String {
    serde_json::to_string(args).unwrap_or_else(|_| "{}".to_string())
}

/// Resolve an input artifact and record the run as one of its consumers.
fn use_artifact(
    store: &ArtifactStore,
    run_id: i64,
    reference: &str,
) -> PipelineResult<(ArtifactMeta, std::path::PathBuf)> {
    let art: ArtifactRef = reference
        .parse()
        .map_err(|e: crate::store::StoreError| PipelineError::Store(e.to_string()))?;

    log::info!("Downloading artifact: {art}");
    let (meta, path) = store
        .resolve(&art)
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    store
        .record_use(run_id, &meta)
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    Ok((meta, path))
}

pub fn run_fetch(db: &Database, store: &ArtifactStore, args: &FetchArgs) -> PipelineResult<()> {
    with_run(db, "fetch", config_json(args), |run_id| {
        let meta = store
            .fetch_url(
                Some(run_id),
                &args.url,
                &args.output_artifact,
                &args.output_type,
                &args.output_description,
            )
            .map_err(|e| PipelineError::Store(e.to_string()))?;

        Ok(RunOutcome {
            rows_in: None,
            rows_out: None,
            summary: Some(json!({
                "artifact": meta.qualified_name(),
                "sha256": meta.sha256,
                "size_bytes": meta.size_bytes,
            })),
        })
    })
}

pub fn run_profile(db: &Database, store: &ArtifactStore, args: &ProfileArgs) -> PipelineResult<()> {
    with_run(db, "profile", config_json(args), |run_id| {
        let (meta, path) = use_artifact(store, run_id, &args.input_artifact)?;
        let listings = dataset::load_listings(&path)?;

        log::info!("Profiling {} rows", listings.len());
        let profile = DatasetProfile::build(&listings);

        fs::create_dir_all(&args.out_dir)
            .map_err(|e| PipelineError::Io(format!("create {}: {e}", args.out_dir.display())))?;

        let html_path = args.out_dir.join("profile.html");
        let page = profile_page(&profile, &meta.qualified_name());
        fs::write(&html_path, page.into_string())
            .map_err(|e| PipelineError::Io(format!("write {}: {e}", html_path.display())))?;

        let xlsx_path = args.out_dir.join("profile.xlsx");
        let buffer = export_profile_xlsx(&profile, &meta.qualified_name())?;
        fs::write(&xlsx_path, buffer)
            .map_err(|e| PipelineError::Io(format!("write {}: {e}", xlsx_path.display())))?;

        log::info!(
            "Report written to {} and {}",
            html_path.display(),
            xlsx_path.display()
        );

        Ok(RunOutcome {
            rows_in: Some(profile.rows),
            rows_out: None,
            summary: Some(json!({
                "input": meta.qualified_name(),
                "rows": profile.rows,
                "columns": profile.columns.len(),
                "missing_cells": profile.missing_cells,
                "report_html": html_path.display().to_string(),
                "report_xlsx": xlsx_path.display().to_string(),
            })),
        })
    })
}

pub fn run_clean(db: &Database, store: &ArtifactStore, args: &CleanArgs) -> PipelineResult<()> {
    if args.min_price > args.max_price {
        return Err(PipelineError::Config(format!(
            "min_price {} is above max_price {}",
            args.min_price, args.max_price
        )));
    }

    with_run(db, "basic_cleaning", config_json(args), |run_id| {
        let (meta, path) = use_artifact(store, run_id, &args.input_artifact)?;
        let listings = dataset::load_listings(&path)?;

        log::info!("Cleaning dataset");
        let (cleaned, summary) = clean_listings(listings, args.min_price, args.max_price);
        log::info!(
            "Kept {} of {} rows ({} outside [{}, {}])",
            summary.rows_out,
            summary.rows_in,
            summary.dropped_out_of_range,
            args.min_price,
            args.max_price
        );

        // Written to a scratch file, logged into the store, then removed.
        let tmp = std::env::temp_dir().join(format!("clean_sample-{run_id}.csv"));
        dataset::write_listings(&tmp, &cleaned)?;

        log::info!("Saving output artifact: {}", args.output_artifact);
        let out_meta = store
            .log_file(
                Some(run_id),
                &args.output_artifact,
                &args.output_type,
                &args.output_description,
                &tmp,
            )
            .map_err(|e| PipelineError::Store(e.to_string()));
        let _ = fs::remove_file(&tmp);
        let out_meta = out_meta?;

        Ok(RunOutcome {
            rows_in: Some(summary.rows_in),
            rows_out: Some(summary.rows_out),
            summary: Some(json!({
                "input": meta.qualified_name(),
                "output": out_meta.qualified_name(),
                "dropped_out_of_range": summary.dropped_out_of_range,
                "null_last_review": summary.null_last_review,
                "min_price": args.min_price,
                "max_price": args.max_price,
            })),
        })
    })
}

pub fn show_runs(db: &Database, limit: usize) -> PipelineResult<()> {
    let runs = db.with_conn(|conn| runs::get_recent_runs(conn, limit))?;

    println!(
        "{:>4}  {:<16} {:<8} {:>8} {:>8}  {}",
        "id", "job", "status", "rows_in", "rows_out", "error"
    );
    for run in runs {
        let status = match run.success {
            Some(true) => "ok",
            Some(false) if run.finished_at.is_some() => "failed",
            _ => "running",
        };
        println!(
            "{:>4}  {:<16} {:<8} {:>8} {:>8}  {}",
            run.id,
            run.job_type,
            status,
            run.rows_in.map(|n| n.to_string()).unwrap_or_default(),
            run.rows_out.map(|n| n.to_string()).unwrap_or_default(),
            run.error_message.unwrap_or_default(),
        );
    }
    Ok(())
}

pub fn show_artifacts(store: &ArtifactStore) -> PipelineResult<()> {
    let artifacts = store
        .list()
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    println!(
        "{:<32} {:<12} {:>10}  {}",
        "artifact", "kind", "bytes", "sha256"
    );
    for a in artifacts {
        println!(
            "{:<32} {:<12} {:>10}  {}",
            a.qualified_name(),
            a.kind,
            a.size_bytes,
            &a.sha256[..12.min(a.sha256.len())],
        );
    }
    Ok(())
}

// store.rs
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use url::Url;

use crate::db::connection::Database;
use crate::db::{artifacts, now_unix};

use super::models::{ArtifactMeta, ArtifactRef, VersionSpec};
use super::store_error::StoreError;

const USER_AGENT: &str = concat!("eda_simple/", env!("CARGO_PKG_VERSION"));

/// Versioned artifact store: files live under `root/<name>/v<version>/`,
/// metadata lives in the tracking database.
pub struct ArtifactStore {
    db: Database,
    root: PathBuf,
    client: Client,
}

impl ArtifactStore {
    pub fn new(db: Database, root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StoreError::Io(format!("create store root {}: {e}", root.display())))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(360))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self { db, root, client })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference to its metadata and a verified local file path.
    /// The file's digest is re-checked against the registry on every resolve.
    pub fn resolve(&self, art: &ArtifactRef) -> Result<(ArtifactMeta, PathBuf), StoreError> {
        let meta = self
            .lookup(art)?
            .ok_or_else(|| StoreError::NotFound(art.to_string()))?;

        let path = self.root.join(&meta.rel_path);
        if !path.is_file() {
            return Err(StoreError::NotFound(format!(
                "{} is registered but missing on disk ({})",
                meta.qualified_name(),
                path.display()
            )));
        }

        let actual = sha256_file(&path)?;
        if actual != meta.sha256 {
            return Err(StoreError::DigestMismatch {
                expected: meta.sha256.clone(),
                actual,
            });
        }

        Ok((meta, path))
    }

    fn lookup(&self, art: &ArtifactRef) -> Result<Option<ArtifactMeta>, StoreError> {
        self.db
            .with_conn(|conn| match art.version {
                VersionSpec::Latest => artifacts::find_latest(conn, &art.name),
                VersionSpec::Exact(v) => artifacts::find_version(conn, &art.name, v),
            })
            .map_err(|e| StoreError::Registry(e.to_string()))
    }

    /// Register a local file as a new version of `name` and copy it into the
    /// store. If the bytes are identical to the latest version, that version
    /// is reused instead of minting a new one.
    pub fn log_file(
        &self,
        run_id: Option<i64>,
        name: &str,
        kind: &str,
        description: &str,
        src: &Path,
    ) -> Result<ArtifactMeta, StoreError> {
        let sha256 = sha256_file(src)?;
        let size_bytes = fs::metadata(src)
            .map_err(|e| StoreError::Io(format!("stat {}: {e}", src.display())))?
            .len() as i64;

        let latest = self
            .db
            .with_conn(|conn| artifacts::find_latest(conn, name))
            .map_err(|e| StoreError::Registry(e.to_string()))?;

        if let Some(latest) = latest {
            if latest.sha256 == sha256 {
                log::info!(
                    "Artifact {} unchanged, reusing {}",
                    name,
                    latest.qualified_name()
                );
                return Ok(latest);
            }
        }

        let file_name = src
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(name)
            .to_string();

        let (version, id, rel_path) = self
            .db
            .with_conn(|conn| {
                let version = artifacts::next_version(conn, name)?;
                let rel_path = format!("{name}/v{version}/{file_name}");
                let meta = ArtifactMeta {
                    id: 0,
                    name: name.to_string(),
                    version,
                    kind: kind.to_string(),
                    description: Some(description.to_string()),
                    file_name: file_name.clone(),
                    rel_path: rel_path.clone(),
                    sha256: sha256.clone(),
                    size_bytes,
                    created_by_run: run_id,
                    created_at: now_unix(),
                };
                let id = artifacts::insert_artifact(conn, &meta)?;
                Ok((version, id, rel_path))
            })
            .map_err(|e| StoreError::Registry(e.to_string()))?;

        let dest = self.root.join(&rel_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("create {}: {e}", parent.display())))?;
        }
        fs::copy(src, &dest)
            .map_err(|e| StoreError::Io(format!("copy into store: {e}")))?;

        log::info!("Logged artifact {name}:v{version} ({size_bytes} bytes)");

        Ok(ArtifactMeta {
            id,
            name: name.to_string(),
            version,
            kind: kind.to_string(),
            description: Some(description.to_string()),
            file_name,
            rel_path,
            sha256,
            size_bytes,
            created_by_run: run_id,
            created_at: now_unix(),
        })
    }

    /// Record that `run_id` consumed this artifact version.
    pub fn record_use(&self, run_id: i64, artifact: &ArtifactMeta) -> Result<(), StoreError> {
        self.db
            .with_conn(|conn| artifacts::record_use(conn, run_id, artifact.id, now_unix()))
            .map_err(|e| StoreError::Registry(e.to_string()))
    }

    pub fn list(&self) -> Result<Vec<ArtifactMeta>, StoreError> {
        self.db
            .with_conn(|conn| artifacts::list_artifacts(conn))
            .map_err(|e| StoreError::Registry(e.to_string()))
    }

    /// Download a remote file and register it as a new artifact version.
    pub fn fetch_url(
        &self,
        run_id: Option<i64>,
        url_str: &str,
        name: &str,
        kind: &str,
        description: &str,
    ) -> Result<ArtifactMeta, StoreError> {
        let url = Url::parse(url_str)
            .map_err(|e| StoreError::Network(format!("invalid URL '{url_str}': {e}")))?;

        let tmp = self.root.join(format!(".download-{}.tmp", now_unix()));
        let result = self.fetch_with_retry(&url, &tmp);

        let meta = match result {
            Ok(()) => self.log_file(run_id, name, kind, description, &tmp),
            Err(e) => Err(e),
        };

        let _ = fs::remove_file(&tmp);
        meta
    }

    fn fetch_with_retry(&self, url: &Url, dest: &Path) -> Result<(), StoreError> {
        const MAX_ATTEMPTS: u64 = 5;
        const MAX_BACKOFF_SECS: u64 = 10;
        const JITTER_MAX_SECS: u64 = 2;

        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let start = std::time::Instant::now();

            match self.try_fetch(url, dest) {
                Ok(bytes) => {
                    log::info!(
                        "Fetched {url} ({bytes} bytes) on attempt {attempt} in {:?}",
                        start.elapsed()
                    );
                    return Ok(());
                }
                Err(e) => {
                    log::warn!(
                        "⚠️ Fetch attempt {attempt} failed in {:?}: {e}",
                        start.elapsed()
                    );
                    last_err = Some(e);

                    if attempt < MAX_ATTEMPTS {
                        // backoff
                        let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                        std::thread::sleep(Duration::from_secs(base + jitter));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| StoreError::Network("fetch retry loop failed".into())))
    }

    fn try_fetch(&self, url: &Url, dest: &Path) -> Result<u64, StoreError> {
        let mut req = self.client.get(url.clone());
        // Stores behind auth take a bearer token; public buckets just ignore it.
        if let Ok(token) = std::env::var("EDA_STORE_TOKEN") {
            req = req.bearer_auth(token);
        }

        let mut resp = req.send().map_err(|e| StoreError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Network(format!("HTTP {status} fetching {url}")));
        }

        let mut file = File::create(dest)
            .map_err(|e| StoreError::Io(format!("create {}: {e}", dest.display())))?;
        resp.copy_to(&mut file)
            .map_err(|e| StoreError::Network(e.to_string()))
    }
}

/// Streaming SHA-256 of a file, hex encoded.
pub fn sha256_file(path: &Path) -> Result<String, StoreError> {
    let mut file = File::open(path)
        .map_err(|e| StoreError::Io(format!("open {}: {e}", path.display())))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| StoreError::Io(format!("read {}: {e}", path.display())))?;

    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

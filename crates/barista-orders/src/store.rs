//! Filesystem persistence for orders.
//!
//! Writes go through [`OrderStore::save`], which prices the request, picks
//! a free identifier for the current second and publishes the record under
//! that name only once it is fully written. Reads go through [`OrderStore::load_latest`],
//! which picks the order file with the newest modification time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use barista_types::{OrderRecord, OrderRequest};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::OrderError;
use crate::id::OrderId;

/// Upper bound on orders created within a single second.
const MAX_ORDERS_PER_SECOND: u32 = 10_000;

/// An order together with where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub id: OrderId,
    pub path: PathBuf,
    pub record: OrderRecord,
}

/// Order files kept in a single directory.
#[derive(Debug, Clone)]
pub struct OrderStore {
    dir: PathBuf,
}

impl OrderStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first save if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Prices and persists a confirmed order, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Io` if the directory or file cannot be written.
    pub async fn save(&self, request: OrderRequest) -> Result<StoredOrder, OrderError> {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        self.save_at(request, now).await
    }

    /// Prices and persists a confirmed order as if created at `unix_seconds`.
    ///
    /// The record is written to a hidden temporary file first and then
    /// hard-linked under its final name, so an order file is never visible
    /// with partial contents. Linking fails on an existing name, which keeps
    /// concurrent writers from overwriting each other.
    pub async fn save_at(
        &self,
        request: OrderRequest,
        unix_seconds: u64,
    ) -> Result<StoredOrder, OrderError> {
        let record = OrderRecord::from_request(request);
        let contents = serde_json::to_vec_pretty(&record)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| OrderError::io(&self.dir, e))?;

        let tmp_path = self.dir.join(temp_file_name(unix_seconds));
        tracing::debug!(path = %tmp_path.display(), "writing order file");

        if let Err(e) = write_new(&tmp_path, &contents).await {
            remove_temp(&tmp_path).await;
            return Err(OrderError::io(tmp_path, e));
        }

        let linked = self.link_free_id(&tmp_path, unix_seconds).await;
        remove_temp(&tmp_path).await;
        let (id, path) = linked?;

        tracing::info!(
            order_id = %id,
            path = %path.display(),
            price = record.price,
            "order saved"
        );

        Ok(StoredOrder { id, path, record })
    }

    /// Links `tmp_path` under the first free identifier for `unix_seconds`.
    async fn link_free_id(
        &self,
        tmp_path: &Path,
        unix_seconds: u64,
    ) -> Result<(OrderId, PathBuf), OrderError> {
        for seq in 0..MAX_ORDERS_PER_SECOND {
            let id = OrderId::new(unix_seconds, seq);
            let path = self.dir.join(id.file_name());

            match fs::hard_link(tmp_path, &path).await {
                Ok(()) => return Ok((id, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(OrderError::io(path, e)),
            }
        }

        Err(OrderError::IdExhausted(unix_seconds))
    }

    /// Loads the order whose file was modified most recently.
    ///
    /// Ties on modification time are broken by identifier. Files in the
    /// directory that are not named like orders are ignored.
    ///
    /// Returns `Ok(None)` when the store holds no orders, including when the
    /// directory does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Io` if the directory or the chosen file cannot
    /// be read, or `OrderError::Serialization` if it is not a valid record.
    pub async fn load_latest(&self) -> Result<Option<StoredOrder>, OrderError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(OrderError::io(&self.dir, e)),
        };

        let mut latest: Option<(SystemTime, OrderId, PathBuf)> = None;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OrderError::io(&self.dir, e))?
        {
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(OrderId::from_file_name) else {
                continue;
            };

            let path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| OrderError::io(&path, e))?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map_err(|e| OrderError::io(&path, e))?;

            let newer = match &latest {
                Some((best_time, best_id, _)) => (modified, id) > (*best_time, *best_id),
                None => true,
            };
            if newer {
                latest = Some((modified, id, path));
            }
        }

        let Some((_, id, path)) = latest else {
            return Ok(None);
        };

        let contents = fs::read(&path)
            .await
            .map_err(|e| OrderError::io(&path, e))?;
        let record: OrderRecord = serde_json::from_slice(&contents)?;

        tracing::debug!(order_id = %id, path = %path.display(), "loaded latest order");

        Ok(Some(StoredOrder { id, path, record }))
    }
}

/// Distinguishes temporary files of concurrent saves within this process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden name for an order that is still being written. It does not end in
/// `.json`, so [`OrderId::from_file_name`] never matches it.
fn temp_file_name(unix_seconds: u64) -> String {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        ".{}.tmp-{}-{}",
        OrderId::new(unix_seconds, 0).file_name(),
        std::process::id(),
        n
    )
}

async fn write_new(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    file.flush().await
}

async fn remove_temp(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            "failed to remove temporary order file: {}",
            e
        ),
    }
}

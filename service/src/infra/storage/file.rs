//! JSON file [`Storage`] implementation.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use common::operations::{By, Perform, Select};
use tokio::{fs, sync::Mutex};
use tracerr::Traced;
use tracing as log;

use super::{Batch, Error, Key, Storage};

/// [`Storage`] persisting values into a single JSON file.
///
/// Every [`Batch`] is written into a temporary file first, which then replaces
/// the original one, so readers never observe a partially applied [`Batch`].
#[derive(Clone, Debug)]
pub struct File {
    /// Path to the JSON file.
    path: Arc<PathBuf>,

    /// Lock serializing read-modify-write cycles.
    lock: Arc<Mutex<()>>,
}

impl File {
    /// Creates a new [`File`] storage at the provided `path`.
    ///
    /// The file is created on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::default(),
        }
    }

    /// Returns the path to the JSON file of this [`File`] storage.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all the entries from the JSON file.
    async fn load(&self) -> Result<BTreeMap<String, String>, Traced<Error>> {
        let bytes = match fs::read(self.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(tracerr::new!(Error::Io(e))),
        };
        serde_json::from_slice(&bytes).map_err(tracerr::from_and_wrap!())
    }

    /// Replaces the JSON file with the provided entries.
    async fn store(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), Traced<Error>> {
        if let Some(dir) = self.path().parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .map_err(tracerr::from_and_wrap!())?;
            }
        }

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(tracerr::from_and_wrap!())?;
        let tmp = self.path().with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!())?;
        fs::rename(&tmp, self.path())
            .await
            .map_err(tracerr::from_and_wrap!())
    }
}

impl Storage<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key.as_ref()))
    }
}

impl Storage<Perform<Batch>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(batch): Perform<Batch>,
    ) -> Result<Self::Ok, Self::Err> {
        if batch.is_empty() {
            return Ok(());
        }

        let _guard = self.lock.lock().await;

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e) if matches!(e.as_ref(), Error::Malformed(_)) => {
                log::warn!(
                    "discarding malformed `{}` storage: {e}",
                    self.path().display(),
                );
                BTreeMap::new()
            }
            Err(e) => return Err(tracerr::wrap!()(e)),
        };
        for (key, value) in batch {
            let key = key.as_ref().to_owned();
            match value {
                Some(v) => drop(entries.insert(key, v)),
                None => drop(entries.remove(&key)),
            }
        }
        self.store(&entries).await
    }
}

//! The [`GeoStore`] handle: file-backed persistence for the four GeoJSON layers.

use crate::builder::GeoStoreBuilder;
use crate::error::{GeoStoreError, GeoStoreErrorExt};
use crate::layer::Layer;
use crate::maintenance::{self, TMP_MARKER};
use crate::model::{Feature, FeatureCollection, FeatureId, LayerSet, Properties};
use crate::stats::{self, Statistics};
use serde_json::Value;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub struct GeoStoreInner {
    /// Canonical path of the data directory.
    pub(crate) root: PathBuf,
    /// Per-connection part of temp file names, so restarts and sibling processes differ.
    pub(crate) tmp_tag: String,
    pub(crate) tmp_counter: AtomicU64,
    /// One lock per layer, held across every read-modify-write.
    pub(crate) locks: [Mutex<()>; 4],
}

/// A cloneable handle to the layer files of one data directory.
///
/// Reads go straight to disk, so a file replaced by hand is picked up by the next
/// request. Mutations of the same layer are serialized within the process and every
/// save replaces the file atomically (temp file, `fsync`, rename), so readers never see
/// a half-written document.
///
/// # Example
///
/// ```rust
/// use cagpile_geostore::{GeoStore, GeoStoreError, Layer, Properties};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), GeoStoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let store = GeoStore::builder().root(tmp.path()).connect().await?;
///
///     let mut properties = Properties::new();
///     properties.insert("Facility".into(), json!("School"));
///     let id = store.insert(Layer::Facilities, properties, None).await?;
///     assert_eq!(id, json!(1));
///
///     let stats = store.statistics().await;
///     assert_eq!(stats.facility_types["School"], 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GeoStore {
    pub(crate) inner: Arc<GeoStoreInner>,
}

impl Deref for GeoStore {
    type Target = GeoStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl GeoStore {
    #[must_use = "The store is not opened until you call .connect()"]
    pub fn builder() -> GeoStoreBuilder {
        GeoStoreBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self, layer: Layer) -> PathBuf {
        self.root.join(layer.file_name())
    }

    /// Reads a layer, falling back to an empty collection.
    ///
    /// A missing file is logged as a warning, an unreadable or malformed one as an
    /// error. Neither is reported to the caller.
    pub async fn load(&self, layer: Layer) -> FeatureCollection {
        match self.read(layer).await {
            Ok(Some(collection)) => {
                debug!(%layer, features = collection.len(), "Loaded layer");
                collection
            },
            Ok(None) => {
                warn!(%layer, path = %self.path(layer).display(), "Layer file not found");
                FeatureCollection::new()
            },
            Err(err) => {
                error!(%layer, error = %err, "Failed to load layer");
                FeatureCollection::new()
            },
        }
    }

    /// Reads all four layers concurrently.
    pub async fn load_all(&self) -> LayerSet {
        let (households, facilities, roads, boundary) = tokio::join!(
            self.load(Layer::Households),
            self.load(Layer::Facilities),
            self.load(Layer::Roads),
            self.load(Layer::Boundary),
        );

        let mut set = LayerSet::default();
        set.insert(Layer::Households, households);
        set.insert(Layer::Facilities, facilities);
        set.insert(Layer::Roads, roads);
        set.insert(Layer::Boundary, boundary);
        set
    }

    /// Replaces a layer file with `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::Io`] if the file cannot be written, or
    /// [`GeoStoreError::Json`] if the collection cannot be encoded.
    pub async fn save(
        &self,
        layer: Layer,
        collection: &FeatureCollection,
    ) -> Result<(), GeoStoreError> {
        let _guard = self.lock(layer).await;
        self.write(layer, collection).await
    }

    /// Returns the first feature of `layer` whose id matches.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::FeatureNotFound`] when no feature matches.
    pub async fn find(&self, layer: Layer, id: &FeatureId) -> Result<Feature, GeoStoreError> {
        self.load(layer)
            .await
            .find(id)
            .cloned()
            .ok_or_else(|| not_found(layer, id))
    }

    /// Merges `properties` into the first matching feature and replaces its geometry
    /// when a non-empty one is given.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::FeatureNotFound`] when no feature matches, or the read
    /// and write errors of [`GeoStore::save`]. A malformed file is never overwritten.
    pub async fn update(
        &self,
        layer: Layer,
        id: &FeatureId,
        properties: Properties,
        geometry: Option<Value>,
    ) -> Result<(), GeoStoreError> {
        let _guard = self.lock(layer).await;
        let mut collection = self.read_for_write(layer).await?;

        let feature = collection.find_mut(id).ok_or_else(|| not_found(layer, id))?;
        feature.merge_properties(properties);
        if let Some(geometry) = meaningful(geometry) {
            feature.geometry = Some(geometry);
        }

        self.write(layer, &collection).await?;
        info!(%layer, %id, "Updated feature");
        Ok(())
    }

    /// Removes every feature whose id matches.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::FeatureNotFound`] when no feature matches; the file is
    /// left untouched in that case.
    pub async fn delete(&self, layer: Layer, id: &FeatureId) -> Result<(), GeoStoreError> {
        let _guard = self.lock(layer).await;
        let mut collection = self.read_for_write(layer).await?;

        let removed = collection.remove(id);
        if removed == 0 {
            return Err(not_found(layer, id));
        }

        self.write(layer, &collection).await?;
        info!(%layer, %id, removed, "Deleted feature");
        Ok(())
    }

    /// Appends a feature and returns its id.
    ///
    /// When `properties.id` is missing or `null` the next numeric id of the layer is
    /// assigned (one past the largest numeric id, or 1).
    ///
    /// # Errors
    ///
    /// Returns the read and write errors of [`GeoStore::save`].
    pub async fn insert(
        &self,
        layer: Layer,
        mut properties: Properties,
        geometry: Option<Value>,
    ) -> Result<Value, GeoStoreError> {
        let _guard = self.lock(layer).await;
        let mut collection = self.read_for_write(layer).await?;

        let id = match properties.get("id") {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = Value::from(collection.next_id());
                properties.insert("id".to_owned(), id.clone());
                id
            },
        };

        collection.features.push(Feature::new(properties, geometry));
        self.write(layer, &collection).await?;
        info!(%layer, %id, "Added feature");
        Ok(id)
    }

    /// Loads every layer and aggregates the dashboard numbers.
    pub async fn statistics(&self) -> Statistics {
        stats::statistics(&self.load_all().await)
    }

    /// Names of the regular files in the data directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::Io`] if the directory cannot be listed.
    pub async fn list_files(&self) -> Result<Vec<String>, GeoStoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .context(format!("Failed to list {}", self.root.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            if entry.file_type().await.is_ok_and(|kind| kind.is_file()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn lock(&self, layer: Layer) -> MutexGuard<'_, ()> {
        self.locks[layer.index()].lock().await
    }

    /// Strict read: `Ok(None)` only when the file does not exist.
    async fn read(&self, layer: Layer) -> Result<Option<FeatureCollection>, GeoStoreError> {
        let path = self.path(layer);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(GeoStoreError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        serde_json::from_slice::<FeatureCollection>(&bytes)
            .context(format!("Parsing {}", path.display()))
            .map(Some)
    }

    async fn read_for_write(&self, layer: Layer) -> Result<FeatureCollection, GeoStoreError> {
        Ok(self.read(layer).await?.unwrap_or_default())
    }

    async fn write(
        &self,
        layer: Layer,
        collection: &FeatureCollection,
    ) -> Result<(), GeoStoreError> {
        let target = self.path(layer);
        let data = serde_json::to_vec_pretty(collection)
            .context(format!("Encoding layer {layer}"))?;

        let (temp, file) = self.create_tmp(layer).await?;
        let swapped = match Self::flush(file, &data).await {
            Ok(()) => Self::swap(&temp, &target).await,
            Err(err) => Err(err),
        };

        if let Err(err) = swapped {
            if let Err(cleanup) = fs::remove_file(&temp).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp file");
            }
            return Err(err);
        }

        Self::sync_dir(&self.root).await;

        info!(%layer, features = collection.len(), path = %target.display(), "Saved layer");
        Ok(())
    }

    /// Creates a fresh temp file next to the layer file, skipping names already taken.
    async fn create_tmp(&self, layer: Layer) -> Result<(PathBuf, fs::File), GeoStoreError> {
        let mut attempts = 1;
        loop {
            let temp = self.unique_tmp_path(layer);
            match fs::OpenOptions::new().create_new(true).write(true).open(&temp).await {
                Ok(file) => return Ok((temp, file)),
                Err(err)
                    if err.kind() == std::io::ErrorKind::AlreadyExists
                        && attempts < TMP_ATTEMPTS =>
                {
                    debug!(path = %temp.display(), "Temp file name taken");
                    attempts += 1;
                },
                Err(err) => {
                    return Err(GeoStoreError::Io {
                        source: err,
                        context: Some(format!("Temp creation failed: {}", temp.display()).into()),
                    });
                },
            }
        }
    }

    async fn flush(mut file: fs::File, data: &[u8]) -> Result<(), GeoStoreError> {
        file.write_all(data).await.context("Write failed")?;
        file.sync_all().await.context("Hardware sync failed")
    }

    async fn swap(temp: &Path, target: &Path) -> Result<(), GeoStoreError> {
        let context =
            || format!("Atomic swap failed: {} -> {}", temp.display(), target.display());

        match fs::rename(temp, target).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                fs::remove_file(target)
                    .await
                    .context(format!("Failed to replace existing file: {}", target.display()))?;
                fs::rename(temp, target).await.context(context())
            },
            Err(err) => Err(GeoStoreError::Io { source: err, context: Some(context().into()) }),
        }
    }

    fn unique_tmp_path(&self, layer: Layer) -> PathBuf {
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!("{}{TMP_MARKER}{}.{counter}", layer.file_name(), self.tmp_tag))
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

const TMP_ATTEMPTS: u32 = 8;

fn not_found(layer: Layer, id: &FeatureId) -> GeoStoreError {
    GeoStoreError::FeatureNotFound { id: id.to_string(), layer }
}

/// `null` and `{}` mean "keep the current geometry".
fn meaningful(geometry: Option<Value>) -> Option<Value> {
    geometry.filter(|g| match g {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn taken_temp_names_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let store = GeoStore::builder().root(temp.path()).connect().await.unwrap();

        let next = store.tmp_counter.load(Ordering::Relaxed);
        for counter in next..next + 3 {
            let name = format!(
                "{}{TMP_MARKER}{}.{counter}",
                Layer::Households.file_name(),
                store.tmp_tag
            );
            std::fs::write(store.root.join(name), b"left by a crashed save").unwrap();
        }

        let id = store.insert(Layer::Households, Properties::new(), None).await.unwrap();
        assert_eq!(id, json!(1));
        assert_eq!(store.load(Layer::Households).await.len(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_repeated_collisions() {
        let temp = tempfile::tempdir().unwrap();
        let store = GeoStore::builder().root(temp.path()).connect().await.unwrap();

        let next = store.tmp_counter.load(Ordering::Relaxed);
        for counter in next..next + u64::from(TMP_ATTEMPTS) {
            let name =
                format!("{}{TMP_MARKER}{}.{counter}", Layer::Roads.file_name(), store.tmp_tag);
            std::fs::write(store.root.join(name), b"").unwrap();
        }

        let err = store.save(Layer::Roads, &FeatureCollection::new()).await.unwrap_err();
        assert!(matches!(err, GeoStoreError::Io { .. }));
        assert!(!store.path(Layer::Roads).exists());
    }

    #[test]
    fn meaningful_geometry() {
        assert!(meaningful(Some(Value::Null)).is_none());
        assert!(meaningful(Some(json!({}))).is_none());
        assert!(meaningful(Some(json!({ "type": "Point", "coordinates": [1.0, 2.0] }))).is_some());
    }
}

use crate::engine::{GeoStore, GeoStoreInner};
use crate::error::{GeoStoreError, GeoStoreErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct GeoStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
}

impl Default for GeoStoreBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> GeoStoreBuilder<S> {
    #[must_use = "Sets whether the data directory is created when missing"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl GeoStoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the directory holding the layer files"]
    pub fn root(self, path: impl Into<PathBuf>) -> GeoStoreBuilder<WithRoot> {
        GeoStoreBuilder { state: WithRoot(path.into()), create: self.create }
    }
}

impl GeoStoreBuilder<WithRoot> {
    /// Opens the data directory.
    ///
    /// Creates it first when `create(true)` is set (the default), resolves it to a
    /// canonical path and removes temporary files orphaned by an interrupted save.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::Io`] if the directory is missing and `create` is off,
    /// or cannot be created or resolved.
    pub async fn connect(self) -> Result<GeoStore, GeoStoreError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to create data directory: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve data directory: {}", root.display()))?;
        info!(path = %canonical.display(), "Opened GeoJSON data directory");

        let store = GeoStore {
            inner: Arc::new(GeoStoreInner {
                root: canonical,
                tmp_tag: tmp_tag(),
                tmp_counter: AtomicU64::new(1),
                locks: std::array::from_fn(|_| Mutex::new(())),
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}

/// Process id plus the sub-second clock at connect time, in hex.
fn tmp_tag() -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.subsec_nanos());
    format!("{:x}{nanos:08x}", std::process::id())
}

//! File-backed persistence for the Cagpile GIS layers.
//!
//! Each layer (households, facilities, roads, boundary) lives in one GeoJSON
//! `FeatureCollection` file inside a data directory. Every operation reads the file
//! fresh from disk, so external edits (QGIS exports, hand fixes) show up immediately.
//!
//! # Guarantees
//!
//! - **Atomic saves**: a unique temp file is written, synced and renamed over the target.
//! - **Per-layer serialization**: read-modify-write cycles on one layer never interleave
//!   inside a process. Separate processes sharing a directory remain last-writer-wins.
//! - **Lenient reads**: a missing or malformed file loads as an empty collection, while
//!   mutations refuse to overwrite a malformed file.
//! - **Faithful documents**: unknown members (`name`, `crs`, per-feature `id`) and
//!   non-ASCII text are preserved.
//!
//! # Example
//!
//! ```rust
//! use cagpile_geostore::{FeatureId, GeoStore, GeoStoreError, Layer, Properties};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GeoStoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let store = GeoStore::builder().root(tmp.path()).connect().await?;
//!
//!     let id = store.insert(Layer::Households, Properties::new(), None).await?;
//!     let id = FeatureId::from_value(&id).unwrap();
//!
//!     let mut patch = Properties::new();
//!     patch.insert("Owner".into(), json!("Dela Cruz"));
//!     store.update(Layer::Households, &id, patch, None).await?;
//!
//!     let feature = store.find(Layer::Households, &id).await?;
//!     assert_eq!(feature.properties["Owner"], "Dela Cruz");
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod layer;
mod maintenance;
mod model;
mod outcome;
mod stats;

pub use builder::GeoStoreBuilder;
pub use engine::GeoStore;
pub use error::{GeoStoreError, GeoStoreErrorExt};
pub use layer::Layer;
pub use model::{
    Feature, FeatureCollection, FeatureId, LayerSet, Properties, numeric_id, value_text,
};
pub use outcome::{Outcome, SAVED_MESSAGE};
pub use stats::{Statistics, statistics};

//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, and behind the `server` feature the
//! shared API state, the uniform JSON reply envelope and the system routes.
//!
//! ## Config loading
//! ```rust,no_run
//! use cagpile_kernel::config::load_config;
//! use cagpile_kernel::domain::config::ApiConfig;
//!
//! let config: ApiConfig = load_config(None::<&str>).unwrap();
//! println!("serving {} on port {}", config.storage.data_dir.display(), config.server.port);
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use cagpile_domain as domain;
#[cfg(feature = "server")]
pub use cagpile_geostore as geostore;

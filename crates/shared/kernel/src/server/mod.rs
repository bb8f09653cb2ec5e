//! HTTP plumbing shared by the feature slices.

pub mod extract;
pub mod health;
pub mod reply;
pub mod router;
pub mod state;

pub use extract::ApiJson;
pub use reply::{ApiFailure, ApiReply, OutcomeResponse};
pub use state::ApiState;

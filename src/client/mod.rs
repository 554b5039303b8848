//! Infrastructure layer: the remote forum API

pub mod api;
pub mod error;

pub use api::ForumClient;
pub use error::{ApiError, ApiResult};

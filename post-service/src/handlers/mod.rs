pub mod error;
pub mod health;
pub mod posts;

pub use error::PostError;
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use posts::{create_post, find_post, update_post};

pub mod auth_service;
pub mod helpers;
pub mod telemetry;

pub use auth_service::{AuthService, InMemoryAuthService, ServiceError};
pub use helpers::{configure_redis, get_redis_client};
pub use telemetry::init_tracing;

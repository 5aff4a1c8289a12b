pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod explanation;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod quiz;
pub mod router;
pub mod selection;
pub mod session;
pub mod state;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;

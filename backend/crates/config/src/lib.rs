pub mod env;
pub mod tracing_init;

pub use env::{EndpointConfig, MigrationConfig};
pub use tracing_init::init_tracing;

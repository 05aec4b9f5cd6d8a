//! adminforge server: resource registry and the HTTP endpoints that serve
//! admin schemas to the rendering client.

pub mod error;
pub mod logging;
pub mod network;
pub mod registry;

pub use error::{ApiError, RegistryError};
pub use logging::init_tracing;
pub use network::{AdminServer, LogFormat, ServerConfig};
pub use registry::{RegistryBuilder, ResourceRegistry};

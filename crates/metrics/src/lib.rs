pub mod agent;
pub mod service;
pub mod tracing;

pub use agent::*;
pub use service::*;
pub use self::tracing::*;

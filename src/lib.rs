//! Shared startup plumbing for the `emerald-service` and `emerald-agent` binaries.

pub mod args;
pub mod signal;

pub use args::ServerArgs;
pub use signal::shutdown_signal;

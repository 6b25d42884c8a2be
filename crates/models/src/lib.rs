pub mod agent;
pub mod chat;
pub mod config;
pub mod error;

pub use agent::*;
pub use chat::*;
pub use config::*;
pub use error::*;

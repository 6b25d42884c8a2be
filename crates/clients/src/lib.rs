pub mod agent;
pub mod aws;
pub mod decode;
pub mod sink;
pub mod store;

pub use agent::*;
pub use aws::*;
pub use decode::*;
pub use sink::*;
pub use store::*;

pub mod fakes;
pub mod server;

pub use fakes::*;
pub use server::*;

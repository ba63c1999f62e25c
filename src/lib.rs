pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod sync;
pub mod weather;

pub use error::Error;

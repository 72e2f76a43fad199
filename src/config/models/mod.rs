//! Configuration data models

pub mod server;
pub mod storage;
pub mod worker;

pub use server::*;
pub use storage::*;
pub use worker::*;

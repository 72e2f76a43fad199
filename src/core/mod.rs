//! Core domain logic: address records, transforms, and the batch lifecycle

pub mod address;
pub mod batch;

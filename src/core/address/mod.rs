//! Address records and the transforms applied to them

pub mod transform;
pub mod types;

pub use transform::{RecognitionTransform, Transform, Transformed, ValidationTransform};
pub use types::{AddressRecord, Diagnostic, MessageLevel, RecognitionRecord, ResidentialIndicator};

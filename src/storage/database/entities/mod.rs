/// Batch entity module
pub mod batch;
/// Batch item entity module
pub mod batch_item;

pub use batch::Entity as Batch;
pub use batch_item::Entity as BatchItem;

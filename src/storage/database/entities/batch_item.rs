use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-record batch item database model
///
/// Items exist only as a side effect of processing and are replaced
/// atomically on each processing pass.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "address_batch_items")]
pub struct Model {
    /// Item ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning batch (cascade-deleted with it)
    pub batch_id: Uuid,

    /// Submission-order index within the batch
    pub position: i32,

    /// Per-record outcome status
    pub status: String,

    /// Raw input record as submitted
    #[sea_orm(column_type = "JsonBinary")]
    pub original: Json,

    /// Transformed record
    #[sea_orm(column_type = "JsonBinary")]
    pub result: Json,

    /// Ordered diagnostic messages
    #[sea_orm(column_type = "JsonBinary")]
    pub messages: Json,

    /// Insertion timestamp
    pub created_at: DateTimeWithTimeZone,
}

/// Item entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning batch
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id",
        on_delete = "Cascade"
    )]
    Batch,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

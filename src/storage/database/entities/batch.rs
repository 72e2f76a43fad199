use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Address batch database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "address_batches")]
pub struct Model {
    /// Batch ID, assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Batch kind ("validate" or "recognize")
    pub kind: String,

    /// Batch lifecycle status
    pub status: String,

    /// Original submitted records, stored verbatim; write-once at creation
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub request_payload: Option<Json>,

    /// Batch creation timestamp
    pub created_at: DateTimeWithTimeZone,
}

/// Batch entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Items produced by processing this batch
    #[sea_orm(has_many = "super::batch_item::Entity")]
    Items,
}

impl Related<super::batch_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

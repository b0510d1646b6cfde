//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Media type recorded for uploaded images.
pub const MEDIA_TYPE_IMAGE: &str = "image";

/// One dated feed entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Author display name, copied from the member at post time
    pub author: String,

    /// Caption
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    /// Kind of attached media
    #[sea_orm(nullable)]
    pub media_type: Option<String>,

    /// Generated file name inside the media store
    #[sea_orm(nullable, unique)]
    pub media_path: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    /// Calendar day the post belongs to
    #[sea_orm(indexed)]
    pub date: Date,
}

/// Post relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Settings entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the singleton settings row.
pub const SETTINGS_ID: i32 = 1;

/// Application-wide settings (singleton row).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Whether the first-run setup has been completed
    #[sea_orm(default_value = false)]
    pub is_setup_done: bool,
}

/// Settings relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

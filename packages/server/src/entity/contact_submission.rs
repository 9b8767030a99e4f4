use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status assigned to every incoming submission. Later pipeline stages
/// (manual triage) move it forward, never this service.
pub const STATUS_NEW: &str = "new";

/// A contact form submission from the public site.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(indexed)]
    pub email: String,

    pub company: Option<String>,

    pub phone: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Where the visitor came from (landing page, campaign tag).
    pub source: Option<String>,

    #[sea_orm(indexed)]
    pub status: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

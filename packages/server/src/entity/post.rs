use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A news or blog post managed through the admin CMS.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// URL identifier derived from the title at creation. Never changes
    /// afterwards, so published links stay stable.
    #[sea_orm(unique)]
    pub slug: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,

    pub category: Option<String>,

    /// Public URL of the cover image, if one was uploaded.
    pub featured_image: Option<String>,

    pub author_name: String,

    #[sea_orm(column_name = "type", indexed)]
    pub post_type: String,

    #[sea_orm(indexed)]
    pub status: String,

    /// Estimated reading time in minutes, recomputed whenever content changes.
    pub read_time: i32,

    /// Set the first time the post is published, retained afterwards.
    pub published_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_text, validate_title};
use crate::error::AppError;
use crate::utils::filename;

/// Which public section a post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    News,
    Blog,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Blog => "blog",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "news" => Some(Self::News),
            "blog" => Some(Self::Blog),
            _ => None,
        }
    }
}

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Request body for creating a post.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Factory Tour Highlights")]
    pub title: String,
    /// Full post body.
    pub content: String,
    /// Short teaser shown on listing cards.
    pub excerpt: Option<String>,
    #[schema(example = "Manufacturing")]
    pub category: Option<String>,
    /// Public URL of the cover image, usually obtained from the image upload endpoint.
    pub featured_image: Option<String>,
    /// Byline. Defaults to the configured team name when omitted.
    pub author_name: Option<String>,
    #[serde(rename = "type")]
    pub post_type: PostType,
    /// Defaults to `draft` when omitted.
    #[serde(default)]
    pub status: PostStatus,
}

/// Request body for updating a post. Absent fields are left untouched;
/// nullable fields accept an explicit `null` to clear them.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub featured_image: Option<Option<String>>,
    pub author_name: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
}

/// A complete post as returned to both public and admin clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    #[schema(example = "factory-tour-highlights")]
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub featured_image: Option<String>,
    pub author_name: String,
    #[serde(rename = "type")]
    #[schema(example = "blog")]
    pub post_type: String,
    #[schema(example = "published")]
    pub status: String,
    /// Estimated reading time in minutes.
    #[schema(example = 4)]
    pub read_time: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row without the full content, which can be large.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct PostListItem {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub featured_image: Option<String>,
    pub author_name: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub status: String,
    pub read_time: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for the public post list.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PublicPostListQuery {
    /// Filter by section: `news` or `blog`.
    #[serde(rename = "type")]
    #[param(example = "blog")]
    pub post_type: Option<String>,
}

/// Query parameters for the admin post list.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AdminPostListQuery {
    /// Filter by section: `news` or `blog`.
    #[serde(rename = "type")]
    #[param(example = "news")]
    pub post_type: Option<String>,
    /// When true, hide drafts just like the public list does.
    #[param(example = false)]
    pub published_only: Option<bool>,
}

/// Request body for uploading an image, base64-encoded.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadImageRequest {
    /// Original filename, used for its extension.
    #[schema(example = "cover.png")]
    pub filename: String,
    /// MIME type of the file. Must be `image/*`.
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Standard base64 encoding of the file bytes.
    pub base64_data: String,
}

/// Location of a stored image.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadImageResponse {
    /// Public URL to reference in post content or as a featured image.
    #[schema(example = "/uploads/a3/f1e2...9b.png")]
    pub url: String,
}

impl From<crate::entity::post::Model> for PostResponse {
    fn from(m: crate::entity::post::Model) -> Self {
        Self {
            id: m.id,
            slug: m.slug,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            category: m.category,
            featured_image: m.featured_image,
            author_name: m.author_name,
            post_type: m.post_type,
            status: m.status,
            read_time: m.read_time,
            published_at: m.published_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_post(req: &CreatePostRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    if req.content.trim().is_empty() || req.content.len() > 1_000_000 {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    validate_optional_text(req.excerpt.as_deref(), "Excerpt", 1024)?;
    validate_optional_text(req.category.as_deref(), "Category", 128)?;
    validate_optional_text(req.featured_image.as_deref(), "Featured image URL", 2048)?;
    validate_optional_text(req.author_name.as_deref(), "Author name", 128)?;
    Ok(())
}

pub fn validate_update_post(req: &UpdatePostRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref content) = req.content
        && (content.trim().is_empty() || content.len() > 1_000_000)
    {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    if let Some(Some(ref excerpt)) = req.excerpt {
        validate_optional_text(Some(excerpt), "Excerpt", 1024)?;
    }
    if let Some(Some(ref category)) = req.category {
        validate_optional_text(Some(category), "Category", 128)?;
    }
    if let Some(Some(ref url)) = req.featured_image {
        validate_optional_text(Some(url), "Featured image URL", 2048)?;
    }
    if let Some(ref author) = req.author_name {
        if author.trim().is_empty() {
            return Err(AppError::Validation("Author name must not be empty".into()));
        }
        validate_optional_text(Some(author), "Author name", 128)?;
    }
    Ok(())
}

/// Validate an upload payload and work out the stored file extension.
///
/// Runs before any decoding or disk writes, so a rejected upload leaves
/// no trace.
pub fn validate_upload_image(req: &UploadImageRequest, max_size: u64) -> Result<String, AppError> {
    if !req.content_type.starts_with("image/") {
        return Err(AppError::Validation(
            "Content type must be an image".into(),
        ));
    }

    let name = filename::validate_upload_filename(&req.filename)
        .map_err(|msg| AppError::Validation(msg.into()))?;

    // Base64 grows data by 4/3, so the encoded length bounds the decoded
    // size without decoding anything.
    let max_encoded = max_size.div_ceil(3) * 4 + 4;
    if req.base64_data.len() as u64 > max_encoded {
        return Err(AppError::Validation(format!(
            "Image exceeds the maximum size of {max_size} bytes"
        )));
    }

    filename::image_extension(name, &req.content_type)
        .ok_or_else(|| AppError::Validation("Cannot determine the image file type".into()))
}

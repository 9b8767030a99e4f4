use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::{Engine, prelude::BASE64_STANDARD};
use sea_orm::*;
use tracing::instrument;

use crate::entity::post;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminSession;
use crate::extractors::json::AppJson;
use crate::models::posts::*;
use crate::models::shared::normalize_optional;
use crate::state::AppState;
use crate::utils::slug::slugify;
use crate::utils::text::estimate_read_time;

#[utoipa::path(
    get,
    path = "/",
    tag = "Posts",
    operation_id = "listPublishedPosts",
    summary = "List published posts",
    description = "Returns published posts, newest first, optionally filtered by section. Post content is omitted from list results.",
    params(PublicPostListQuery),
    responses(
        (status = 200, description = "List of posts", body = Vec<PostListItem>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_published_posts(
    State(state): State<AppState>,
    Query(query): Query<PublicPostListQuery>,
) -> Result<Json<Vec<PostListItem>>, AppError> {
    let mut select =
        post::Entity::find().filter(post::Column::Status.eq(PostStatus::Published.as_str()));

    if let Some(post_type) = parse_type_filter(query.post_type.as_deref())? {
        select = select.filter(post::Column::PostType.eq(post_type.as_str()));
    }

    let data = list_columns(select)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .into_model::<PostListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(data))
}

#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Posts",
    operation_id = "getPostBySlug",
    summary = "Get a published post by slug",
    description = "Returns the full post, including its content. Drafts are not visible here.",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(slug = %slug))]
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let model = find_published_post_by_slug(&state.db, &slug).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin Posts",
    operation_id = "listPosts",
    summary = "List all posts",
    description = "Returns every post, drafts included, newest first. Set `published_only=true` to mirror what the public list shows.",
    params(AdminPostListQuery),
    responses(
        (status = 200, description = "List of posts", body = Vec<PostListItem>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, query), fields(admin = %session.username))]
pub async fn list_posts(
    session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AdminPostListQuery>,
) -> Result<Json<Vec<PostListItem>>, AppError> {
    let mut select = post::Entity::find();

    if let Some(post_type) = parse_type_filter(query.post_type.as_deref())? {
        select = select.filter(post::Column::PostType.eq(post_type.as_str()));
    }
    if query.published_only.unwrap_or(false) {
        select = select.filter(post::Column::Status.eq(PostStatus::Published.as_str()));
    }

    let data = list_columns(select)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .into_model::<PostListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Admin Posts",
    operation_id = "createPost",
    summary = "Create a new post",
    description = "Creates a post with a slug derived from the title. When the slug is already taken, a numeric suffix is appended. Posts default to `draft` unless `status` says otherwise; publishing at creation stamps `published_at`.",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Slug already in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(admin = %session.username, title = %payload.title))]
pub async fn create_post(
    session: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_post(&payload)?;

    let title = payload.title.trim().to_string();
    let slug = unique_slug(&state.db, &title).await?;
    let read_time = estimate_read_time(&payload.content);

    let author_name = match payload.author_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => state.config.content.default_author.clone(),
    };

    let now = chrono::Utc::now();
    let new_post = post::ActiveModel {
        slug: Set(slug),
        title: Set(title),
        content: Set(payload.content),
        excerpt: Set(normalize_optional(payload.excerpt)),
        category: Set(normalize_optional(payload.category)),
        featured_image: Set(normalize_optional(payload.featured_image)),
        author_name: Set(author_name),
        post_type: Set(payload.post_type.as_str().to_string()),
        status: Set(payload.status.as_str().to_string()),
        read_time: Set(read_time),
        published_at: Set((payload.status == PostStatus::Published).then_some(now)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_post
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Slug race condition: unique constraint caught on insert");
                AppError::Conflict("A post with this slug already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Admin Posts",
    operation_id = "getPost",
    summary = "Get a post by ID",
    description = "Returns the full details of a post regardless of its status.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(admin = %session.username, id))]
pub async fn get_post(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let model = find_post(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admin Posts",
    operation_id = "updatePost",
    summary = "Update an existing post",
    description = "Partially updates a post using PATCH semantics; only provided fields are modified. `excerpt`, `category` and `featured_image` accept an explicit null to clear the field. The slug never changes. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(admin = %session.username, id))]
pub async fn update_post(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    validate_update_post(&payload)?;

    if payload == UpdatePostRequest::default() {
        let existing = find_post(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    let had_published_at = existing.published_at.is_some();
    let mut active: post::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        // The slug stays as derived at creation, so published URLs keep
        // working across title edits.
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.read_time = Set(estimate_read_time(&content));
        active.content = Set(content);
    }
    match payload.excerpt {
        Some(Some(excerpt)) => active.excerpt = Set(normalize_optional(Some(excerpt))),
        Some(None) => active.excerpt = Set(None),
        None => {}
    }
    match payload.category {
        Some(Some(category)) => active.category = Set(normalize_optional(Some(category))),
        Some(None) => active.category = Set(None),
        None => {}
    }
    match payload.featured_image {
        Some(Some(url)) => active.featured_image = Set(normalize_optional(Some(url))),
        Some(None) => active.featured_image = Set(None),
        None => {}
    }
    if let Some(ref author) = payload.author_name {
        active.author_name = Set(author.trim().to_string());
    }
    if let Some(post_type) = payload.post_type {
        active.post_type = Set(post_type.as_str().to_string());
    }
    if let Some(status) = payload.status {
        active.status = Set(status.as_str().to_string());
        // The first publish stamps the date; unpublishing and later
        // republishing keep the original one.
        if status == PostStatus::Published && !had_published_at {
            active.published_at = Set(Some(chrono::Utc::now()));
        }
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admin Posts",
    operation_id = "deletePost",
    summary = "Delete a post by ID",
    description = "Permanently deletes a post. Images it referenced stay in media storage.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(admin = %session.username, id))]
pub async fn delete_post(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    post::Entity::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/images",
    tag = "Admin Posts",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores a base64-encoded image and returns its public URL. Identical content deduplicates to the same URL. Body limit: 16 MB.",
    request_body = UploadImageRequest,
    responses(
        (status = 201, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(admin = %session.username, filename = %payload.filename))]
pub async fn upload_image(
    session: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let extension = validate_upload_image(&payload, state.config.storage.max_upload_size)?;

    let data = BASE64_STANDARD
        .decode(payload.base64_data.as_bytes())
        .map_err(|_| AppError::Validation("Invalid base64 data".into()))?;

    let stored = state.media.put(&data, &extension).await?;

    let url = format!(
        "{}/{}",
        state.config.storage.public_base_url.trim_end_matches('/'),
        stored.path
    );

    Ok((StatusCode::CREATED, Json(UploadImageResponse { url })))
}

/// Body limit layer for the image upload route (16MB).
pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(16 * 1024 * 1024)
}

/// Parse the optional `type` query parameter.
fn parse_type_filter(raw: Option<&str>) -> Result<Option<PostType>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => PostType::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::Validation("type must be one of: news, blog".into())),
    }
}

/// Restrict a post query to the columns in `PostListItem`.
fn list_columns(select: Select<post::Entity>) -> Select<post::Entity> {
    select
        .select_only()
        .column(post::Column::Id)
        .column(post::Column::Slug)
        .column(post::Column::Title)
        .column(post::Column::Excerpt)
        .column(post::Column::Category)
        .column(post::Column::FeaturedImage)
        .column(post::Column::AuthorName)
        .column_as(post::Column::PostType, "post_type")
        .column(post::Column::Status)
        .column(post::Column::ReadTime)
        .column(post::Column::PublishedAt)
        .column(post::Column::CreatedAt)
        .column(post::Column::UpdatedAt)
}

/// Derive a slug from the title, appending a numeric suffix until free.
async fn unique_slug<C: ConnectionTrait>(db: &C, title: &str) -> Result<String, AppError> {
    let base = slugify(title);

    let mut candidate = base.clone();
    let mut n = 2u32;
    while post::Entity::find()
        .filter(post::Column::Slug.eq(&candidate))
        .count(db)
        .await?
        > 0
    {
        candidate = format!("{base}-{n}");
        n += 1;
    }

    Ok(candidate)
}

async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

async fn find_published_post_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<post::Model, AppError> {
    post::Entity::find()
        .filter(post::Column::Slug.eq(slug))
        .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

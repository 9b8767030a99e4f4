use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/contact", contact_routes())
        .nest("/posts", public_post_routes())
        .nest("/admin/posts", admin_post_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::contact::submit_contact))
}

fn public_post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::posts::list_published_posts))
        .routes(routes!(handlers::posts::get_post_by_slug))
}

fn admin_post_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(
            handlers::posts::list_posts,
            handlers::posts::create_post
        ))
        .routes(routes!(
            handlers::posts::get_post,
            handlers::posts::update_post,
            handlers::posts::delete_post
        ));

    let images = OpenApiRouter::new()
        .routes(routes!(handlers::posts::upload_image))
        .layer(handlers::posts::image_upload_body_limit());

    crud.merge(images)
}

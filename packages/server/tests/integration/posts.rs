use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_a_draft_post() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Factory Tour Highlights",
                    "content": "A look inside our SMT lines.",
                    "type": "blog",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["slug"], "factory-tour-highlights");
        assert_eq!(res.body["title"], "Factory Tour Highlights");
        assert_eq!(res.body["type"], "blog");
        assert_eq!(res.body["status"], "draft");
        assert_eq!(res.body["author_name"], "Lumino Team");
        assert_eq!(res.body["read_time"], 1);
        assert!(res.body["published_at"].is_null());
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn creating_a_published_post_stamps_published_at() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Launch Day",
                    "content": "We are live.",
                    "type": "news",
                    "status": "published",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["status"], "published");
        assert!(res.body["published_at"].is_string());
    }

    #[tokio::test]
    async fn same_title_gets_numeric_slug_suffixes() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let first = app
            .create_post(&token, "Assembly Line Upgrade", "news", "draft")
            .await;
        let second = app
            .create_post(&token, "Assembly Line Upgrade", "news", "draft")
            .await;
        let third = app
            .create_post(&token, "Assembly Line Upgrade", "news", "draft")
            .await;

        let slugs = [first, second, third];
        let mut seen = Vec::new();
        for id in slugs {
            let res = app.get_with_token(&routes::admin_post(id), &token).await;
            seen.push(res.body["slug"].as_str().unwrap().to_string());
        }
        assert_eq!(
            seen,
            [
                "assembly-line-upgrade",
                "assembly-line-upgrade-2",
                "assembly-line-upgrade-3"
            ]
        );
    }

    #[tokio::test]
    async fn title_whitespace_is_trimmed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "  Padded Title  ",
                    "content": "Body.",
                    "type": "news",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["title"], "Padded Title");
        assert_eq!(res.body["slug"], "padded-title");
    }

    #[tokio::test]
    async fn cannot_create_a_post_with_a_blank_title() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({"title": "   ", "content": "Body.", "type": "news"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_post_type_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({"title": "Podcast Pilot", "content": "Body.", "type": "podcast"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn author_name_override_is_kept() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Guest Column",
                    "content": "Body.",
                    "type": "blog",
                    "author_name": "Maria Santos",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["author_name"], "Maria Santos");
    }

    #[tokio::test]
    async fn read_time_scales_with_content_length() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Long Read",
                    "content": "word ".repeat(450),
                    "type": "blog",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["read_time"], 3);
    }

    #[tokio::test]
    async fn cannot_create_a_post_without_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::ADMIN_POSTS,
                &json!({"title": "Nope", "content": "Body.", "type": "news"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn public_list_hides_drafts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Hidden Draft", "news", "draft").await;
        app.create_post(&token, "Visible Story", "news", "published")
            .await;

        let res = app.get_without_token(routes::POSTS).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["slug"], "visible-story");
    }

    #[tokio::test]
    async fn list_items_do_not_include_the_full_content() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Visible Story", "news", "published")
            .await;

        let res = app.get_without_token(routes::POSTS).await;

        assert_eq!(res.status, 200);
        let item = &res.body.as_array().unwrap()[0];
        assert!(
            item.get("content").is_none(),
            "Full content should not be in list"
        );
        assert!(item.get("read_time").is_some());
    }

    #[tokio::test]
    async fn public_list_can_filter_by_type() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Plant Expansion", "news", "published")
            .await;
        app.create_post(&token, "Soldering Deep Dive", "blog", "published")
            .await;

        let res = app
            .get_without_token(&routes::posts_with_type("news"))
            .await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], "news");
    }

    #[tokio::test]
    async fn unknown_type_filter_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::posts_with_type("podcast"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn newest_posts_come_first() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Post A", "news", "published").await;
        app.create_post(&token, "Post B", "news", "published").await;

        let res = app.get_without_token(routes::POSTS).await;

        let items = res.body.as_array().unwrap();
        assert_eq!(items[0]["slug"], "post-b");
        assert_eq!(items[1]["slug"], "post-a");
    }

    #[tokio::test]
    async fn admin_list_includes_drafts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Hidden Draft", "news", "draft").await;
        app.create_post(&token, "Visible Story", "news", "published")
            .await;

        let res = app.get_with_token(routes::ADMIN_POSTS, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn admin_list_can_hide_drafts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Hidden Draft", "news", "draft").await;
        app.create_post(&token, "Visible Story", "news", "published")
            .await;

        let res = app
            .get_with_token(
                &format!("{}?published_only=true", routes::ADMIN_POSTS),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["status"], "published");
    }

    #[tokio::test]
    async fn admin_list_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ADMIN_POSTS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod retrieval {
    use super::*;

    #[tokio::test]
    async fn published_post_is_served_by_slug() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Factory Tour Highlights", "blog", "published")
            .await;

        let res = app
            .get_without_token(&routes::post_by_slug("factory-tour-highlights"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Factory Tour Highlights");
        assert_eq!(res.body["content"], "Full post body, short but real.");
    }

    #[tokio::test]
    async fn draft_post_is_not_publicly_visible() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_post(&token, "Unfinished Piece", "blog", "draft")
            .await;

        let res = app
            .get_without_token(&routes::post_by_slug("unfinished-piece"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_slug_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::post_by_slug("no-such-post"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn admin_can_fetch_a_draft_by_id() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Unfinished Piece", "blog", "draft")
            .await;

        let res = app.get_with_token(&routes::admin_post(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "draft");
        assert_eq!(res.body["content"], "Full post body, short but real.");
    }

    #[tokio::test]
    async fn admin_get_for_a_missing_id_returns_404() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .get_with_token(&routes::admin_post(99999), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn patch_merges_only_provided_fields() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Quality Report", "news", "draft")
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_post(id),
                &json!({"category": "Engineering"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["category"], "Engineering");
        assert_eq!(res.body["title"], "Quality Report");
        assert_ne!(res.body["updated_at"], res.body["created_at"]);
    }

    #[tokio::test]
    async fn first_publish_stamps_the_date_once() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Launch Notes", "news", "draft")
            .await;

        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({"status": "published"}), &token)
            .await;
        assert_eq!(res.status, 200);
        let stamp = res.body["published_at"].clone();
        assert!(stamp.is_string());

        // Unpublishing keeps the original stamp.
        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({"status": "draft"}), &token)
            .await;
        assert_eq!(res.body["status"], "draft");
        assert_eq!(res.body["published_at"], stamp);

        // Republishing does not move it either.
        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({"status": "published"}), &token)
            .await;
        assert_eq!(res.body["status"], "published");
        assert_eq!(res.body["published_at"], stamp);
    }

    #[tokio::test]
    async fn explicit_null_clears_an_optional_field() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Teased Story",
                    "content": "Body.",
                    "excerpt": "Short teaser",
                    "type": "blog",
                }),
                &token,
            )
            .await;
        assert_eq!(res.body["excerpt"], "Short teaser");
        let id = res.id();

        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({"excerpt": null}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["excerpt"].is_null());
    }

    #[tokio::test]
    async fn empty_patch_returns_the_post_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Quiet Post", "news", "draft")
            .await;
        let before = app.get_with_token(&routes::admin_post(id), &token).await;

        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["updated_at"], before.body["updated_at"]);
    }

    #[tokio::test]
    async fn slug_is_not_changed_by_a_title_update() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "First Title", "blog", "published")
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_post(id),
                &json!({"title": "Second Title"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Second Title");
        assert_eq!(res.body["slug"], "first-title");
    }

    #[tokio::test]
    async fn content_update_recomputes_read_time() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Growing Article", "blog", "draft")
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_post(id),
                &json!({"content": "word ".repeat(650)}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["read_time"], 4);
    }

    #[tokio::test]
    async fn invalid_patch_data_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Valid Post", "news", "draft")
            .await;

        let res = app
            .patch_with_token(&routes::admin_post(id), &json!({"title": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn updating_a_missing_post_returns_404() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .patch_with_token(&routes::admin_post(99999), &json!({"title": "X"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_requires_a_token() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Protected Post", "news", "draft")
            .await;

        let res = app
            .client
            .patch(format!("http://{}{}", app.addr, routes::admin_post(id)))
            .json(&json!({"title": "Hijacked"}))
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn admin_can_delete_a_post() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Short Lived", "news", "published")
            .await;

        let res = app.delete_with_token(&routes::admin_post(id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::admin_post(id), &token).await;
        assert_eq!(res.status, 404);

        let res = app
            .get_without_token(&routes::post_by_slug("short-lived"))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_missing_post_returns_404() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .delete_with_token(&routes::admin_post(99999), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_requires_a_token() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app
            .create_post(&token, "Protected Post", "news", "draft")
            .await;

        let res = app
            .client
            .delete(format!("http://{}{}", app.addr, routes::admin_post(id)))
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod end_to_end {
    use super::*;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 1];

    #[tokio::test]
    async fn draft_to_published_flow() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ADMIN_POSTS,
                &json!({
                    "title": "Inside Our New SMT Line",
                    "content": "The new line doubles placement throughput.",
                    "excerpt": "A tour of the upgrade",
                    "category": "Manufacturing",
                    "type": "blog",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();
        let slug = res.body["slug"].as_str().unwrap().to_string();

        // Still a draft, so the public site cannot see it.
        let res = app.get_without_token(&routes::post_by_slug(&slug)).await;
        assert_eq!(res.status, 404);

        let res = app
            .upload_image(&token, "cover.png", "image/png", PNG_BYTES)
            .await;
        assert_eq!(res.status, 201);
        let url = res.body["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/"), "unexpected url: {url}");

        let res = app
            .patch_with_token(
                &routes::admin_post(id),
                &json!({"featured_image": url, "status": "published"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200);

        let res = app.get_without_token(&routes::post_by_slug(&slug)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["featured_image"], url);
        assert!(res.body["published_at"].is_string());
        assert_eq!(
            res.body["content"],
            "The new line doubles placement throughput."
        );

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, url))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.bytes().await.expect("body bytes").as_ref(), PNG_BYTES);

        let res = app.get_without_token(&routes::posts_with_type("blog")).await;
        let items = res.body.as_array().unwrap();
        assert!(items.iter().any(|p| p["slug"] == slug));
    }
}

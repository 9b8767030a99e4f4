use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use base64::{Engine, prelude::BASE64_STANDARD};
use common::mail::memory::MemoryMailer;
use common::mail::{MailError, Mailer, OutboundEmail};
use common::storage::MediaStore;
use common::storage::filesystem::FsMediaStore;
use reqwest::Client;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{
    AppConfig, AuthConfig, ContentConfig, CorsConfig, DatabaseConfig, MailConfig, ServerConfig,
    StorageConfig,
};
use server::state::AppState;

/// Upload limit used by the test configuration (5 MB).
pub const MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const CONTACT: &str = "/api/v1/contact";
    pub const POSTS: &str = "/api/v1/posts";
    pub const ADMIN_POSTS: &str = "/api/v1/admin/posts";
    pub const UPLOAD_IMAGE: &str = "/api/v1/admin/posts/images";

    pub fn post_by_slug(slug: &str) -> String {
        format!("/api/v1/posts/{slug}")
    }

    pub fn posts_with_type(post_type: &str) -> String {
        format!("/api/v1/posts?type={post_type}")
    }

    pub fn admin_post(id: i32) -> String {
        format!("/api/v1/admin/posts/{id}")
    }
}

/// Mailer that always fails, for exercising the contact pipeline when
/// notifications cannot be delivered.
struct FailingMailer;

#[async_trait::async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailError> {
        Err(MailError::Rejected("mailer is broken".into()))
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    /// Captures notification emails when spawned with the default mailer.
    pub outbox: Arc<MemoryMailer>,
    pub media_root: PathBuf,
    _media_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config(media_dir: PathBuf) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-for-integration-tests".to_string(),
            admin_username: "admin".to_string(),
            admin_password: Some("adminpass".to_string()),
        },
        content: ContentConfig {
            default_author: "Lumino Team".to_string(),
        },
        storage: StorageConfig {
            media_dir,
            max_upload_size: MAX_UPLOAD_SIZE,
            public_base_url: "/uploads".to_string(),
        },
        mail: MailConfig {
            enabled: false,
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 587,
            use_tls: false,
            username: None,
            password: None,
            from_address: "Lumino <no-reply@lumino.example>".to_string(),
            notify_address: "contact@lumino.example".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::build(None).await
    }

    /// Like `spawn`, but every notification send fails.
    pub async fn spawn_with_broken_mailer() -> Self {
        Self::build(Some(Arc::new(FailingMailer))).await
    }

    async fn build(mailer_override: Option<Arc<dyn Mailer>>) -> Self {
        // A single pooled connection keeps the in-memory database alive and
        // shared between the server and the test's own queries.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");
        db.get_schema_registry("server::entity::*")
            .sync(&db)
            .await
            .expect("Failed to sync schema");

        let media_dir = tempfile::tempdir().expect("Failed to create media dir");
        let media_root = media_dir.path().join("media");

        let config = test_config(media_root.clone());
        server::seed::seed_admin_user(&db, &config.auth)
            .await
            .expect("Failed to seed admin user");

        let media: Arc<dyn MediaStore> = Arc::new(
            FsMediaStore::new(media_root.clone(), config.storage.max_upload_size)
                .await
                .expect("Failed to create media store"),
        );

        let outbox = Arc::new(MemoryMailer::new());
        let mailer: Arc<dyn Mailer> = match mailer_override {
            Some(mailer) => mailer,
            None => outbox.clone(),
        };

        let state = AppState {
            db: db.clone(),
            config,
            media,
            mailer,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            outbox,
            media_root,
            _media_dir: media_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Log in as the seeded admin and return the auth token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"username": "admin", "password": "adminpass"}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a post via the API and return its `id`.
    pub async fn create_post(
        &self,
        token: &str,
        title: &str,
        post_type: &str,
        status: &str,
    ) -> i32 {
        let res = self
            .post_with_token(
                routes::ADMIN_POSTS,
                &serde_json::json!({
                    "title": title,
                    "content": "Full post body, short but real.",
                    "type": post_type,
                    "status": status,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_post failed: {}", res.text);
        res.id()
    }

    /// Upload an image through the admin endpoint.
    pub async fn upload_image(
        &self,
        token: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> TestResponse {
        self.post_with_token(
            routes::UPLOAD_IMAGE,
            &serde_json::json!({
                "filename": filename,
                "content_type": content_type,
                "base64_data": BASE64_STANDARD.encode(bytes),
            }),
            token,
        )
        .await
    }

    /// Number of media objects on disk, ignoring temp scratch space.
    pub fn stored_media_count(&self) -> usize {
        let Ok(shards) = std::fs::read_dir(&self.media_root) else {
            return 0;
        };

        let mut count = 0;
        for shard in shards.flatten() {
            if shard.file_name() == ".tmp" {
                continue;
            }
            if let Ok(objects) = std::fs::read_dir(shard.path()) {
                count += objects.flatten().count();
            }
        }
        count
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Username of the admin account seeded at startup.
    pub admin_username: String,
    /// Initial password for the seeded admin. When unset, no admin is seeded.
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Byline applied to posts created without an explicit author.
    pub default_author: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded media files.
    pub media_dir: PathBuf,
    /// Maximum decoded upload size in bytes.
    pub max_upload_size: u64,
    /// Prefix for URLs handed back to clients. Point this at a CDN if the
    /// media directory is mirrored there; uploads are always served locally
    /// under `/uploads`.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// When false, notification emails are logged instead of sent.
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender mailbox, e.g. `Lumino <no-reply@lumino.example>`.
    pub from_address: String,
    /// Inbox that receives contact form notifications.
    pub notify_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://lumino.db?mode=rwc")?
            .set_default("auth.admin_username", "admin")?
            .set_default("content.default_author", "Lumino Team")?
            .set_default("storage.media_dir", "./data/uploads")?
            .set_default("storage.max_upload_size", 5 * 1024 * 1024)?
            .set_default("storage.public_base_url", "/uploads")?
            .set_default("mail.enabled", false)?
            .set_default("mail.smtp_host", "127.0.0.1")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.use_tls", true)?
            .set_default("mail.from_address", "Lumino <no-reply@lumino.example>")?
            .set_default("mail.notify_address", "contact@lumino.example")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LUMINO__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("LUMINO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

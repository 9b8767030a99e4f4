use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::mail::Mailer;
use common::mail::console::ConsoleMailer;
use common::mail::smtp::{SmtpMailer, SmtpOptions};
use common::storage::MediaStore;
use common::storage::filesystem::FsMediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::init_db;
use server::seed::seed_admin_user;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to the database")?;
    seed_admin_user(&db, &config.auth).await?;

    let media: Arc<dyn MediaStore> = Arc::new(
        FsMediaStore::new(
            config.storage.media_dir.clone(),
            config.storage.max_upload_size,
        )
        .await
        .context("Failed to prepare media storage")?,
    );

    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        let options = SmtpOptions {
            host: config.mail.smtp_host.clone(),
            port: config.mail.smtp_port,
            username: config.mail.username.clone(),
            password: config.mail.password.clone(),
            use_tls: config.mail.use_tls,
        };
        Arc::new(
            SmtpMailer::new(&options, &config.mail.from_address)
                .context("Failed to build SMTP transport")?,
        )
    } else {
        info!("Mail is disabled, contact notifications are logged only");
        Arc::new(ConsoleMailer)
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host or server.port")?;

    let state = AppState {
        db,
        config,
        media,
        mailer,
    };
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

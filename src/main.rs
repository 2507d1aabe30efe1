use anyhow::{Context, Result};
use pressrelay::application::commands::articles::{ArticleCommandService, PublishArticleCommand};
use pressrelay::application::ports::{
    ClockPort, CredentialSourcePort, DocumentStorePort, SyncReportSinkPort,
};
use pressrelay::application::syndication::{PlatformRegistry, SyndicationDispatcher, SyndicationQueue};
use pressrelay::config::AppConfig;
use pressrelay::domain::article::ArticleMetadataRepository;
use pressrelay::infrastructure::credentials::JsonFileCredentialSource;
use pressrelay::infrastructure::database;
use pressrelay::infrastructure::document_store::FsDocumentStore;
use pressrelay::infrastructure::observability::TracingReportSink;
use pressrelay::infrastructure::platforms::{
    WeChatPublisher, XiaohongshuPublisher, ZhihuPublisher,
};
use pressrelay::infrastructure::repositories::SqliteArticleMetadataRepository;
use pressrelay::infrastructure::time::SystemClock;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let slug = std::env::args()
        .nth(1)
        .context("usage: pressrelay <slug>")?;

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;
    let pool = Arc::new(pool);

    let documents = FsDocumentStore::new(config.articles_dir());
    documents.ensure_dir().await?;
    let documents: Arc<DocumentStorePort> = Arc::new(documents);
    let metadata: Arc<dyn ArticleMetadataRepository> =
        Arc::new(SqliteArticleMetadataRepository::new(Arc::clone(&pool)));
    let clock: Arc<ClockPort> = Arc::new(SystemClock);

    let registry = Arc::new(
        PlatformRegistry::new()
            .with(Arc::new(WeChatPublisher::new()))
            .with(Arc::new(ZhihuPublisher::new()))
            .with(Arc::new(XiaohongshuPublisher::new())),
    );
    let dispatcher = Arc::new(SyndicationDispatcher::new(
        registry,
        config.syndication_settings(),
        Arc::clone(&clock),
    ));
    let credentials: Arc<CredentialSourcePort> =
        Arc::new(JsonFileCredentialSource::new(config.credentials_path()));
    let sink: Arc<SyncReportSinkPort> = Arc::new(TracingReportSink);
    let queue = SyndicationQueue::start(dispatcher, credentials, sink, config.queue_settings());

    let service = ArticleCommandService::new(documents, metadata, Arc::clone(&queue), clock);
    let receipt = service
        .publish_article(PublishArticleCommand { slug })
        .await?;
    tracing::info!(
        slug = %receipt.slug,
        lastmod = %receipt.lastmod,
        platforms = receipt.platforms.len(),
        queued = receipt.syndication_queued,
        "article published"
    );

    // Drain in-flight syndication before exit; ctrl-c abandons the wait.
    tokio::select! {
        () = queue.shutdown() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted before syndication drain completed");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,sqlx=warn,reqwest=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

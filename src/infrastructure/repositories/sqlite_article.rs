use crate::domain::article::{
    ArticleMetadata, ArticleMetadataRepository, ArticleSlug, PlatformId,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

fn map_error(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

#[derive(Clone)]
pub struct SqliteArticleMetadataRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteArticleMetadataRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleMetadataRow {
    slug: String,
    title: String,
    category: Option<String>,
    draft: i64,
    platforms: String,
    date: Option<String>,
    lastmod: Option<String>,
    synced_at: DateTime<Utc>,
}

fn parse_date_column(value: Option<String>, column: &str) -> DomainResult<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|_| {
                DomainError::Persistence(format!("column {column} holds invalid date '{v}'"))
            })
        })
        .transpose()
}

impl TryFrom<ArticleMetadataRow> for ArticleMetadata {
    type Error = DomainError;

    fn try_from(row: ArticleMetadataRow) -> Result<Self, Self::Error> {
        let platforms: Vec<String> = serde_json::from_str(&row.platforms).map_err(|err| {
            DomainError::Persistence(format!("platforms column is not a JSON list: {err}"))
        })?;
        let platforms = platforms
            .into_iter()
            .map(PlatformId::new)
            .collect::<DomainResult<_>>()?;

        Ok(ArticleMetadata {
            slug: ArticleSlug::new(row.slug)?,
            title: row.title,
            category: row.category,
            draft: row.draft != 0,
            platforms,
            date: parse_date_column(row.date, "date")?,
            lastmod: parse_date_column(row.lastmod, "lastmod")?,
            synced_at: row.synced_at,
        })
    }
}

#[async_trait]
impl ArticleMetadataRepository for SqliteArticleMetadataRepository {
    async fn get(&self, slug: &ArticleSlug) -> DomainResult<Option<ArticleMetadata>> {
        let row = sqlx::query_as::<_, ArticleMetadataRow>(
            "SELECT slug, title, category, draft, platforms, date, lastmod, synced_at FROM articles WHERE slug = ?",
        )
        .bind(slug.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_error)?;

        row.map(ArticleMetadata::try_from).transpose()
    }

    async fn upsert(&self, metadata: &ArticleMetadata) -> DomainResult<()> {
        let platforms: Vec<&str> = metadata.platforms.iter().map(PlatformId::as_str).collect();
        let platforms = serde_json::to_string(&platforms)
            .map_err(|err| DomainError::Persistence(err.to_string()))?;

        sqlx::query(
            "INSERT INTO articles (slug, title, category, draft, platforms, date, lastmod, synced_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(slug) DO UPDATE SET \
             title = excluded.title, category = excluded.category, draft = excluded.draft, \
             platforms = excluded.platforms, date = excluded.date, lastmod = excluded.lastmod, \
             synced_at = excluded.synced_at",
        )
        .bind(metadata.slug.as_str())
        .bind(&metadata.title)
        .bind(metadata.category.as_deref())
        .bind(i64::from(metadata.draft))
        .bind(platforms)
        .bind(metadata.date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(metadata.lastmod.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(metadata.synced_at)
        .execute(&*self.pool)
        .await
        .map_err(map_error)?;

        Ok(())
    }
}

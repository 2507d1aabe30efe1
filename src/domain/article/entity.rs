// src/domain/article/entity.rs
use crate::domain::article::value_objects::{ArticleSlug, ArticleTitle, PlatformId};
use crate::domain::document::{Document, FieldValue};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, Utc};

/// Typed view of an on-disk article document. The document is the source of
/// truth; this projection exists so the syndication pipeline and the metadata
/// mirror never re-parse front matter themselves.
#[derive(Debug, Clone)]
pub struct Article {
    pub slug: ArticleSlug,
    pub title: ArticleTitle,
    pub body: String,
    pub category: Option<String>,
    pub platforms: Vec<PlatformId>,
    pub draft: bool,
    pub date: Option<NaiveDate>,
    pub lastmod: Option<NaiveDate>,
}

impl Article {
    pub fn from_document(slug: ArticleSlug, document: &Document) -> DomainResult<Self> {
        let fm = document.front_matter();

        let title = fm
            .get_str("title")
            .ok_or_else(|| DomainError::Validation("document has no title field".into()))?;
        let title = ArticleTitle::new(title)?;

        let category = fm
            .get_str("category")
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let platforms = match fm.get("platforms") {
            None => Vec::new(),
            Some(FieldValue::List(items)) => items
                .iter()
                .map(|item| PlatformId::new(item.clone()))
                .collect::<DomainResult<_>>()?,
            Some(FieldValue::Scalar(value)) if value.is_empty() => Vec::new(),
            // A single scalar platform is accepted the way Hugo accepts a
            // one-element taxonomy written without list syntax.
            Some(FieldValue::Scalar(value)) => vec![PlatformId::new(value.clone())?],
        };

        let draft = match fm.get_str("draft") {
            None => true,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                return Err(DomainError::Validation(format!(
                    "draft field must be true or false, got '{other}'"
                )));
            }
        };

        Ok(Self {
            slug,
            title,
            body: document.body().to_string(),
            category,
            platforms,
            draft,
            date: parse_date_field(fm.get_str("date"), "date")?,
            lastmod: parse_date_field(fm.get_str("lastmod"), "lastmod")?,
        })
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }
}

fn parse_date_field(value: Option<&str>, key: &str) -> DomainResult<Option<NaiveDate>> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    // Hugo documents frequently carry full RFC 3339 timestamps.
    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| {
            DomainError::Validation(format!("field '{key}' is not a date, got '{value}'"))
        })
}

/// Row shape mirrored into the relational store after a publish. Reflects
/// last-synced-from-disk state, never a second source of truth.
#[derive(Debug, Clone)]
pub struct ArticleMetadata {
    pub slug: ArticleSlug,
    pub title: String,
    pub category: Option<String>,
    pub draft: bool,
    pub platforms: Vec<PlatformId>,
    pub date: Option<NaiveDate>,
    pub lastmod: Option<NaiveDate>,
    pub synced_at: DateTime<Utc>,
}

impl ArticleMetadata {
    pub fn from_article(article: &Article, synced_at: DateTime<Utc>) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.as_str().to_string(),
            category: article.category.clone(),
            draft: article.draft,
            platforms: article.platforms.clone(),
            date: article.date,
            lastmod: article.lastmod,
            synced_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Document {
        Document::parse(raw).unwrap()
    }

    #[test]
    fn projects_full_document() {
        let doc = parse(
            "---\ntitle: Hello\ncategory: tech\nplatforms:\n  - wechat\n  - zhihu\ndraft: true\ndate: 2024-03-01\n---\nBody text.\n",
        );
        let article = Article::from_document(ArticleSlug::new("hello").unwrap(), &doc).unwrap();
        assert_eq!(article.title.as_str(), "Hello");
        assert_eq!(article.category.as_deref(), Some("tech"));
        assert_eq!(
            article.platforms,
            vec![
                PlatformId::new("wechat").unwrap(),
                PlatformId::new("zhihu").unwrap()
            ]
        );
        assert!(article.is_draft());
        assert_eq!(article.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(article.lastmod, None);
        assert_eq!(article.body, "Body text.\n");
    }

    #[test]
    fn draft_defaults_to_true_when_absent() {
        let doc = parse("---\ntitle: Hello\n---\n");
        let article = Article::from_document(ArticleSlug::new("hello").unwrap(), &doc).unwrap();
        assert!(article.draft);
        assert!(article.platforms.is_empty());
    }

    #[test]
    fn missing_title_is_rejected() {
        let doc = parse("---\ndraft: false\n---\nbody\n");
        let err = Article::from_document(ArticleSlug::new("x").unwrap(), &doc).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rfc3339_date_is_accepted() {
        let doc = parse("---\ntitle: T\ndate: 2024-03-01T12:30:00+08:00\n---\n");
        let article = Article::from_document(ArticleSlug::new("t").unwrap(), &doc).unwrap();
        assert_eq!(article.date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn scalar_platform_becomes_single_entry() {
        let doc = parse("---\ntitle: T\nplatforms: wechat\n---\n");
        let article = Article::from_document(ArticleSlug::new("t").unwrap(), &doc).unwrap();
        assert_eq!(article.platforms, vec![PlatformId::new("wechat").unwrap()]);
    }

    #[test]
    fn garbage_draft_value_is_rejected() {
        let doc = parse("---\ntitle: T\ndraft: maybe\n---\n");
        assert!(Article::from_document(ArticleSlug::new("t").unwrap(), &doc).is_err());
    }
}

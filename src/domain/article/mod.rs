pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{Article, ArticleMetadata};
pub use repository::ArticleMetadataRepository;
pub use value_objects::{ArticleSlug, ArticleTitle, PlatformId};

// src/application/commands/articles/mod.rs
mod locks;
mod publish;
mod service;

pub use publish::PublishArticleCommand;
pub use service::ArticleCommandService;

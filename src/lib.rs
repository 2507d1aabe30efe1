//! Publish-and-syndication core for a markdown CMS.
//!
//! Articles live on disk as front-matter documents; a publish flips
//! `draft` off, stamps `lastmod`, mirrors the metadata into SQLite, and
//! fans the article out to its target platforms on a background queue.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// src/infrastructure/credentials.rs
use crate::application::ports::credentials::{CredentialError, CredentialSource};
use crate::domain::article::PlatformId;
use crate::domain::syndication::{CredentialBundle, PlatformCredentialSet};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Credential file shaped like the operator config:
/// `{"wechat": {"app_id": "...", "app_secret": "..."}, "zhihu": {...}}`.
/// Read fresh on every syndication run. A platform entry that is not an
/// object of strings is skipped with a warning, so one bad entry degrades
/// only that platform.
pub struct JsonFileCredentialSource {
    path: PathBuf,
}

impl JsonFileCredentialSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialSource for JsonFileCredentialSource {
    async fn load(&self) -> Result<PlatformCredentialSet, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            CredentialError::Unreadable(format!("{}: {err}", self.path.display()))
        })?;

        let parsed: HashMap<String, Value> = serde_json::from_str(&raw)
            .map_err(|err| CredentialError::Malformed(err.to_string()))?;

        let mut set = PlatformCredentialSet::new();
        for (platform, entry) in parsed {
            let Ok(platform) = PlatformId::new(platform.clone()) else {
                tracing::warn!(platform = %platform, "skipping invalid platform id in credentials");
                continue;
            };
            let Some(fields) = entry.as_object() else {
                tracing::warn!(platform = %platform, "skipping non-object credential entry");
                continue;
            };

            let mut bundle = CredentialBundle::new();
            let mut valid = true;
            for (key, value) in fields {
                match value.as_str() {
                    Some(value) => bundle.insert(key.as_str(), value),
                    None => {
                        tracing::warn!(platform = %platform, field = %key, "skipping credential entry with non-string field");
                        valid = false;
                        break;
                    }
                }
            }
            if valid {
                set.insert(platform, bundle);
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pid(id: &str) -> PlatformId {
        PlatformId::new(id).unwrap()
    }

    async fn load(contents: &str) -> Result<PlatformCredentialSet, CredentialError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        JsonFileCredentialSource::new(file.path()).load().await
    }

    #[tokio::test]
    async fn loads_per_platform_bundles() {
        let set = load(
            r#"{"wechat": {"app_id": "wx1", "app_secret": "s"}, "zhihu": {"username": "u", "password": "p"}}"#,
        )
        .await
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&pid("wechat")).unwrap().get("app_id"), Some("wx1"));
        assert_eq!(set.get(&pid("zhihu")).unwrap().get("password"), Some("p"));
    }

    #[tokio::test]
    async fn bad_entry_degrades_only_that_platform() {
        let set = load(r#"{"wechat": "oops", "zhihu": {"username": "u"}}"#)
            .await
            .unwrap();
        assert!(set.get(&pid("wechat")).is_none());
        assert!(set.get(&pid("zhihu")).is_some());
    }

    #[tokio::test]
    async fn unreadable_file_errors() {
        let err = JsonFileCredentialSource::new("/nonexistent/config.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::Unreadable(_)));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let err = load("not json").await.unwrap_err();
        assert!(matches!(err, CredentialError::Malformed(_)));
    }
}

// src/domain/syndication/credentials.rs
use crate::domain::article::PlatformId;
use std::collections::HashMap;
use std::fmt;

/// Opaque credential material for one platform. The field set varies per
/// platform (app_id/app_secret vs username/password); the core only passes
/// the bundle through to the matching adapter.
#[derive(Clone, Default)]
pub struct CredentialBundle {
    fields: HashMap<String, String>,
}

impl CredentialBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for CredentialBundle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// Secrets must never reach logs, so Debug prints field names only.
impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CredentialBundle")
            .field("fields", &keys)
            .finish_non_exhaustive()
    }
}

/// Resolved credentials for one syndication run, keyed by platform. Loaded
/// fresh per run and shared read-only with the fan-out tasks.
#[derive(Debug, Clone, Default)]
pub struct PlatformCredentialSet {
    bundles: HashMap<PlatformId, CredentialBundle>,
}

impl PlatformCredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, platform: PlatformId, bundle: CredentialBundle) {
        self.bundles.insert(platform, bundle);
    }

    pub fn get(&self, platform: &PlatformId) -> Option<&CredentialBundle> {
        self.bundles.get(platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &PlatformId> {
        self.bundles.keys()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

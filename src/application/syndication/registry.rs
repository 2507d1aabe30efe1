// src/application/syndication/registry.rs
use crate::application::ports::PlatformPublisherPort;
use crate::domain::article::PlatformId;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps platform identifiers to their adapter, built once at startup.
/// Adding a platform means registering another implementation here; the
/// dispatcher never branches on platform names itself.
#[derive(Default)]
pub struct PlatformRegistry {
    adapters: HashMap<String, Arc<PlatformPublisherPort>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<PlatformPublisherPort>) {
        self.adapters.insert(adapter.id().to_string(), adapter);
    }

    pub fn with(mut self, adapter: Arc<PlatformPublisherPort>) -> Self {
        self.register(adapter);
        self
    }

    pub fn resolve(&self, platform: &PlatformId) -> Option<Arc<PlatformPublisherPort>> {
        self.adapters.get(platform.as_str()).map(Arc::clone)
    }

    pub fn platforms(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

// src/application/commands/articles/locks.rs
use crate::domain::article::ArticleSlug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per slug. Concurrent publishes of the same slug
/// serialise their read-mutate-write window; different slugs proceed
/// independently.
#[derive(Clone, Default)]
pub struct SlugLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SlugLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, slug: &ArticleSlug) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(slug.as_str().to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn same_slug_critical_sections_never_overlap() {
        let locks = SlugLocks::new();
        let slug = ArticleSlug::new("post").unwrap();
        let busy = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let slug = slug.clone();
            let busy = Arc::clone(&busy);
            let overlaps = Arc::clone(&overlaps);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(&slug).await;
                if busy.swap(true, Ordering::SeqCst) {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                busy.store(false, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn different_slugs_do_not_contend() {
        let locks = SlugLocks::new();
        let first = locks.acquire(&ArticleSlug::new("a").unwrap()).await;
        // Would deadlock if slugs shared a lock.
        let _second = locks.acquire(&ArticleSlug::new("b").unwrap()).await;
        drop(first);
    }
}

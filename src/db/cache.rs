use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::article::Article;
use crate::clustering::{Cluster, ClusterParams};
use crate::TARGET_DB;

/// Bumped whenever the serialized cluster layout changes.
pub const CACHE_VERSION: &str = "v2";

/// Hex SHA-256 over each article's title and summary, in order.
pub fn content_hash(articles: &[Article]) -> String {
    let mut hasher = Sha256::new();
    for article in articles {
        hasher.update(article.title.as_bytes());
        hasher.update(b"\n");
        hasher.update(article.summary.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Short digest of the extra company list, `-` when there is none.
///
/// Names are compared the way the extractor stores them: trimmed, lowercased,
/// blanks dropped. Order and duplicates do not matter.
pub fn companies_digest(companies: &[String]) -> String {
    let mut names: Vec<String> = companies
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    if names.is_empty() {
        return "-".to_string();
    }
    names.sort();
    names.dedup();

    let digest = format!("{:x}", Sha256::digest(names.join(";").as_bytes()));
    digest[..16].to_string()
}

/// Read-through memo of clustering results keyed by content hash and params.
///
/// Storage and parse failures are logged and reported as misses; nothing
/// here is surfaced to the caller as an error.
pub struct ClusterCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ClusterCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache_key(content_hash: &str, params: &ClusterParams) -> String {
        format!(
            "clusters:{}:{}:{:.4}:{}:{}:{}:{}:{}",
            CACHE_VERSION,
            content_hash,
            params.threshold,
            params.title_merge,
            params.scoring,
            params.generate_content,
            params.tag_limit,
            companies_digest(&params.extra_companies)
        )
    }

    pub async fn get(&self, content_hash: &str, params: &ClusterParams) -> Option<Vec<Cluster>> {
        let key = Self::cache_key(content_hash, params);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(target: TARGET_DB, "Cluster cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!(target: TARGET_DB, "Cluster cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<Cluster>>(&raw) {
            Ok(clusters) => {
                debug!(target: TARGET_DB, "Cluster cache hit for {} ({} clusters)", key, clusters.len());
                Some(clusters)
            }
            Err(e) => {
                warn!(target: TARGET_DB, "Discarding corrupt cache entry {}: {}", key, e);
                if let Err(e) = self.store.delete(&key).await {
                    warn!(target: TARGET_DB, "Failed to delete corrupt cache entry {}: {}", key, e);
                }
                None
            }
        }
    }

    pub async fn put(&self, content_hash: &str, params: &ClusterParams, clusters: &[Cluster]) {
        let key = Self::cache_key(content_hash, params);
        let raw = match serde_json::to_string(clusters) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(target: TARGET_DB, "Failed to serialize clusters for {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(&key, &raw).await {
            warn!(target: TARGET_DB, "Cluster cache write failed for {}: {}", key, e);
        }
    }

    pub async fn invalidate(&self, content_hash: &str, params: &ClusterParams) {
        let key = Self::cache_key(content_hash, params);
        if let Err(e) = self.store.delete(&key).await {
            warn!(target: TARGET_DB, "Cluster cache delete failed for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::cluster_articles;
    use crate::db::{Database, MemoryStore};
    use anyhow::anyhow;

    fn feed() -> Vec<Article> {
        vec![
            Article::new("1", "Apple unveils new iPhone lineup").with_summary("Three models"),
            Article::new("2", "Apple unveils new iPhone lineup").with_summary("Prices rise"),
            Article::new("3", "Heavy snow closes airports"),
        ]
    }

    #[test]
    fn test_content_hash_tracks_text() {
        let a = feed();
        let mut b = feed();
        assert_eq!(content_hash(&a), content_hash(&b));
        b[2].summary = "Delays expected".to_string();
        assert_ne!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&[]).len(), 64);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ClusterCache::new(MemoryStore::new());
        let articles = feed();
        let params = ClusterParams::default();
        let hash = content_hash(&articles);
        let clusters = cluster_articles(&articles, &params);

        assert!(cache.get(&hash, &params).await.is_none());
        cache.put(&hash, &params, &clusters).await;
        assert_eq!(cache.get(&hash, &params).await, Some(clusters));
    }

    #[tokio::test]
    async fn test_params_change_is_a_miss() {
        let cache = ClusterCache::new(MemoryStore::new());
        let articles = feed();
        let params = ClusterParams::default();
        let hash = content_hash(&articles);
        cache.put(&hash, &params, &cluster_articles(&articles, &params)).await;

        let other = ClusterParams {
            title_merge: true,
            ..params.clone()
        };
        assert!(cache.get(&hash, &other).await.is_none());
        assert!(cache.get("other-hash", &params).await.is_none());
    }

    #[tokio::test]
    async fn test_extra_companies_change_is_a_miss() {
        let cache = ClusterCache::new(MemoryStore::new());
        let articles = feed();
        let params = ClusterParams::default();
        let hash = content_hash(&articles);
        cache.put(&hash, &params, &cluster_articles(&articles, &params)).await;

        let with_acme = ClusterParams {
            extra_companies: vec!["Acme".to_string()],
            ..params.clone()
        };
        assert!(cache.get(&hash, &with_acme).await.is_none());

        let reordered = ClusterParams {
            extra_companies: vec![" acme ".to_string(), "ACME".to_string(), String::new()],
            ..params.clone()
        };
        assert_eq!(
            ClusterCache::<MemoryStore>::cache_key(&hash, &with_acme),
            ClusterCache::<MemoryStore>::cache_key(&hash, &reordered)
        );
    }

    #[test]
    fn test_companies_digest() {
        assert_eq!(companies_digest(&[]), "-");
        assert_eq!(companies_digest(&[" ".to_string()]), "-");
        let a = companies_digest(&["acme".to_string(), "globex".to_string()]);
        let b = companies_digest(&["Globex".to_string(), "acme".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, companies_digest(&["acme".to_string()]));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss_and_removed() {
        let cache = ClusterCache::new(MemoryStore::new());
        let params = ClusterParams::default();
        let key = ClusterCache::<MemoryStore>::cache_key("h", &params);
        cache.store().set(&key, "{not json").await.unwrap();

        assert!(cache.get("h", &params).await.is_none());
        assert!(cache.store().get(&key).await.unwrap().is_none());
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
        async fn delete(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_storage_errors_never_surface() {
        let cache = ClusterCache::new(BrokenStore);
        let params = ClusterParams::default();
        cache.put("h", &params, &[]).await;
        assert!(cache.get("h", &params).await.is_none());
        cache.invalidate("h", &params).await;
    }

    #[tokio::test]
    async fn test_sqlite_backed_cache() {
        let cache = ClusterCache::new(Database::in_memory().await.unwrap());
        let articles = feed();
        let params = ClusterParams::default();
        let hash = content_hash(&articles);
        let clusters = cluster_articles(&articles, &params);

        cache.put(&hash, &params, &clusters).await;
        assert_eq!(cache.get(&hash, &params).await, Some(clusters));
        cache.invalidate(&hash, &params).await;
        assert!(cache.get(&hash, &params).await.is_none());
    }
}

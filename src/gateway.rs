//! Offline cache gateway for site-shell resources.
//!
//! Generalizes the cache-first strategy of the leaderboard site: a fixed
//! allow-list of same-origin paths is fetched once at install time and
//! stored under a named cache directory. Requests are answered from the
//! cache when an exact path match exists, otherwise they fall through to
//! a live network fetch.
//!
//! The cache name is the only versioning mechanism: bumping it starts a
//! fresh directory and orphans the old one, which remains on disk until
//! manually cleared.

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::api::ApiClient;

/// Maximum concurrent fetches during install.
/// The precache list is small; 4 keeps install quick without hammering
/// the origin.
const MAX_CONCURRENT_INSTALL_FETCHES: usize = 4;

/// Name of the active cache generation.
pub const CACHE_NAME: &str = "leaderboard-cache-v1";

/// Same-origin paths pre-cached at install time.
pub const PRECACHE_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/style.css",
    "/script.js",
    "/icons/speedrun-icon-192.png",
    "/icons/speedrun-icon-512.png",
];

pub struct OfflineGateway {
    origin: String,
    cache_dir: PathBuf,
    api: ApiClient,
}

impl OfflineGateway {
    /// Create a gateway for `origin` with its cache under
    /// `<base_dir>/<CACHE_NAME>/`.
    pub fn new(origin: impl Into<String>, base_dir: PathBuf, api: ApiClient) -> Result<Self> {
        let cache_dir = base_dir.join(CACHE_NAME);
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            cache_dir,
            api,
        })
    }

    /// Map a request path to its cache file. Percent signs are escaped
    /// before separators so the mapping is injective: distinct paths never
    /// share a file name, even when a path literally contains "%2F".
    fn entry_path(&self, path: &str) -> PathBuf {
        self.cache_dir
            .join(path.replace('%', "%25").replace('/', "%2F"))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Pre-populate the cache with every listed resource.
    ///
    /// All-or-nothing: every fetch must succeed before anything is stored,
    /// so a failed install leaves no half-populated cache generation.
    pub async fn install(&self) -> Result<()> {
        let bodies: Vec<(&str, Vec<u8>)> = stream::iter(PRECACHE_PATHS.iter().map(|path| {
            let url = self.url_for(path);
            async move {
                let body = self
                    .api
                    .fetch_resource(&url)
                    .await
                    .with_context(|| format!("Failed to pre-cache {}", path))?;
                Ok::<_, anyhow::Error>((*path, body))
            }
        }))
        .buffered(MAX_CONCURRENT_INSTALL_FETCHES)
        .try_collect()
        .await?;

        self.persist(bodies)?;

        info!(
            origin = %self.origin,
            resources = PRECACHE_PATHS.len(),
            "Offline cache installed"
        );
        Ok(())
    }

    /// Store fetched bodies, removing any already-written entries if a
    /// write fails so a failed install never leaves a partial cache.
    fn persist(&self, bodies: Vec<(&str, Vec<u8>)>) -> Result<()> {
        let mut written: Vec<&str> = Vec::with_capacity(bodies.len());
        for (path, body) in bodies {
            if let Err(e) = std::fs::write(self.entry_path(path), body) {
                for prior in written {
                    let _ = std::fs::remove_file(self.entry_path(prior));
                }
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to store cache entry for {}", path)));
            }
            written.push(path);
        }
        Ok(())
    }

    /// Whether an exact-match cache entry exists for `path`.
    pub fn is_cached(&self, path: &str) -> bool {
        self.entry_path(path).exists()
    }

    /// Serve `path` cache-first: a cached entry short-circuits the network
    /// entirely; a miss falls through to a live fetch whose failure
    /// propagates to the caller with no fallback content.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let entry = self.entry_path(path);
        if entry.exists() {
            debug!(path, "Serving from offline cache");
            return std::fs::read(&entry)
                .with_context(|| format!("Failed to read cache entry for {}", path));
        }

        debug!(path, "Cache miss, fetching live");
        self.api.fetch_resource(&self.url_for(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An origin that refuses connections immediately, so any test that
    /// reaches the network fails fast.
    const DEAD_ORIGIN: &str = "http://127.0.0.1:9";

    fn gateway(base: &std::path::Path) -> OfflineGateway {
        OfflineGateway::new(DEAD_ORIGIN, base.to_path_buf(), ApiClient::new().unwrap()).unwrap()
    }

    fn seed_entry(gw: &OfflineGateway, path: &str, body: &[u8]) {
        std::fs::write(gw.entry_path(path), body).unwrap();
    }

    #[tokio::test]
    async fn test_cached_path_never_reaches_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        // The origin is unreachable, so success proves the response came
        // from the cache alone.
        seed_entry(&gw, "/style.css", b"body { color: red }");
        let body = gw.fetch("/style.css").await.unwrap();
        assert_eq!(body, b"body { color: red }");
    }

    #[tokio::test]
    async fn test_unlisted_path_falls_through_to_network() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        seed_entry(&gw, "/style.css", b"cached");
        // Not cached: the gateway must go live, and the dead origin makes
        // that attempt observable as an error.
        assert!(gw.fetch("/not-precached.html").await.is_err());
    }

    #[tokio::test]
    async fn test_failed_install_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        assert!(gw.install().await.is_err());
        for path in PRECACHE_PATHS {
            assert!(!gw.is_cached(path));
        }
    }

    #[test]
    fn test_failed_persist_removes_prior_entries() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        // A directory at the second entry's path makes its write fail
        // after the first entry has been stored
        std::fs::create_dir(gw.entry_path("/style.css")).unwrap();

        let bodies = vec![
            ("/index.html", b"<html>".to_vec()),
            ("/style.css", b"body {}".to_vec()),
        ];
        assert!(gw.persist(bodies).is_err());
        assert!(!gw.is_cached("/index.html"));
    }

    #[test]
    fn test_entry_paths_are_collision_free() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        let mut paths: Vec<PathBuf> = PRECACHE_PATHS.iter().map(|p| gw.entry_path(p)).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), PRECACHE_PATHS.len());
    }

    #[test]
    fn test_entry_path_is_injective_for_encoded_separators() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(dir.path());

        // A literal "%2F" in a path must not alias an actual separator
        assert_ne!(gw.entry_path("/a%2Fb"), gw.entry_path("/a/b"));
        assert_ne!(gw.entry_path("/a%25b"), gw.entry_path("/a%b"));
    }
}

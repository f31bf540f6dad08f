use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::RunRecord;

/// Consider cache stale after 1 hour.
/// Leaderboard data changes slowly; hourly refresh keeps it current without
/// hammering the host.
const CACHE_STALE_MINUTES: i64 = 60;

/// A cached payload together with the time it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        // Negative means clock skew; treat as fresh
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Stores fetched data as JSON files under the platform cache directory.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(name), contents)?;
        Ok(())
    }

    pub fn load_runs(&self) -> Result<Option<CachedData<Vec<RunRecord>>>> {
        self.load("runs")
    }

    pub fn save_runs(&self, runs: &[RunRecord]) -> Result<()> {
        self.save("runs", &runs)
    }

    /// Age of the cached runs data for the status bar, or None when there
    /// is no usable cache. Read errors are logged, not propagated.
    pub fn runs_age(&self) -> Option<String> {
        match self.load_runs() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Failed to load runs cache for age display");
                None
            }
        }
    }

    /// Whether the cached runs data should be refreshed. Missing or
    /// unreadable cache counts as stale.
    pub fn runs_stale(&self) -> bool {
        match self.load_runs() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true,
            Err(e) => {
                debug!(error = %e, "Failed to load runs cache for staleness check");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(runner: &str) -> RunRecord {
        RunRecord {
            game: "Foo".to_string(),
            section: "Any%".to_string(),
            category: "Main".to_string(),
            runner: runner.to_string(),
            time: "1:00".to_string(),
            video: None,
        }
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_save_and_load_runs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        assert!(cache.load_runs().unwrap().is_none());
        assert!(cache.runs_stale());

        cache.save_runs(&[record("X"), record("Y")]).unwrap();

        let cached = cache.load_runs().unwrap().unwrap();
        assert_eq!(cached.data.len(), 2);
        assert_eq!(cached.data[0].runner, "X");
        assert!(!cache.runs_stale());
        assert_eq!(cache.runs_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_corrupt_cache_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        std::fs::write(dir.path().join("runs.json"), "not json").unwrap();

        assert!(cache.load_runs().is_err());
        // Status helpers degrade instead of failing
        assert!(cache.runs_stale());
        assert!(cache.runs_age().is_none());
    }
}

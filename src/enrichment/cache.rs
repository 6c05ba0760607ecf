//! File-based cache for downloaded license texts.

use super::LicenseTextError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-disk form of one cached license.
#[derive(Debug, Serialize, Deserialize)]
struct CachedLicense {
    id: String,
    text: String,
}

/// Convert a license id to a filesystem-safe file name.
fn cache_file_name(license_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("spdx-license:{license_id}"));
    format!("{:x}.json", hasher.finalize())
}

/// File-based cache with TTL support.
#[derive(Debug, Clone)]
pub struct FileCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    /// Create a cache rooted at `cache_dir`, creating the directory if needed.
    pub fn new(cache_dir: PathBuf, ttl: Duration) -> Result<Self, LicenseTextError> {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).map_err(|e| {
                LicenseTextError::Cache(format!(
                    "cannot create cache directory {}: {e}",
                    cache_dir.display()
                ))
            })?;
        }
        Ok(Self { cache_dir, ttl })
    }

    /// Cache directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cached text for `license_id`.
    ///
    /// Returns None if not cached, unreadable, or older than the TTL. Expired
    /// entries are removed.
    #[must_use]
    pub fn get(&self, license_id: &str) -> Option<String> {
        let path = self.cache_dir.join(cache_file_name(license_id));

        let metadata = fs::metadata(&path).ok()?;
        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > self.ttl {
            let _ = fs::remove_file(&path);
            return None;
        }

        let data = fs::read_to_string(&path).ok()?;
        let entry: CachedLicense = serde_json::from_str(&data).ok()?;
        (entry.id == license_id).then_some(entry.text)
    }

    /// Store the text for `license_id`.
    pub fn set(&self, license_id: &str, text: &str) -> Result<(), LicenseTextError> {
        let path = self.cache_dir.join(cache_file_name(license_id));
        let entry = CachedLicense {
            id: license_id.to_string(),
            text: text.to_string(),
        };
        let data =
            serde_json::to_string(&entry).map_err(|e| LicenseTextError::Cache(e.to_string()))?;
        fs::write(&path, data).map_err(|e| LicenseTextError::Cache(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf(), Duration::from_secs(3600)).unwrap();

        assert_eq!(cache.get("MIT"), None);
        cache.set("MIT", "Permission is hereby granted").unwrap();
        assert_eq!(cache.get("MIT").as_deref(), Some("Permission is hereby granted"));
        assert_eq!(cache.get("Apache-2.0"), None);
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf(), Duration::ZERO).unwrap();
        cache.set("MIT", "text").unwrap();
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.get("MIT"), None);
    }

    #[test]
    fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let cache = FileCache::new(nested.clone(), Duration::from_secs(60)).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[test]
    fn test_file_names_are_distinct() {
        assert_ne!(cache_file_name("MIT"), cache_file_name("MIT-0"));
        assert!(cache_file_name("GPL-2.0+").ends_with(".json"));
    }
}

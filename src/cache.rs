/// Mtime-keyed artifact cache.
///
/// The collaborators that re-read artifacts (the JSON exporter, chart
/// tooling) key their parsed payloads on the artifact's modification
/// time. This cache makes that explicit: each entry owns its
/// `{ last modified, parsed payload }` pair, and `refresh_if_stale` is
/// the only way in — the caller supplies the current mtime and a reload
/// closure, and the closure runs only when the stored mtime differs.
/// No module-level state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

struct CacheEntry<T> {
    modified: SystemTime,
    payload: T,
}

/// Cache of parsed artifacts keyed by path.
pub struct SeriesCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> SeriesCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached payload for `path`, invoking `reload` only when
    /// no entry exists or the stored mtime differs from `current_mtime`.
    /// A reload failure propagates without touching the cached entry.
    pub fn refresh_if_stale<E, F>(
        &mut self,
        path: &Path,
        current_mtime: SystemTime,
        reload: F,
    ) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().modified != current_mtime {
                    let payload = reload()?;
                    occupied.insert(CacheEntry {
                        modified: current_mtime,
                        payload,
                    });
                }
                Ok(&occupied.into_mut().payload)
            }
            Entry::Vacant(vacant) => {
                let payload = reload()?;
                Ok(&vacant
                    .insert(CacheEntry {
                        modified: current_mtime,
                        payload,
                    })
                    .payload)
            }
        }
    }

    /// Drops the entry for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SeriesCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    fn t(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_first_access_loads() {
        let mut cache: SeriesCache<String> = SeriesCache::new();
        let loads = Cell::new(0);

        let value = cache
            .refresh_if_stale(Path::new("a.csv"), t(100), || {
                loads.set(loads.get() + 1);
                Ok::<_, ()>("payload".to_string())
            })
            .unwrap();

        assert_eq!(value, "payload");
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_same_mtime_hits_cache() {
        let mut cache: SeriesCache<String> = SeriesCache::new();
        let loads = Cell::new(0);
        let mut load = || {
            cache
                .refresh_if_stale(Path::new("a.csv"), t(100), || {
                    loads.set(loads.get() + 1);
                    Ok::<_, ()>(format!("load #{}", loads.get()))
                })
                .unwrap()
                .clone()
        };

        let first = load();
        let second = load();
        assert_eq!(first, second, "unchanged mtime must not reload");
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_changed_mtime_reloads() {
        let mut cache: SeriesCache<u32> = SeriesCache::new();

        let v1 = *cache
            .refresh_if_stale(Path::new("a.csv"), t(100), || Ok::<_, ()>(1))
            .unwrap();
        let v2 = *cache
            .refresh_if_stale(Path::new("a.csv"), t(200), || Ok::<_, ()>(2))
            .unwrap();

        assert_eq!(v1, 1);
        assert_eq!(v2, 2, "newer mtime must replace the payload");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reload_failure_propagates_and_keeps_old_entry() {
        let mut cache: SeriesCache<u32> = SeriesCache::new();
        cache
            .refresh_if_stale(Path::new("a.csv"), t(100), || Ok::<_, String>(1))
            .unwrap();

        let err = cache
            .refresh_if_stale(Path::new("a.csv"), t(200), || Err("disk gone".to_string()))
            .unwrap_err();
        assert_eq!(err, "disk gone");

        // The stale-but-parseable payload is still served for the old mtime.
        let v = *cache
            .refresh_if_stale(Path::new("a.csv"), t(100), || Ok::<_, String>(99))
            .unwrap();
        assert_eq!(v, 1);
    }

    #[test]
    fn test_entries_are_per_path() {
        let mut cache: SeriesCache<u32> = SeriesCache::new();
        cache
            .refresh_if_stale(Path::new("a.csv"), t(100), || Ok::<_, ()>(1))
            .unwrap();
        cache
            .refresh_if_stale(Path::new("b.csv"), t(100), || Ok::<_, ()>(2))
            .unwrap();
        assert_eq!(cache.len(), 2);

        cache.invalidate(Path::new("a.csv"));
        assert_eq!(cache.len(), 1);
    }
}

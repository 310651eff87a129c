use super::SnapshotError;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
struct CachedBoundaries {
    version: String,
    polygons: Option<Arc<Value>>,
}

/// District boundary polygons keyed by the snapshot version they were loaded for. Asking for a
/// different version drops the cached polygons and loads again.
#[derive(Debug, Default)]
pub struct BoundaryCache {
    entry: RwLock<Option<CachedBoundaries>>,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(
        &self,
        version: &str,
        load: F,
    ) -> Result<Option<Arc<Value>>, SnapshotError>
    where
        F: FnOnce() -> Result<Option<Value>, SnapshotError>,
    {
        {
            let guard = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = guard.as_ref().filter(|cached| cached.version == version) {
                return Ok(cached.polygons.clone());
            }
        }

        let mut guard = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot while we waited for the write lock.
        if let Some(cached) = guard.as_ref().filter(|cached| cached.version == version) {
            return Ok(cached.polygons.clone());
        }

        let polygons = load()?.map(Arc::new);
        *guard = Some(CachedBoundaries {
            version: version.to_string(),
            polygons: polygons.clone(),
        });
        Ok(polygons)
    }

    pub fn cached_version(&self) -> Option<String> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn same_version_loads_once() {
        let cache = BoundaryCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok(Some(json!({ "type": "FeatureCollection" })))
        };

        cache.get_or_load("v1", load).expect("first load");
        cache.get_or_load("v1", load).expect("cached");
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.cached_version().as_deref(), Some("v1"));
    }

    #[test]
    fn new_version_replaces_entry() {
        let cache = BoundaryCache::new();
        cache
            .get_or_load("v1", || Ok(Some(json!({ "features": [1] }))))
            .expect("v1 loads");
        let polygons = cache
            .get_or_load("v2", || Ok(Some(json!({ "features": [2] }))))
            .expect("v2 loads")
            .expect("polygons present");

        assert_eq!(polygons["features"][0], 2);
        assert_eq!(cache.cached_version().as_deref(), Some("v2"));
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let cache = BoundaryCache::new();
        let result = cache.get_or_load("v1", || Err(SnapshotError::Shape));

        assert!(result.is_err());
        assert!(cache.cached_version().is_none());
    }
}

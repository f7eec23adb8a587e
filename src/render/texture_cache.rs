//! Memoized procedural textures.
//!
//! A key is generated at most once; later requests return the stored value.
//! `dispose_all` releases every entry. Generic over the stored resource so
//! the viewer can cache GPU handles under the same keys as the raw images.

use std::collections::HashMap;

use super::texture::ProceduralTexture;

/// A cached resource that holds something worth releasing explicitly.
pub trait Disposable {
    fn dispose(self);
}

impl Disposable for ProceduralTexture {
    fn dispose(self) {
        log::trace!("Releasing {}px procedural texture", self.size());
    }
}

pub struct TextureCache<T: Disposable> {
    entries: HashMap<String, T>,
    hits: u64,
    misses: u64,
}

impl<T: Disposable> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Disposable> TextureCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the entry for `key`, running `create` only on a miss.
    pub fn get_or_create(&mut self, key: &str, create: impl FnOnce() -> T) -> &T {
        if self.entries.contains_key(key) {
            log::debug!("Texture HIT: {}", key);
            self.hits += 1;
        } else {
            log::debug!("Texture MISS: {}", key);
            self.misses += 1;
            self.entries.insert(key.to_string(), create());
        }
        &self.entries[key]
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit rate (0.0 to 1.0) over all lookups so far.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Release every entry and empty the cache.
    pub fn dispose_all(&mut self) {
        let count = self.entries.len();
        for (_, resource) in self.entries.drain() {
            resource.dispose();
        }
        if count > 0 {
            log::debug!("Disposed {} cached textures", count);
        }
    }
}

impl<T: Disposable> Drop for TextureCache<T> {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            log::warn!(
                "Texture cache dropped with {} live entries; disposing",
                self.entries.len()
            );
            self.dispose_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        disposed: Rc<Cell<usize>>,
    }

    impl Disposable for Tracked {
        fn dispose(self) {
            self.disposed.set(self.disposed.get() + 1);
        }
    }

    #[test]
    fn generator_runs_once_per_key() {
        let disposed = Rc::new(Cell::new(0));
        let mut cache = TextureCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_create("status:Pending@128", || {
                calls += 1;
                Tracked { disposed: Rc::clone(&disposed) }
            });
        }
        assert_eq!(calls, 1);
        cache.get_or_create("status:Completed@128", || {
            calls += 1;
            Tracked { disposed: Rc::clone(&disposed) }
        });
        assert_eq!(calls, 2);
        assert_eq!(cache.len(), 2);
        assert!((cache.hit_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dispose_all_releases_and_clears() {
        let disposed = Rc::new(Cell::new(0));
        let mut cache = TextureCache::new();
        for key in ["a", "b", "c"] {
            cache.get_or_create(key, || Tracked { disposed: Rc::clone(&disposed) });
        }
        cache.dispose_all();
        assert_eq!(disposed.get(), 3);
        assert!(cache.is_empty());

        // regenerated after disposal
        let mut regenerated = false;
        cache.get_or_create("a", || {
            regenerated = true;
            Tracked { disposed: Rc::clone(&disposed) }
        });
        assert!(regenerated);
    }

    #[test]
    fn drop_disposes_leftovers() {
        let disposed = Rc::new(Cell::new(0));
        {
            let mut cache = TextureCache::new();
            cache.get_or_create("x", || Tracked { disposed: Rc::clone(&disposed) });
        }
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn caches_procedural_textures() {
        use crate::render::texture::TextureKind;
        let mut cache: TextureCache<ProceduralTexture> = TextureCache::new();
        let kind = TextureKind::Holographic;
        let size = cache.get_or_create(&kind.key(16), || kind.generate(16)).size();
        assert_eq!(size, 16);
        assert!(cache.contains("holographic@16"));
        cache.dispose_all();
    }
}

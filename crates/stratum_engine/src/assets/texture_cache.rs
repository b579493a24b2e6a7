//! Reference-counted texture cache
//!
//! Textures are keyed by the path they were requested with. Every
//! [`load`](TextureCache::load) of a path bumps its reference count and every
//! [`unload`](TextureCache::unload) drops it; the backend copy is released
//! when the count reaches zero.

use super::AssetError;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

new_key_type! {
    /// Handle to a resident texture
    pub struct TextureHandle;
}

/// Dimensions of a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
}

/// Backend hook that turns a path into a resident texture
pub trait TextureLoader {
    /// Load the file at `path` and associate it with `handle`
    fn load(&mut self, handle: TextureHandle, path: &Path) -> Result<TextureInfo, AssetError>;

    /// Free the backend copy of `handle`
    fn release(&mut self, handle: TextureHandle);
}

struct CachedTexture {
    key: PathBuf,
    info: TextureInfo,
    ref_count: usize,
}

/// Texture cache shared by every scene of a session
pub struct TextureCache {
    loader: Box<dyn TextureLoader>,
    root: PathBuf,
    textures: SlotMap<TextureHandle, CachedTexture>,
    by_path: HashMap<PathBuf, TextureHandle>,
}

impl TextureCache {
    /// Create a cache resolving paths relative to the working directory
    pub fn new(loader: Box<dyn TextureLoader>) -> Self {
        Self::with_root(loader, PathBuf::new())
    }

    /// Create a cache resolving paths relative to `root`
    pub fn with_root(loader: Box<dyn TextureLoader>, root: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            root: root.into(),
            textures: SlotMap::with_key(),
            by_path: HashMap::new(),
        }
    }

    /// Get a texture, loading it on first use, and take a reference to it
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<TextureHandle, AssetError> {
        let key = path.as_ref().to_path_buf();
        if let Some(&handle) = self.by_path.get(&key) {
            if let Some(texture) = self.textures.get_mut(handle) {
                texture.ref_count += 1;
                return Ok(handle);
            }
        }

        let full_path = self.root.join(&key);
        let loader = &mut self.loader;
        let handle = self.textures.try_insert_with_key(|handle| {
            loader.load(handle, &full_path).map(|info| CachedTexture {
                key: key.clone(),
                info,
                ref_count: 1,
            })
        })?;

        log::debug!("Loaded texture {}", full_path.display());
        self.by_path.insert(key, handle);
        Ok(handle)
    }

    /// Drop one reference to the texture loaded from `path`.
    ///
    /// Returns the references still held.
    pub fn unload(&mut self, path: impl AsRef<Path>) -> Result<usize, AssetError> {
        let path = path.as_ref();
        let handle = self
            .by_path
            .get(path)
            .copied()
            .ok_or_else(|| AssetError::NotLoaded(path.display().to_string()))?;
        self.release(handle)
    }

    /// Drop one reference to `handle`.
    ///
    /// Returns the references still held.
    pub fn release(&mut self, handle: TextureHandle) -> Result<usize, AssetError> {
        let texture = self
            .textures
            .get_mut(handle)
            .ok_or_else(|| AssetError::NotLoaded(format!("{handle:?}")))?;

        texture.ref_count = texture.ref_count.saturating_sub(1);
        let remaining = texture.ref_count;
        if remaining == 0 {
            if let Some(texture) = self.textures.remove(handle) {
                self.by_path.remove(&texture.key);
                log::debug!("Released texture {}", texture.key.display());
            }
            self.loader.release(handle);
        }
        Ok(remaining)
    }

    /// Free every texture regardless of outstanding references
    pub fn unload_all(&mut self) {
        for (handle, _) in self.textures.drain() {
            self.loader.release(handle);
        }
        self.by_path.clear();
    }

    /// Dimensions of a resident texture
    pub fn info(&self, handle: TextureHandle) -> Option<TextureInfo> {
        self.textures.get(handle).map(|texture| texture.info)
    }

    /// Outstanding references to the texture loaded from `path`
    pub fn ref_count(&self, path: impl AsRef<Path>) -> usize {
        self.by_path
            .get(path.as_ref())
            .and_then(|&handle| self.textures.get(handle))
            .map_or(0, |texture| texture.ref_count)
    }

    /// Number of resident textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no texture is resident
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Drop for TextureCache {
    fn drop(&mut self) {
        self.unload_all();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Loader reporting a fixed size and remembering what it released
    #[derive(Default, Clone)]
    pub(crate) struct FakeLoader {
        pub loads: Rc<RefCell<Vec<PathBuf>>>,
        pub releases: Rc<RefCell<Vec<TextureHandle>>>,
    }

    impl TextureLoader for FakeLoader {
        fn load(&mut self, _handle: TextureHandle, path: &Path) -> Result<TextureInfo, AssetError> {
            if path.extension().is_none() {
                return Err(AssetError::Load {
                    path: path.to_path_buf(),
                    reason: "no extension".to_string(),
                });
            }
            self.loads.borrow_mut().push(path.to_path_buf());
            Ok(TextureInfo { width: 32, height: 16 })
        }

        fn release(&mut self, handle: TextureHandle) {
            self.releases.borrow_mut().push(handle);
        }
    }

    #[test]
    fn test_load_is_shared_and_counted() {
        let loader = FakeLoader::default();
        let mut cache = TextureCache::with_root(Box::new(loader.clone()), "assets");

        let first = cache.load("ship.png").unwrap();
        let second = cache.load("ship.png").unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.ref_count("ship.png"), 2);
        assert_eq!(loader.loads.borrow().as_slice(), [PathBuf::from("assets/ship.png")]);
        assert_eq!(cache.info(first), Some(TextureInfo { width: 32, height: 16 }));
    }

    #[test]
    fn test_unload_frees_at_zero() {
        let loader = FakeLoader::default();
        let mut cache = TextureCache::new(Box::new(loader.clone()));

        let handle = cache.load("tiles.png").unwrap();
        cache.load("tiles.png").unwrap();

        assert_eq!(cache.unload("tiles.png").unwrap(), 1);
        assert!(loader.releases.borrow().is_empty());

        assert_eq!(cache.unload("tiles.png").unwrap(), 0);
        assert_eq!(loader.releases.borrow().as_slice(), [handle]);
        assert!(cache.info(handle).is_none());
        assert!(matches!(cache.unload("tiles.png"), Err(AssetError::NotLoaded(_))));
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let mut cache = TextureCache::new(Box::new(FakeLoader::default()));
        assert!(matches!(cache.load("no_extension"), Err(AssetError::Load { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_drop_releases_everything() {
        let loader = FakeLoader::default();
        {
            let mut cache = TextureCache::new(Box::new(loader.clone()));
            cache.load("a.png").unwrap();
            cache.load("b.png").unwrap();
        }
        assert_eq!(loader.releases.borrow().len(), 2);
    }
}

//! Filesystem adapter for [`ImageStore`].
//!
//! Files live under the configured media root, opened once as a capability
//! directory so stored paths cannot escape it. Public URLs are the media URL
//! prefix followed by the stored relative path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ImagePath;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Stores uploaded images beneath a media root directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: Arc<Dir>,
    media_url: String,
}

impl FsImageStore {
    /// Open (creating if needed) `media_root` and serve files under `media_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(media_root: &Path, media_url: impl Into<String>) -> Result<Self, ImageStoreError> {
        let io_error = |err: std::io::Error| {
            ImageStoreError::io(media_root.display().to_string(), err.to_string())
        };
        Dir::create_ambient_dir_all(media_root, ambient_authority()).map_err(io_error)?;
        let root = Dir::open_ambient_dir(media_root, ambient_authority()).map_err(io_error)?;
        let mut url = media_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        Ok(Self {
            root: Arc::new(root),
            media_url: url,
        })
    }

    async fn blocking<F>(&self, path: &ImagePath, op: F) -> Result<(), ImageStoreError>
    where
        F: FnOnce(&Dir, &Path) -> std::io::Result<()> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let relative = PathBuf::from(path.as_str());
        let display = path.as_str().to_owned();
        tokio::task::spawn_blocking(move || op(&root, &relative))
            .await
            .map_err(|err| ImageStoreError::io(display.clone(), err.to_string()))?
            .map_err(|err| ImageStoreError::io(display, err.to_string()))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, path: &ImagePath, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let owned = bytes.to_vec();
        self.blocking(path, move |root, relative| {
            if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
                root.create_dir_all(parent)?;
            }
            root.write(relative, owned)
        })
        .await
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        self.blocking(path, |root, relative| match root.remove_file(relative) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }

    fn url(&self, path: &ImagePath) -> String {
        format!("{}{}", self.media_url, path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn media() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn save_creates_nested_directories(media: TempDir) {
        let store = FsImageStore::open(media.path(), "/media/").expect("store");
        let path = ImagePath::from_stored("uploads/recipe/abc.png");

        store.save(&path, b"png-bytes").await.expect("saved");

        let written = std::fs::read(media.path().join("uploads/recipe/abc.png")).expect("read");
        assert_eq!(written, b"png-bytes");
    }

    #[rstest]
    #[tokio::test]
    async fn remove_tolerates_missing_files(media: TempDir) {
        let store = FsImageStore::open(media.path(), "/media/").expect("store");
        let path = ImagePath::from_stored("uploads/recipe/missing.png");
        store.remove(&path).await.expect("missing file is fine");
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_saved_file(media: TempDir) {
        let store = FsImageStore::open(media.path(), "/media/").expect("store");
        let path = ImagePath::from_stored("uploads/recipe/gone.png");
        store.save(&path, b"x").await.expect("saved");

        store.remove(&path).await.expect("removed");
        assert!(!media.path().join("uploads/recipe/gone.png").exists());
    }

    #[rstest]
    #[case("/media/", "/media/uploads/recipe/a.jpg")]
    #[case("/media", "/media/uploads/recipe/a.jpg")]
    #[case("https://cdn.example.com/m/", "https://cdn.example.com/m/uploads/recipe/a.jpg")]
    fn url_joins_prefix_and_path(media: TempDir, #[case] prefix: &str, #[case] expected: &str) {
        let store = FsImageStore::open(media.path(), prefix).expect("store");
        assert_eq!(store.url(&ImagePath::from_stored("uploads/recipe/a.jpg")), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn escaping_paths_are_refused(media: TempDir) {
        let store = FsImageStore::open(media.path(), "/media/").expect("store");
        let err = store
            .save(&ImagePath::from_stored("../outside.png"), b"x")
            .await
            .expect_err("sandboxed");
        assert!(matches!(err, ImageStoreError::Io { .. }));
    }
}

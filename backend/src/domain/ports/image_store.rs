//! Driven port for uploaded image storage.
use async_trait::async_trait;

use crate::domain::ImagePath;

use super::define_port_error;

define_port_error! {
    /// Failures raised by image storage adapters.
    pub enum ImageStoreError {
        /// Reading or writing the file failed.
        Io { path: String, message: String } => "image storage failed for {path}: {message}",
    }
}

/// Storage for uploaded image files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` at `path`, replacing any existing file.
    async fn save(&self, path: &ImagePath, bytes: &[u8]) -> Result<(), ImageStoreError>;

    /// Remove a stored file. Missing files are not an error.
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError>;

    /// Public URL clients use to fetch `path`.
    fn url(&self, path: &ImagePath) -> String;
}

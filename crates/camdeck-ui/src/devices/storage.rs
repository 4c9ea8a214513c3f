use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::camera::Frame;

/// File information for a stored photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoInfo {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    NotMounted,
    NotFound,
    Decode(String),
    IoError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotMounted => write!(f, "SD card not mounted"),
            StorageError::NotFound => write!(f, "Photo not found"),
            StorageError::Decode(msg) => write!(f, "Decode error: {}", msg),
            StorageError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// Photo directory on removable storage.
pub trait PhotoStore {
    fn is_mounted(&self) -> bool;

    /// Photo names, sorted, at most `limit`.
    fn list(&mut self, limit: usize) -> Result<Vec<PhotoInfo>, StorageError>;

    /// Persist a capture; returns the name it was stored under.
    fn save(&mut self, frame: &Frame) -> Result<String, StorageError>;

    /// Load and decode a photo for display.
    fn load(&mut self, name: &str) -> Result<Frame, StorageError>;

    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    /// Dump mount and usage details to the log.
    fn log_status(&mut self) {
        log::info!("Photo store mounted: {}", self.is_mounted());
    }
}

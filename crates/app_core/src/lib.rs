//! Gallery Core Domain Logic
//!
//! This crate contains:
//! - Sidecar profiles and the per-path serialized profile store
//! - Group directory manager
//! - Image file manager
//! - Gallery context (the operation surface the UI calls)
//! - Configuration
//! - Error types

pub mod config;
pub mod error;
pub mod gallery;
pub mod groups;
pub mod images;
pub mod ordering;
pub mod profile;
pub mod profile_store;

pub use config::{GalleryConfig, GallerySection, LogConfig};
pub use error::{GalleryError, OpResult};
pub use gallery::Gallery;
pub use groups::GroupManager;
pub use images::{ImageManager, Clock, CLIPBOARD_PREFIX, SCREENSHOT_PREFIX};
pub use ordering::{sort_by_order, Listing};
pub use profile::{GroupProfile, ImageProfile, SidecarProfile};
pub use profile_store::ProfileStore;

pub use app_fs::{NameValidation, PROFILE_FILE_NAME};

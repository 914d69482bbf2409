//! Gallery File System Layer
//!
//! Provides the filesystem primitives the gallery is built on:
//! - Name validation per host operating system
//! - GalleryLayout: (root, group, image) -> path mapping
//! - Directory listing for groups and images
//! - Exclusive create / copy and no-clobber rename
//! - Candidate names for imported images

mod validate;
mod layout;
mod listing;
mod naming;
mod file_operations;

pub use validate::{validate_name, validate_name_for, is_plain_component, HostOs, NameValidation};
pub use layout::{GalleryLayout, PROFILE_FILE_NAME};
pub use listing::{list_directories, list_image_files, is_supported_image, SUPPORTED_IMAGE_EXTENSIONS};
pub use naming::{timestamp_now, normalize_extension, stamped_name, numbered_name};
pub use file_operations::{write_unique, copy_unique, create_dir, rename_dir, rename_file, is_occupied};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Path already exists: {0}")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, FsError>;

//! Gallery layout - maps groups and images onto the directory tree
//!
//! ```text
//! <root>/
//!   插件配置文件（勿改勿删）.json     group profile
//!   <group>/
//!     插件配置文件（勿改勿删）.json   image profile
//!     <image>
//! ```
//!
//! Pure path arithmetic: nothing here touches the disk or validates names.

use std::path::{Path, PathBuf};

/// Sidecar file name, shared by the group profile and every image profile.
/// Reads "plugin config file (do not edit or delete)".
pub const PROFILE_FILE_NAME: &str = "插件配置文件（勿改勿删）.json";

/// Resolves gallery paths below a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLayout {
    root: PathBuf,
}

impl GalleryLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Gallery root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a group's images
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(group)
    }

    /// Path of one image inside a group
    pub fn image_path(&self, group: &str, image: &str) -> PathBuf {
        self.root.join(group).join(image)
    }

    /// Group profile sidecar at the root
    pub fn group_profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE_NAME)
    }

    /// Image profile sidecar inside a group directory
    pub fn image_profile_path(&self, group: &str) -> PathBuf {
        self.root.join(group).join(PROFILE_FILE_NAME)
    }
}

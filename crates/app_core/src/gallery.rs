//! Gallery context - the operation surface the UI layer calls
//!
//! Each operation resolves the current root, delegates to the group or image
//! manager and flattens the outcome into the shape the UI expects: an
//! [`OpResult`] for namespace changes, `bool` for deletions, an empty string
//! for failed imports and default profiles for unreadable sidecars. Nothing
//! here returns a raw error.

use crate::error::{OpResult, Result};
use crate::groups::GroupManager;
use crate::images::{Clock, ImageManager};
use crate::ordering::Listing;
use crate::profile::{GroupProfile, ImageProfile};
use crate::profile_store::ProfileStore;
use app_fs::{GalleryLayout, NameValidation};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Long-lived gallery state: the configured root and the profile writer
pub struct Gallery {
    layout: RwLock<Arc<GalleryLayout>>,
    profiles: ProfileStore,
    clock: Clock,
}

impl Gallery {
    /// Create a gallery rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            layout: RwLock::new(Arc::new(GalleryLayout::new(root))),
            profiles: ProfileStore::new(),
            clock: app_fs::timestamp_now,
        }
    }

    /// Replace the timestamp source used for generated image names
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Point the gallery at another root directory
    pub fn set_root<P: Into<PathBuf>>(&self, root: P) {
        let layout = GalleryLayout::new(root);
        tracing::info!("Gallery root set to {}", layout.root().display());
        *self.layout.write() = Arc::new(layout);
    }

    /// Current root directory
    pub fn root(&self) -> PathBuf {
        self.layout().root().to_path_buf()
    }

    /// Whether the root directory exists
    pub async fn root_exists(&self) -> bool {
        tokio::fs::try_exists(self.layout().root()).await.unwrap_or(false)
    }

    /// Create the root directory (and parents) if missing
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        let layout = self.layout();
        tokio::fs::create_dir_all(layout.root()).await?;
        tracing::info!("Gallery root ready: {}", layout.root().display());
        Ok(())
    }

    /// Validate a user-supplied group or image name
    pub fn validate_name(&self, name: &str) -> NameValidation {
        app_fs::validate_name(name)
    }

    /// Whether a file name has a supported image extension
    pub fn is_supported_image(&self, file_name: &str) -> bool {
        app_fs::is_supported_image(file_name)
    }

    /// Path of an image file (no validation, no I/O)
    pub fn image_path(&self, group: &str, name: &str) -> PathBuf {
        self.layout().image_path(group, name)
    }

    // ===== Groups =====

    pub async fn list_groups(&self) -> Listing<GroupProfile> {
        let layout = self.layout();
        GroupManager::new(&layout, &self.profiles).list_with_profile().await
    }

    pub async fn create_group(&self, name: &str) -> OpResult {
        let layout = self.layout();
        let result = GroupManager::new(&layout, &self.profiles).create(name).await;
        report("createGroup", result)
    }

    pub async fn rename_group(&self, old_name: &str, new_name: &str) -> OpResult {
        let layout = self.layout();
        let result = GroupManager::new(&layout, &self.profiles)
            .rename(old_name, new_name)
            .await;
        report("renameGroup", result)
    }

    pub async fn remove_group(&self, name: &str) -> bool {
        let layout = self.layout();
        GroupManager::new(&layout, &self.profiles).remove(name).await
    }

    /// Queue a group profile write. The handle may be dropped.
    pub fn save_group_profile(&self, profile: &GroupProfile) -> JoinHandle<Result<()>> {
        let layout = self.layout();
        GroupManager::new(&layout, &self.profiles).save_profile(profile)
    }

    // ===== Images =====

    pub async fn list_images(&self, group: &str) -> Listing<ImageProfile> {
        let layout = self.layout();
        self.images(&layout).list_with_profile(group).await
    }

    /// Save clipboard bytes; returns the new file name, empty on failure
    pub async fn save_image_from_buffer(&self, group: &str, bytes: &[u8], extension: &str) -> String {
        let layout = self.layout();
        let result = self.images(&layout).save_from_buffer(group, bytes, extension).await;
        name_or_empty("saveImageFromBuffer", result)
    }

    /// Save a base64 screenshot; returns the new file name, empty on failure
    pub async fn save_image_from_base64(&self, group: &str, data_url: &str) -> String {
        let layout = self.layout();
        let result = self.images(&layout).save_from_base64(group, data_url).await;
        name_or_empty("saveImageFromBase64", result)
    }

    /// Copy a file into a group; returns the new file name, empty on failure
    pub async fn copy_import_image(&self, source: &Path, group: &str) -> String {
        let layout = self.layout();
        let result = self.images(&layout).copy_import(source, group).await;
        name_or_empty("copyImportImage", result)
    }

    pub async fn rename_image(&self, group: &str, old_name: &str, new_name: &str) -> OpResult {
        let layout = self.layout();
        let result = self.images(&layout).rename(group, old_name, new_name).await;
        report("renameImage", result)
    }

    pub async fn remove_image(&self, group: &str, name: &str) -> bool {
        let layout = self.layout();
        self.images(&layout).remove(group, name).await
    }

    /// Queue an image profile write. `None` if the group name is unusable.
    pub fn save_image_profile(&self, group: &str, profile: &ImageProfile) -> Option<JoinHandle<Result<()>>> {
        let layout = self.layout();
        match self.images(&layout).save_profile(group, profile) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("saveImageProfile rejected for {:?}: {}", group, e);
                None
            }
        }
    }

    fn layout(&self) -> Arc<GalleryLayout> {
        self.layout.read().clone()
    }

    fn images<'a>(&'a self, layout: &'a GalleryLayout) -> ImageManager<'a> {
        ImageManager::new(layout, &self.profiles).with_clock(self.clock)
    }
}

fn report(operation: &str, result: Result<()>) -> OpResult {
    if let Err(e) = &result {
        tracing::warn!("{} failed: {}", operation, e);
    }
    OpResult::from(result)
}

fn name_or_empty(operation: &str, result: Result<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::error!("{} failed: {}", operation, e);
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixed_clock() -> String {
        "20250505_050505_005".to_string()
    }

    #[tokio::test]
    async fn test_root_lifecycle() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path().join("gallery"));
        assert!(!gallery.root_exists().await);

        gallery.ensure_root().await.unwrap();
        assert!(gallery.root_exists().await);

        gallery.set_root(tmp.path());
        assert_eq!(gallery.root(), tmp.path());
        let listing = gallery.list_groups().await;
        assert_eq!(listing.list, vec!["gallery"]);
    }

    #[tokio::test]
    async fn test_group_operations() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path());

        assert_eq!(gallery.create_group("Cats").await, OpResult::ok());
        assert!(gallery.list_groups().await.list.contains(&"Cats".to_string()));

        let dup = gallery.create_group("Cats").await;
        assert!(!dup.success);
        assert!(dup.error.is_some());

        let bad = gallery.create_group("a/b").await;
        assert!(!bad.success);

        assert!(gallery.rename_group("Cats", "Dogs").await.success);
        assert!(!gallery.rename_group("Cats", "Birds").await.success);
        assert!(gallery.remove_group("Dogs").await);
        assert!(!gallery.remove_group("Dogs").await);
        assert!(gallery.list_groups().await.list.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_group_profile_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path());

        let first = GroupProfile {
            last_opened_group: "one".into(),
            groups_order: vec!["one".into(), "two".into()],
            image_num_per_row: 2,
        };
        let second = GroupProfile {
            last_opened_group: "two".into(),
            groups_order: vec!["two".into(), "one".into()],
            image_num_per_row: 5,
        };

        let h1 = gallery.save_group_profile(&first);
        let h2 = gallery.save_group_profile(&second);
        let (r1, r2) = tokio::join!(h1, h2);
        r1.unwrap().unwrap();
        r2.unwrap().unwrap();

        let content = fs::read_to_string(tmp.path().join(app_fs::PROFILE_FILE_NAME)).unwrap();
        assert_eq!(content, serde_json::to_string(&second).unwrap());
        assert_eq!(gallery.list_groups().await.profile, second);
    }

    #[tokio::test]
    async fn test_image_imports() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path()).with_clock(fixed_clock);
        gallery.create_group("g").await;

        let pasted = gallery.save_image_from_buffer("g", b"bytes", ".gif").await;
        assert_eq!(pasted, "clipboard-image-20250505_050505_005.gif");

        let shot1 = gallery.save_image_from_base64("g", "data:image/png;base64,AQID").await;
        let shot2 = gallery.save_image_from_base64("g", "data:image/png;base64,AQID").await;
        assert_ne!(shot1, shot2);
        assert!(shot2.contains("（2）"));

        let source = tmp.path().join("outside.webp");
        fs::write(&source, b"webp").unwrap();
        let imported = gallery.copy_import_image(&source, "g").await;
        assert_eq!(imported, "outside.webp");
        let again = gallery.copy_import_image(&source, "g").await;
        assert_eq!(again, "outside（2）.webp");

        let listing = gallery.list_images("g").await;
        assert_eq!(listing.list.len(), 5);
        assert_eq!(listing.profile, ImageProfile::default());

        assert_eq!(gallery.save_image_from_base64("g", "***").await, "");
        assert_eq!(gallery.save_image_from_buffer("missing", b"x", "png").await, "");
        assert_eq!(gallery.copy_import_image(&tmp.path().join("nope.png"), "g").await, "");
    }

    #[tokio::test]
    async fn test_image_rename_remove_and_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path());
        gallery.create_group("g").await;
        fs::write(gallery.image_path("g", "a.png"), b"a").unwrap();
        fs::write(gallery.image_path("g", "b.png"), b"b").unwrap();

        assert!(!gallery.rename_image("g", "a.png", "b.png").await.success);
        assert!(gallery.rename_image("g", "a.png", "c.png").await.success);

        let profile = ImageProfile {
            images_order: vec!["c.png".into(), "b.png".into()],
            image_num_per_row: 0,
        };
        gallery
            .save_image_profile("g", &profile)
            .unwrap()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gallery.list_images("g").await.list, vec!["c.png", "b.png"]);
        assert!(gallery.save_image_profile("../x", &profile).is_none());

        assert!(gallery.remove_image("g", "c.png").await);
        assert!(!gallery.remove_image("g", "c.png").await);
        assert_eq!(gallery.list_images("g").await.list, vec!["b.png"]);
    }

    #[test]
    fn test_pure_helpers() {
        let gallery = Gallery::new("/root/gallery");
        assert!(gallery.is_supported_image("x.JPEG"));
        assert!(!gallery.is_supported_image(app_fs::PROFILE_FILE_NAME));
        assert!(!gallery.validate_name("").valid);
        assert_eq!(
            gallery.image_path("g", "x.png"),
            Path::new("/root/gallery").join("g").join("x.png")
        );
    }
}

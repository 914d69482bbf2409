//! Group directory management
//!
//! A group is a directory directly under the gallery root; its name is its
//! identity. The set of groups always comes from the live listing.

use crate::error::{GalleryError, Result};
use crate::ordering::{sort_by_order, Listing};
use crate::profile::GroupProfile;
use crate::profile_store::ProfileStore;
use app_fs::GalleryLayout;
use tokio::task::JoinHandle;

/// Reject user-supplied names the host can't store
pub(crate) fn ensure_valid_name(name: &str) -> Result<()> {
    let validation = app_fs::validate_name(name);
    if validation.valid {
        Ok(())
    } else {
        Err(GalleryError::Validation(
            validation.error.unwrap_or_else(|| "Invalid name".to_string()),
        ))
    }
}

/// Names of existing entries must stay inside their parent directory
pub(crate) fn ensure_existing_name(name: &str) -> Result<()> {
    if app_fs::is_plain_component(name) {
        Ok(())
    } else {
        Err(GalleryError::NotFound(name.to_string()))
    }
}

/// CRUD over group directories
pub struct GroupManager<'a> {
    layout: &'a GalleryLayout,
    profiles: &'a ProfileStore,
}

impl<'a> GroupManager<'a> {
    pub fn new(layout: &'a GalleryLayout, profiles: &'a ProfileStore) -> Self {
        Self { layout, profiles }
    }

    /// Create an empty group
    pub async fn create(&self, name: &str) -> Result<()> {
        ensure_valid_name(name)?;

        let path = self.layout.group_dir(name);
        app_fs::create_dir(&path).await?;

        tracing::info!("Created group: {}", name);
        Ok(())
    }

    /// Rename a group directory in place
    pub async fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        ensure_valid_name(new_name)?;
        ensure_existing_name(old_name)?;

        let from = self.layout.group_dir(old_name);
        let to = self.layout.group_dir(new_name);
        app_fs::rename_dir(&from, &to).await?;

        tracing::info!("Renamed group: {} -> {}", old_name, new_name);
        Ok(())
    }

    /// Delete a group and everything in it. Failure is reported, not raised.
    pub async fn remove(&self, name: &str) -> bool {
        if ensure_existing_name(name).is_err() {
            tracing::warn!("Refusing to remove group with unsafe name: {:?}", name);
            return false;
        }

        let path = self.layout.group_dir(name);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::info!("Removed group: {}", name);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to remove group {}: {}", name, e);
                false
            }
        }
    }

    /// All groups, sorted by the group profile, together with that profile
    pub async fn list_with_profile(&self) -> Listing<GroupProfile> {
        let mut list = match app_fs::list_directories(self.layout.root()).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Failed to list groups in {}: {}", self.layout.root().display(), e);
                return Listing {
                    list: Vec::new(),
                    profile: GroupProfile::default(),
                };
            }
        };

        let profile: GroupProfile = self.profiles.load(&self.layout.group_profile_path()).await;
        sort_by_order(&mut list, &profile.groups_order);

        Listing { list, profile }
    }

    /// Queue a write of the group profile
    pub fn save_profile(&self, profile: &GroupProfile) -> JoinHandle<Result<()>> {
        self.profiles.save(self.layout.group_profile_path(), profile)
    }
}

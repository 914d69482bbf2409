//! Image file management within a group
//!
//! All three import paths (clipboard bytes, screenshot data URL, file copy)
//! claim their target name with an exclusive create and move on to a new
//! candidate when the name is taken, so an existing image is never replaced.

use crate::error::{GalleryError, Result};
use crate::groups::{ensure_existing_name, ensure_valid_name};
use crate::ordering::{sort_by_order, Listing};
use crate::profile::ImageProfile;
use crate::profile_store::ProfileStore;
use app_fs::GalleryLayout;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::path::Path;
use tokio::task::JoinHandle;

/// Name prefix for images pasted from the clipboard
pub const CLIPBOARD_PREFIX: &str = "clipboard-image-";

/// Name prefix for pasted screenshots
pub const SCREENSHOT_PREFIX: &str = "screenshot-image-";

/// Screenshots are always stored as PNG
const SCREENSHOT_EXTENSION: &str = ".png";

/// Source of the timestamp embedded in generated names
pub type Clock = fn() -> String;

/// Standard alphabet, padding optional
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Strip a `data:image/<subtype>;base64,` prefix if present
pub fn strip_data_url_prefix(data: &str) -> &str {
    data.strip_prefix("data:image/")
        .and_then(|rest| {
            let (subtype, payload) = rest.split_once(";base64,")?;
            (!subtype.is_empty() && !subtype.contains(';')).then_some(payload)
        })
        .unwrap_or(data)
}

/// Decode a screenshot payload, with or without its data URL prefix
pub fn decode_data_url(data: &str) -> Result<Vec<u8>> {
    let payload: String = strip_data_url_prefix(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    BASE64
        .decode(payload.as_bytes())
        .map_err(|e| GalleryError::Validation(format!("Invalid base64 image data: {}", e)))
}

/// CRUD over the images of one gallery
pub struct ImageManager<'a> {
    layout: &'a GalleryLayout,
    profiles: &'a ProfileStore,
    clock: Clock,
}

impl<'a> ImageManager<'a> {
    pub fn new(layout: &'a GalleryLayout, profiles: &'a ProfileStore) -> Self {
        Self {
            layout,
            profiles,
            clock: app_fs::timestamp_now,
        }
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Images of a group, sorted by its image profile, together with that profile
    pub async fn list_with_profile(&self, group: &str) -> Listing<ImageProfile> {
        let empty = || Listing {
            list: Vec::new(),
            profile: ImageProfile::default(),
        };

        if ensure_existing_name(group).is_err() {
            return empty();
        }

        let dir = self.layout.group_dir(group);
        let mut list = match app_fs::list_image_files(&dir).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Failed to list images in {}: {}", dir.display(), e);
                return empty();
            }
        };

        let profile: ImageProfile = self.profiles.load(&self.layout.image_profile_path(group)).await;
        sort_by_order(&mut list, &profile.images_order);

        Listing { list, profile }
    }

    /// Store clipboard image bytes under a generated name
    pub async fn save_from_buffer(&self, group: &str, bytes: &[u8], extension: &str) -> Result<String> {
        let ext = app_fs::normalize_extension(extension);
        let name = self.write_stamped(group, CLIPBOARD_PREFIX, &ext, bytes).await?;

        tracing::info!("Saved clipboard image: {}/{}", group, name);
        Ok(name)
    }

    /// Store a base64 screenshot (optionally a data URL) as a PNG
    pub async fn save_from_base64(&self, group: &str, data_url: &str) -> Result<String> {
        let bytes = decode_data_url(data_url)?;
        let name = self
            .write_stamped(group, SCREENSHOT_PREFIX, SCREENSHOT_EXTENSION, &bytes)
            .await?;

        tracing::info!("Saved screenshot: {}/{}", group, name);
        Ok(name)
    }

    /// Copy an external file into a group, keeping its name when free
    pub async fn copy_import(&self, source: &Path, group: &str) -> Result<String> {
        ensure_existing_name(group)?;

        let base = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GalleryError::Validation("Source has no usable file name".to_string()))?;
        ensure_valid_name(base)?;

        let dir = self.layout.group_dir(group);
        let name = app_fs::copy_unique(source, &dir, |attempt| app_fs::numbered_name(base, attempt))
            .await?;

        tracing::info!("Imported {} as {}/{}", source.display(), group, name);
        Ok(name)
    }

    /// Rename an image in place, never replacing another file
    pub async fn rename(&self, group: &str, old_name: &str, new_name: &str) -> Result<()> {
        ensure_valid_name(new_name)?;
        ensure_existing_name(group)?;
        ensure_existing_name(old_name)?;

        let from = self.layout.image_path(group, old_name);
        let to = self.layout.image_path(group, new_name);
        app_fs::rename_file(&from, &to).await?;

        tracing::info!("Renamed image in {}: {} -> {}", group, old_name, new_name);
        Ok(())
    }

    /// Delete an image. Failure is reported, not raised.
    pub async fn remove(&self, group: &str, name: &str) -> bool {
        if ensure_existing_name(group).is_err() || ensure_existing_name(name).is_err() {
            tracing::warn!("Refusing to remove image with unsafe path: {:?}/{:?}", group, name);
            return false;
        }

        let path = self.layout.image_path(group, name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Removed image: {}/{}", group, name);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to remove image {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Queue a write of a group's image profile
    pub fn save_profile(&self, group: &str, profile: &ImageProfile) -> Result<JoinHandle<Result<()>>> {
        ensure_existing_name(group)?;
        Ok(self.profiles.save(self.layout.image_profile_path(group), profile))
    }

    /// Write `bytes` as `<prefix><timestamp>[（n）]<ext>`, taking a fresh
    /// timestamp for every attempt
    async fn write_stamped(&self, group: &str, prefix: &str, ext: &str, bytes: &[u8]) -> Result<String> {
        ensure_existing_name(group)?;

        let clock = self.clock;
        let first = app_fs::stamped_name(prefix, &clock(), 1, ext);
        ensure_valid_name(&first)?;

        let dir = self.layout.group_dir(group);
        let mut first = Some(first);
        let name = app_fs::write_unique(
            &dir,
            |attempt| match first.take() {
                Some(name) => name,
                None => app_fs::stamped_name(prefix, &clock(), attempt, ext),
            },
            bytes,
        )
        .await?;

        Ok(name)
    }
}

//! Directory listing for groups and images
//!
//! Entries come back in the order the OS enumerates them; ordering by user
//! preference happens one layer up.

use crate::Result;
use std::path::Path;
use tokio::fs;

/// Extensions recognised as images (lowercase, without the dot)
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "svg", "gif", "bmp", "webp", "ico"];

/// Check if a file name has a supported image extension (case-insensitive)
pub fn is_supported_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// What kind of entry a listing keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryFilter {
    Directories,
    ImageFiles,
}

/// List the names of the directories directly under `root`
pub async fn list_directories(root: &Path) -> Result<Vec<String>> {
    list_entries(root, EntryFilter::Directories).await
}

/// List the names of regular image files directly under `dir`
pub async fn list_image_files(dir: &Path) -> Result<Vec<String>> {
    list_entries(dir, EntryFilter::ImageFiles).await
}

async fn list_entries(dir: &Path, filter: EntryFilter) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        // file_type() does not follow symlinks
        let file_type = match entry.file_type().await {
            Ok(t) => t,
            Err(_) => continue, // Skip entries we can't stat
        };

        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(raw) => {
                tracing::debug!("Skipping non UTF-8 entry: {:?}", raw);
                continue;
            }
        };

        let keep = match filter {
            EntryFilter::Directories => file_type.is_dir(),
            EntryFilter::ImageFiles => file_type.is_file() && is_supported_image(&name),
        };

        if keep {
            names.push(name);
        }
    }

    tracing::debug!("Listed {} entries in {}", names.len(), dir.display());
    Ok(names)
}

//! Candidate names for newly imported images

use chrono::Local;
use std::path::Path;

/// Current local time as `YYYYMMDD_HHMMSS_mmm`
pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
}

/// Ensure an extension starts with a dot (`png` -> `.png`)
pub fn normalize_extension(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Disambiguator for the n-th attempt, e.g. `（2）`
fn counter(attempt: u32) -> String {
    format!("（{}）", attempt)
}

/// `<prefix><stamp><ext>` on the first attempt, `<prefix><stamp>（n）<ext>` after
pub fn stamped_name(prefix: &str, stamp: &str, attempt: u32, ext: &str) -> String {
    if attempt <= 1 {
        format!("{}{}{}", prefix, stamp, ext)
    } else {
        format!("{}{}{}{}", prefix, stamp, counter(attempt), ext)
    }
}

/// Keep `file_name` on the first attempt, then insert `（n）` before the extension
///
/// `photo.png` -> `photo（2）.png`, `README` -> `README（2）`
pub fn numbered_name(file_name: &str, attempt: u32) -> String {
    if attempt <= 1 {
        return file_name.to_string();
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());

    match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, counter(attempt), ext.to_string_lossy()),
        None => format!("{}{}", stem, counter(attempt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp_now();
        assert_eq!(stamp.len(), "20240131_235959_123".len());
        let parts: Vec<&str> = stamp.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 3);
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_stamped_name() {
        assert_eq!(
            stamped_name("clipboard-image-", "20240101_120000_001", 1, ".png"),
            "clipboard-image-20240101_120000_001.png"
        );
        assert_eq!(
            stamped_name("screenshot-image-", "20240101_120000_001", 3, ".png"),
            "screenshot-image-20240101_120000_001（3）.png"
        );
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("photo.png", 1), "photo.png");
        assert_eq!(numbered_name("photo.png", 2), "photo（2）.png");
        assert_eq!(numbered_name("archive.tar.gif", 4), "archive.tar（4）.gif");
        assert_eq!(numbered_name("README", 2), "README（2）");
        assert_eq!(numbered_name(".hidden", 2), ".hidden（2）");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("png"), ".png");
        assert_eq!(normalize_extension(".jpg"), ".jpg");
        assert_eq!(normalize_extension(""), "");
    }
}

//! Name validation for groups and images
//!
//! Rules depend on the host the gallery runs on, never on where the files
//! might later be copied to.

use serde::Serialize;

/// Windows reserved device names
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Windows forbidden characters
const WINDOWS_FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Windows limit, counted in UTF-16 units
const WINDOWS_MAX_LEN: usize = 200;

/// macOS and Linux limit, counted in UTF-8 bytes
const UNIX_MAX_BYTES: usize = 255;

/// Host family whose naming rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Other,
}

impl HostOs {
    /// The operating system this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::MacOs
        } else {
            HostOs::Other
        }
    }
}

/// Result of validating a user-supplied name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NameValidation {
    fn ok() -> Self {
        Self { valid: true, error: None }
    }

    fn reject(message: &str) -> Self {
        Self {
            valid: false,
            error: Some(message.to_string()),
        }
    }
}

/// Validate a group or image name against the current host's rules
pub fn validate_name(name: &str) -> NameValidation {
    validate_name_for(HostOs::current(), name)
}

/// Validate a name against the rules of a specific host family
pub fn validate_name_for(os: HostOs, name: &str) -> NameValidation {
    if name.trim().is_empty() {
        return NameValidation::reject("Name cannot be empty");
    }

    if name == "." || name == ".." {
        return NameValidation::reject("Name cannot be . or ..");
    }

    if name.contains('\0') {
        return NameValidation::reject("Name cannot contain a null character");
    }

    match os {
        HostOs::Windows => {
            if name.encode_utf16().count() > WINDOWS_MAX_LEN {
                return NameValidation::reject("Name cannot exceed 200 characters");
            }

            if name.chars().any(|c| WINDOWS_FORBIDDEN_CHARS.contains(&c)) {
                return NameValidation::reject(
                    "Name cannot contain \\ / : * ? \" < > |",
                );
            }

            // Windows strips these silently
            if name.ends_with('.') || name.ends_with(' ') {
                return NameValidation::reject("Name cannot end with a space or a dot");
            }

            let name_upper = name.to_uppercase();
            let base_name = name_upper.split('.').next().unwrap_or("");
            if RESERVED_NAMES.contains(&base_name) {
                return NameValidation::reject(
                    "Name cannot be a reserved system name (CON, PRN, AUX, ...)",
                );
            }
        }
        HostOs::MacOs => {
            if name.len() > UNIX_MAX_BYTES {
                return NameValidation::reject("Name is too long");
            }

            // HFS+/APFS present ':' as '/'
            if name.contains('/') || name.contains(':') {
                return NameValidation::reject("Name cannot contain / or :");
            }
        }
        HostOs::Other => {
            if name.len() > UNIX_MAX_BYTES {
                return NameValidation::reject("Name is too long");
            }

            if name.contains('/') {
                return NameValidation::reject("Name cannot contain /");
            }
        }
    }

    NameValidation::ok()
}

/// Check that a name refers to a single entry directly inside its parent.
///
/// Weaker than [`validate_name`]: used for names of entries that already
/// exist on disk, so that they can never resolve outside the gallery root.
pub fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('\0')
        && !name.chars().any(std::path::is_separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_rejections() {
        for os in [HostOs::Windows, HostOs::MacOs, HostOs::Other] {
            assert!(!validate_name_for(os, "").valid);
            assert!(!validate_name_for(os, "   ").valid);
            assert!(!validate_name_for(os, ".").valid);
            assert!(!validate_name_for(os, "..").valid);
            assert!(!validate_name_for(os, "a\0b").valid);
            assert!(!validate_name_for(os, "a/b").valid);
            assert!(validate_name_for(os, "Wallpapers").valid);
            assert!(validate_name_for(os, "..hidden").valid);
        }
    }

    #[test]
    fn test_windows_rules() {
        let os = HostOs::Windows;
        for bad in ["a\\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            assert!(!validate_name_for(os, bad).valid, "{bad} should be rejected");
        }
        assert!(!validate_name_for(os, "trailing.").valid);
        assert!(!validate_name_for(os, "trailing ").valid);
        assert!(!validate_name_for(os, "CON").valid);
        assert!(!validate_name_for(os, "con.png").valid);
        assert!(!validate_name_for(os, "Lpt9").valid);
        assert!(validate_name_for(os, "CONSOLE").valid);
        assert!(validate_name_for(os, "COM0").valid);
        assert!(validate_name_for(os, &"a".repeat(200)).valid);
        assert!(!validate_name_for(os, &"a".repeat(201)).valid);
    }

    #[test]
    fn test_macos_rules() {
        let os = HostOs::MacOs;
        assert!(!validate_name_for(os, "a:b").valid);
        assert!(validate_name_for(os, "a\\b").valid);
        assert!(validate_name_for(os, "trailing.").valid);
        assert!(validate_name_for(os, "CON").valid);
        // 85 * 3 bytes = 255
        assert!(validate_name_for(os, &"图".repeat(85)).valid);
        assert!(!validate_name_for(os, &"图".repeat(86)).valid);
    }

    #[test]
    fn test_other_rules() {
        let os = HostOs::Other;
        assert!(validate_name_for(os, "a:b").valid);
        assert!(validate_name_for(os, "a\\b").valid);
        assert!(validate_name_for(os, "a*b?").valid);
        assert!(!validate_name_for(os, &"a".repeat(256)).valid);
    }

    #[test]
    fn test_error_message_present() {
        let result = validate_name_for(HostOs::Other, "");
        assert!(!result.valid);
        assert!(result.error.is_some());
        assert_eq!(validate_name_for(HostOs::Other, "ok").error, None);
    }

    #[test]
    fn test_plain_component() {
        assert!(is_plain_component("photo.png"));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("a/b"));
        assert!(!is_plain_component(""));
    }
}

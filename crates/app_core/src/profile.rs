//! Sidecar profile model
//!
//! Sidecar files are untrusted disk content: users and other tools can edit
//! or truncate them. Decoding therefore never fails field by field; each
//! field that is missing or has the wrong shape falls back to its default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A profile stored in a sidecar JSON file
pub trait SidecarProfile: Serialize + Default + Send + Sync + 'static {
    /// Decode a parsed JSON document, `None` if it is not an object
    fn decode(value: &Value) -> Option<Self>;

    /// Decode raw file content, `None` if it is not a JSON object
    fn parse(content: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(content).ok()?;
        Self::decode(&value)
    }
}

/// Gallery-wide profile, stored at the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProfile {
    /// Group shown on the last visit (may be stale)
    pub last_opened_group: String,
    /// Preferred group order, used only as a sort key
    pub groups_order: Vec<String>,
    /// Images per row, global layout hint
    pub image_num_per_row: u32,
}

impl Default for GroupProfile {
    fn default() -> Self {
        Self {
            last_opened_group: String::new(),
            groups_order: Vec::new(),
            image_num_per_row: 1,
        }
    }
}

impl SidecarProfile for GroupProfile {
    fn decode(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let defaults = Self::default();

        Some(Self {
            last_opened_group: string_field(obj, "lastOpenedGroup")
                .unwrap_or(defaults.last_opened_group),
            groups_order: string_list(obj, "groupsOrder").unwrap_or(defaults.groups_order),
            image_num_per_row: count_field(obj, "imageNumPerRow")
                .unwrap_or(defaults.image_num_per_row),
        })
    }
}

/// Per-group profile, stored inside the group directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProfile {
    /// Preferred image order, used only as a sort key
    pub images_order: Vec<String>,
    /// Images per row for this group, 0 means use the global value
    pub image_num_per_row: u32,
}

impl SidecarProfile for ImageProfile {
    fn decode(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        Some(Self {
            images_order: string_list(obj, "imagesOrder").unwrap_or_default(),
            image_num_per_row: count_field(obj, "imageNumPerRow").unwrap_or(0),
        })
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?.as_str().map(str::to_string)
}

/// An array made only of strings
fn string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    obj.get(key)?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// A non-negative number; fractions truncate, huge values saturate
fn count_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    let number = obj.get(key)?;
    if let Some(n) = number.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }

    let f = number.as_f64()?;
    if f.is_finite() && f >= 0.0 {
        // `as` saturates on overflow
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_profile_valid() {
        let profile = ImageProfile::parse(r#"{"imagesOrder":["b.png","a.png"],"imageNumPerRow":3}"#);
        assert_eq!(
            profile,
            Some(ImageProfile {
                images_order: vec!["b.png".into(), "a.png".into()],
                image_num_per_row: 3,
            })
        );
    }

    #[test]
    fn test_image_profile_not_an_object() {
        assert_eq!(ImageProfile::parse("not json"), None);
        assert_eq!(ImageProfile::parse("[1, 2]"), None);
        assert_eq!(ImageProfile::parse("null"), None);
        assert_eq!(ImageProfile::parse("42"), None);
    }

    #[test]
    fn test_image_profile_field_resets() {
        let cases = [
            json!({}),
            json!({"imagesOrder": "a.png", "imageNumPerRow": "3"}),
            json!({"imagesOrder": ["a.png", 1], "imageNumPerRow": -2}),
            json!({"imagesOrder": null, "imageNumPerRow": null}),
        ];
        for case in cases {
            assert_eq!(ImageProfile::decode(&case), Some(ImageProfile::default()), "{case}");
        }
    }

    #[test]
    fn test_image_profile_keeps_valid_fields() {
        let profile = ImageProfile::decode(&json!({"imagesOrder": ["x.gif"], "imageNumPerRow": -1}))
            .unwrap();
        assert_eq!(profile.images_order, vec!["x.gif"]);
        assert_eq!(profile.image_num_per_row, 0);

        let profile = ImageProfile::decode(&json!({"imagesOrder": 5, "imageNumPerRow": 2.7}))
            .unwrap();
        assert!(profile.images_order.is_empty());
        assert_eq!(profile.image_num_per_row, 2);
    }

    #[test]
    fn test_group_profile_defaults() {
        let profile = GroupProfile::decode(&json!({"groupsOrder": ["b", "a"]})).unwrap();
        assert_eq!(profile.groups_order, vec!["b", "a"]);
        assert_eq!(profile.last_opened_group, "");
        assert_eq!(profile.image_num_per_row, 1);
        assert_eq!(GroupProfile::parse("{broken"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let profile = GroupProfile {
            last_opened_group: "cats".into(),
            groups_order: vec!["cats".into()],
            image_num_per_row: 4,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            value,
            json!({"lastOpenedGroup": "cats", "groupsOrder": ["cats"], "imageNumPerRow": 4})
        );
        assert_eq!(
            serde_json::to_value(ImageProfile::default()).unwrap(),
            json!({"imagesOrder": [], "imageNumPerRow": 0})
        );
    }
}

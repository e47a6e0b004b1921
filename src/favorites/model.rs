/// Data structures for favorites and groups
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name given to the group synthesized when none is marked default
pub const DEFAULT_GROUP_NAME: &str = "Ungrouped";
pub const DEFAULT_GROUP_COLOR: &str = "#9e9e9e";

/// A saved website shortcut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub group_id: Option<String>,
    #[serde(default = "chrono::Utc::now", deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(id: String, name: String, url: String, icon: String, group_id: Option<String>) -> Favorite {
        Favorite {
            id,
            name,
            url,
            icon,
            group_id,
            created_at: Utc::now(),
        }
    }
}

/// A named, colored bucket of favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Group {
    pub fn new(id: String, name: String, color: String) -> Group {
        Group {
            id,
            name,
            color,
            is_default: false,
        }
    }
}

/// Partial edit of a group; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// One entry of a bulk add
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl SiteEntry {
    pub fn new(name: &str, url: &str) -> SiteEntry {
        SiteEntry {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

impl From<&crate::sites::QuickSite> for SiteEntry {
    fn from(site: &crate::sites::QuickSite) -> Self {
        SiteEntry::new(site.name, site.url)
    }
}

// Older builds stored numeric ids (Date.now()); keep them as their decimal text.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid id: {}", other))),
    }
}

pub(crate) fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!("invalid group id: {}", other))),
    }
}

pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(Utc::now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_favorite_creation() {
        let favorite = Favorite::new(
            "fav-1".to_string(),
            "Google".to_string(),
            "https://google.com".to_string(),
            "fab fa-google".to_string(),
            Some("group-1".to_string()),
        );

        assert_eq!(favorite.id, "fav-1");
        assert_eq!(favorite.url, "https://google.com");
        assert_eq!(favorite.group_id.as_deref(), Some("group-1"));
    }

    #[test]
    fn test_favorite_wire_format() {
        let favorite = Favorite::new(
            "fav-1".to_string(),
            "GitHub".to_string(),
            "https://github.com".to_string(),
            "fab fa-github".to_string(),
            None,
        );

        let json = serde_json::to_value(&favorite).unwrap();

        assert_eq!(json["groupId"], Value::Null);
        assert!(json["createdAt"].is_string());
        assert_eq!(json["icon"], "fab fa-github");
    }

    #[test]
    fn test_legacy_favorite_with_numeric_id() {
        let favorite: Favorite = serde_json::from_value(json!({
            "id": 1698508200000u64,
            "name": "Google",
            "url": "https://www.google.com/",
            "icon": "fab fa-google",
            "createdAt": "2023-10-28T15:50:00.000Z"
        }))
        .unwrap();

        assert_eq!(favorite.id, "1698508200000");
        assert_eq!(favorite.group_id, None);
        assert_eq!(favorite.created_at.timestamp_millis(), 1698508200000);
    }

    #[test]
    fn test_garbled_timestamp_does_not_reject_favorite() {
        let favorite: Favorite = serde_json::from_value(json!({
            "id": "a",
            "name": "A",
            "url": "https://a.com",
            "groupId": "",
            "createdAt": "yesterday"
        }))
        .unwrap();

        assert_eq!(favorite.group_id, None);
    }

    #[test]
    fn test_group_serialization() {
        let mut group = Group::new("g1".to_string(), "Work".to_string(), "#ff0000".to_string());
        group.is_default = true;

        let json = serde_json::to_string(&group).unwrap();
        let deserialized: Group = serde_json::from_str(&json).unwrap();

        assert!(json.contains("\"isDefault\":true"));
        assert_eq!(deserialized, group);
    }

    #[test]
    fn test_site_entry_defaults() {
        let entry: SiteEntry = serde_json::from_value(json!({ "url": "https://a.com" })).unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.url, "https://a.com");
    }
}

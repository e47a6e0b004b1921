/// Export snapshots and import-merge of favorites files
use super::collection::{FavoritesData, display_name};
use super::model::{Favorite, Group, id_string, lenient_timestamp, optional_id_string};
use crate::error::{DashboardError, Result};
use crate::random::{pastel_color, unique_id};
use crate::sites::{default_icon, is_valid_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const EXPORT_VERSION: &str = "1.0";

/// Self-describing snapshot written to export files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub favorites: Vec<Favorite>,
    pub groups: Vec<Group>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn new(data: &FavoritesData) -> ExportDocument {
        ExportDocument {
            favorites: data.favorites().to_vec(),
            groups: data.groups().to_vec(),
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            log::error!("Export failed: {:?}", e);
            String::new()
        })
    }

    /// Suggested download name, e.g. `favorites-2024-10-28.json`
    pub fn file_name(&self) -> String {
        format!("favorites-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

/// Favorite as found in an import file; everything but the url is optional
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedFavorite {
    #[serde(default, deserialize_with = "optional_id_string")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    url: String,
    #[serde(default)]
    icon: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    group_id: Option<String>,
    #[serde(default = "chrono::Utc::now", deserialize_with = "lenient_timestamp")]
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedGroup {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    is_default: bool,
}

/// Merge an exported file into `data`, returning how many favorites were added.
///
/// - favorites whose url is already present (locally or earlier in the file) are dropped
/// - favorite ids that collide with local ids are regenerated
/// - a group whose id collides with a local group is recreated under a fresh id,
///   and the imported favorites that referenced it follow it
/// - the file's default group folds into the local default group
/// - favorites left pointing at an unknown group land in the default group
pub fn import_into(data: &mut FavoritesData, contents: &str) -> Result<usize> {
    let document: Value = serde_json::from_str(contents)
        .map_err(|e| DashboardError::InvalidFileFormat(e.to_string()))?;

    let Some(entries) = document.get("favorites").and_then(Value::as_array) else {
        return Err(DashboardError::InvalidFileFormat(
            "missing favorites array".to_string(),
        ));
    };
    let group_entries = document
        .get("groups")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let incoming = collect_favorites(data, entries);
    let (groups, remap) = collect_groups(data, group_entries);

    let incoming: Vec<Favorite> = incoming
        .into_iter()
        .map(|mut favorite| {
            if let Some(target) = favorite.group_id.as_ref().and_then(|old| remap.get(old)) {
                favorite.group_id = target.clone();
            }
            favorite
        })
        .collect();

    let count = incoming.len();
    log::info!("Importing {} favorites and {} groups", count, groups.len());

    data.extend(incoming, groups);
    data.normalize();
    Ok(count)
}

fn collect_favorites(data: &FavoritesData, entries: &[Value]) -> Vec<Favorite> {
    let mut seen_urls: HashSet<String> = data.favorites().iter().map(|f| f.url.clone()).collect();
    let mut taken_ids: HashSet<String> = data.favorites().iter().map(|f| f.id.clone()).collect();
    let mut incoming = Vec::new();

    for entry in entries {
        let imported: ImportedFavorite = match serde_json::from_value(entry.clone()) {
            Ok(imported) => imported,
            Err(e) => {
                log::warn!("Skipping unreadable favorite in import: {}", e);
                continue;
            }
        };

        let url = imported.url.trim().to_string();
        if url.is_empty() || !is_valid_url(&url) || seen_urls.contains(&url) {
            log::debug!("Skipping imported favorite '{}'", imported.url);
            continue;
        }
        seen_urls.insert(url.clone());

        let id = match imported.id {
            Some(id) if !taken_ids.contains(&id) => id,
            _ => unique_id(|candidate| taken_ids.contains(candidate)),
        };
        taken_ids.insert(id.clone());

        let icon = if imported.icon.trim().is_empty() {
            default_icon(&url).to_string()
        } else {
            imported.icon
        };

        incoming.push(Favorite {
            id,
            name: display_name(&imported.name, &url),
            url,
            icon,
            group_id: imported.group_id,
            created_at: imported.created_at,
        });
    }

    incoming
}

/// New groups to append, plus the old-id to new-id mapping for imported favorites
fn collect_groups(
    data: &FavoritesData,
    entries: &[Value],
) -> (Vec<Group>, HashMap<String, Option<String>>) {
    let local_default = data.default_group_id();
    let mut taken_ids: HashSet<String> = data.groups().iter().map(|g| g.id.clone()).collect();
    let mut seen_in_file = HashSet::new();
    let mut remap = HashMap::new();
    let mut groups = Vec::new();

    for entry in entries {
        let imported: ImportedGroup = match serde_json::from_value(entry.clone()) {
            Ok(imported) => imported,
            Err(e) => {
                log::warn!("Skipping unreadable group in import: {}", e);
                continue;
            }
        };
        if !seen_in_file.insert(imported.id.clone()) {
            continue;
        }

        if imported.is_default {
            remap.insert(imported.id, local_default.clone());
            continue;
        }

        let color = if imported.color.trim().is_empty() {
            pastel_color()
        } else {
            imported.color
        };

        let id = if taken_ids.contains(&imported.id) {
            let fresh = unique_id(|candidate| taken_ids.contains(candidate));
            log::debug!("Imported group {} collides, recreating as {}", imported.id, fresh);
            remap.insert(imported.id, Some(fresh.clone()));
            fresh
        } else {
            imported.id
        };
        taken_ids.insert(id.clone());

        groups.push(Group::new(id, imported.name, color));
    }

    (groups, remap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_data() -> FavoritesData {
        let mut data = FavoritesData::new();
        let work = data.create_group("Work", Some("#336699"));
        data.add_favorite("Google", "https://google.com", None, None).unwrap();
        data.add_favorite("GitHub", "https://github.com", None, Some(&work.id)).unwrap();
        data
    }

    fn urls(data: &FavoritesData) -> HashSet<String> {
        data.favorites().iter().map(|f| f.url.clone()).collect()
    }

    #[test]
    fn test_export_document() {
        let data = create_test_data();
        let document = ExportDocument::new(&data);

        assert_eq!(document.version, "1.0");
        assert_eq!(document.favorites.len(), 2);
        assert_eq!(document.groups.len(), 2);
        assert!(document.file_name().starts_with("favorites-"));
        assert!(document.file_name().ends_with(".json"));

        let json: Value = serde_json::from_str(&document.to_json()).unwrap();
        assert!(json["exportDate"].is_string());
        assert_eq!(json["version"], "1.0");
    }

    #[test]
    fn test_round_trip_into_empty() {
        let original = create_test_data();
        let exported = ExportDocument::new(&original).to_json();

        let mut fresh = FavoritesData::new();
        let count = import_into(&mut fresh, &exported).unwrap();

        assert_eq!(count, 2);
        assert_eq!(urls(&fresh), urls(&original));
        assert_eq!(fresh.groups().iter().filter(|g| g.is_default).count(), 1);
        assert_eq!(fresh.groups().len(), 2);

        let github = fresh.favorites().iter().find(|f| f.url == "https://github.com").unwrap();
        let group = fresh.get_group(github.group_id.as_deref().unwrap()).unwrap();
        assert_eq!(group.name, "Work");
    }

    #[test]
    fn test_import_requires_favorites_array() {
        let mut data = FavoritesData::new();

        assert!(matches!(
            import_into(&mut data, "{}"),
            Err(DashboardError::InvalidFileFormat(_))
        ));
        assert!(matches!(
            import_into(&mut data, r#"{"favorites": "nope"}"#),
            Err(DashboardError::InvalidFileFormat(_))
        ));
        assert!(matches!(
            import_into(&mut data, "not json"),
            Err(DashboardError::InvalidFileFormat(_))
        ));
        assert!(data.favorites().is_empty());
    }

    #[test]
    fn test_import_drops_existing_and_repeated_urls() {
        let mut data = create_test_data();
        let file = json!({
            "favorites": [
                { "id": 1, "name": "Google", "url": "https://google.com" },
                { "id": 2, "name": "Rust", "url": "https://rust-lang.org" },
                { "id": 3, "name": "Rust again", "url": "https://rust-lang.org" },
                { "name": "Broken", "url": "nope" },
                { "name": "No url" }
            ]
        });

        let count = import_into(&mut data, &file.to_string()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(data.favorites().len(), 3);
        let rust = data.favorites().iter().find(|f| f.url == "https://rust-lang.org").unwrap();
        assert_eq!(rust.id, "2");
        assert_eq!(rust.group_id, data.default_group_id());
        assert_eq!(rust.icon, "fas fa-globe");
    }

    #[test]
    fn test_import_regenerates_colliding_favorite_ids() {
        let mut data = create_test_data();
        let existing_id = data.favorites()[0].id.clone();
        let file = json!({
            "favorites": [{ "id": existing_id, "name": "New", "url": "https://new.example.com" }]
        });

        import_into(&mut data, &file.to_string()).unwrap();

        let imported = data.favorites().last().unwrap();
        assert_ne!(imported.id, existing_id);
    }

    #[test]
    fn test_import_recreates_colliding_group() {
        let mut data = create_test_data();
        let work_id = data.groups()[1].id.clone();
        let file = json!({
            "favorites": [{ "id": "x", "name": "Docs", "url": "https://docs.rs", "groupId": work_id }],
            "groups": [{ "id": work_id, "name": "Imported Work", "color": "#ff0000", "isDefault": false }]
        });

        import_into(&mut data, &file.to_string()).unwrap();

        assert_eq!(data.groups().len(), 3);
        let recreated = &data.groups()[2];
        assert_ne!(recreated.id, work_id);
        assert_eq!(recreated.name, "Imported Work");

        let docs = data.favorites().iter().find(|f| f.url == "https://docs.rs").unwrap();
        assert_eq!(docs.group_id.as_deref(), Some(recreated.id.as_str()));

        let github = data.favorites().iter().find(|f| f.url == "https://github.com").unwrap();
        assert_eq!(github.group_id.as_deref(), Some(work_id.as_str()));
    }

    #[test]
    fn test_import_new_group_kept_as_is() {
        let mut data = FavoritesData::new();
        let file = json!({
            "favorites": [{ "name": "Docs", "url": "https://docs.rs", "groupId": "g-reading" }],
            "groups": [
                { "id": "g-reading", "name": "Reading", "color": "" },
                { "id": "g-reading", "name": "Duplicate", "color": "#000" }
            ]
        });

        import_into(&mut data, &file.to_string()).unwrap();

        assert_eq!(data.groups().len(), 2);
        let reading = data.get_group("g-reading").unwrap();
        assert_eq!(reading.name, "Reading");
        assert!(!reading.is_default);
        assert!(reading.color.starts_with("hsl("));
        assert_eq!(data.favorites()[0].group_id.as_deref(), Some("g-reading"));
    }

    #[test]
    fn test_import_without_groups_backfills_default() {
        let mut data = FavoritesData::new();
        let file = json!({
            "favorites": [{ "name": "A", "url": "https://a.com", "groupId": "unknown" }]
        });

        assert_eq!(import_into(&mut data, &file.to_string()).unwrap(), 1);
        assert_eq!(data.favorites()[0].group_id, data.default_group_id());
    }
}

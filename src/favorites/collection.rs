/// Favorites and groups held together so their cross references stay valid
use super::model::{
    DEFAULT_GROUP_COLOR, DEFAULT_GROUP_NAME, Favorite, Group, GroupUpdate, SiteEntry,
};
use crate::error::{DashboardError, Result};
use crate::random::{pastel_color, unique_id};
use crate::sites::{default_icon, extract_hostname, is_valid_url};
use std::collections::HashSet;

/// Name given to a group created without one
pub const NEW_GROUP_NAME: &str = "New Group";

/// Trimmed name, or the hostname when the name is blank
pub(crate) fn display_name(name: &str, url: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        extract_hostname(url).unwrap_or_else(|| url.to_string())
    } else {
        name.to_string()
    }
}

/// In-memory favorites and groups.
///
/// Invariants kept by every method:
/// - no two favorites share a `url`
/// - exactly one group has `is_default`, and it is the first group
/// - every favorite's `group_id` names an existing group (after `normalize`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FavoritesData {
    favorites: Vec<Favorite>,
    groups: Vec<Group>,
}

impl FavoritesData {
    /// Empty collection with a fresh default group
    pub fn new() -> Self {
        let mut data = FavoritesData::default();
        data.normalize();
        data
    }

    /// Build from stored parts, repairing them. Second value reports whether anything changed.
    pub fn from_parts(favorites: Vec<Favorite>, groups: Vec<Group>) -> (Self, bool) {
        let mut data = FavoritesData { favorites, groups };
        let changed = data.normalize();
        (data, changed)
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get_favorite(&self, id: &str) -> Option<&Favorite> {
        self.favorites.iter().find(|f| f.id == id)
    }

    pub fn get_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.favorites.iter().any(|f| f.url == url)
    }

    pub fn default_group(&self) -> Option<&Group> {
        self.groups.first()
    }

    pub fn default_group_id(&self) -> Option<String> {
        self.default_group().map(|g| g.id.clone())
    }

    /// Repair the collection in place: drop repeated urls, re-key repeated ids,
    /// ensure a single leading default group, then point ungrouped or dangling
    /// favorites at it. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = self.dedupe_favorites();
        changed |= self.ensure_default_group();

        let known: HashSet<String> = self.groups.iter().map(|g| g.id.clone()).collect();
        let fallback = self.default_group_id();

        for favorite in &mut self.favorites {
            let valid = favorite.group_id.as_ref().is_some_and(|id| known.contains(id));
            if !valid {
                favorite.group_id = fallback.clone();
                changed = true;
            }
        }

        changed
    }

    /// First favorite per url wins; later holders of a taken id get a fresh one
    fn dedupe_favorites(&mut self) -> bool {
        let original_len = self.favorites.len();
        let mut seen_urls = HashSet::new();
        self.favorites.retain(|f| {
            let first = seen_urls.insert(f.url.clone());
            if !first {
                log::warn!("Dropping repeated favorite {}", f.url);
            }
            first
        });
        let mut changed = self.favorites.len() < original_len;

        let mut taken: HashSet<String> = HashSet::new();
        let all_ids: HashSet<String> = self.favorites.iter().map(|f| f.id.clone()).collect();
        for favorite in &mut self.favorites {
            if taken.insert(favorite.id.clone()) {
                continue;
            }
            let id = unique_id(|candidate| all_ids.contains(candidate) || taken.contains(candidate));
            log::warn!("Favorite id {} repeated, re-keyed as {}", favorite.id, id);
            taken.insert(id.clone());
            favorite.id = id;
            changed = true;
        }

        changed
    }

    fn ensure_default_group(&mut self) -> bool {
        match self.groups.iter().position(|g| g.is_default) {
            Some(index) => {
                let mut changed = false;
                for (i, group) in self.groups.iter_mut().enumerate() {
                    if i != index && group.is_default {
                        group.is_default = false;
                        changed = true;
                    }
                }
                if index != 0 {
                    let group = self.groups.remove(index);
                    self.groups.insert(0, group);
                    changed = true;
                }
                changed
            }
            None => {
                let id = self.new_group_id();
                let mut group = Group::new(id, DEFAULT_GROUP_NAME.to_string(), DEFAULT_GROUP_COLOR.to_string());
                group.is_default = true;
                log::info!("Creating default group {}", group.id);
                self.groups.insert(0, group);
                true
            }
        }
    }

    fn new_favorite_id(&self) -> String {
        unique_id(|candidate| self.favorites.iter().any(|f| f.id == candidate))
    }

    fn new_group_id(&self) -> String {
        unique_id(|candidate| self.groups.iter().any(|g| g.id == candidate))
    }

    /// Explicit group must exist; no group means the default
    fn resolve_group(&self, group_id: Option<&str>) -> Result<Option<String>> {
        match group_id {
            Some(id) if self.get_group(id).is_some() => Ok(Some(id.to_string())),
            Some(id) => Err(DashboardError::UnknownGroup(id.to_string())),
            None => Ok(self.default_group_id()),
        }
    }

    /// Add one favorite, rejecting malformed and already-saved URLs
    pub fn add_favorite(
        &mut self,
        name: &str,
        url: &str,
        icon: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<Favorite> {
        let url = url.trim();
        if !is_valid_url(url) {
            return Err(DashboardError::InvalidUrl);
        }
        if self.contains_url(url) {
            return Err(DashboardError::DuplicateFavorite);
        }

        let group_id = self.resolve_group(group_id)?;
        let icon = icon
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_icon(url).to_string());

        let favorite = Favorite::new(
            self.new_favorite_id(),
            display_name(name, url),
            url.to_string(),
            icon,
            group_id,
        );

        self.favorites.push(favorite.clone());
        Ok(favorite)
    }

    /// Add many favorites, silently skipping empty, malformed and duplicate URLs.
    /// Duplicates are checked against existing favorites and earlier entries of the batch.
    pub fn add_favorites_bulk(&mut self, sites: &[SiteEntry], group_id: Option<&str>) -> usize {
        let group_id = self.resolve_group(group_id).unwrap_or_else(|e| {
            log::warn!("Bulk add into missing group, using default: {}", e);
            self.default_group_id()
        });

        let mut seen: HashSet<String> = self.favorites.iter().map(|f| f.url.clone()).collect();
        let mut added = 0;

        for site in sites {
            let url = site.url.trim();
            if url.is_empty() || !is_valid_url(url) || seen.contains(url) {
                log::debug!("Skipping bulk entry '{}'", site.url);
                continue;
            }
            seen.insert(url.to_string());

            let favorite = Favorite::new(
                self.new_favorite_id(),
                display_name(&site.name, url),
                url.to_string(),
                default_icon(url).to_string(),
                group_id.clone(),
            );
            self.favorites.push(favorite);
            added += 1;
        }

        added
    }

    /// Remove a favorite; false if it was not there
    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let original_len = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        self.favorites.len() < original_len
    }

    /// Refile a favorite into another group; false if the favorite is unknown
    pub fn move_favorite(&mut self, id: &str, group_id: &str) -> Result<bool> {
        if self.get_group(group_id).is_none() {
            return Err(DashboardError::UnknownGroup(group_id.to_string()));
        }

        Ok(self
            .favorites
            .iter_mut()
            .find(|f| f.id == id)
            .map(|favorite| {
                favorite.group_id = Some(group_id.to_string());
            })
            .is_some())
    }

    /// Append a new group, picking a pastel color when none is given
    pub fn create_group(&mut self, name: &str, color: Option<&str>) -> Group {
        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(pastel_color);

        let name = match name.trim() {
            "" => NEW_GROUP_NAME,
            trimmed => trimmed,
        };

        let group = Group::new(self.new_group_id(), name.to_string(), color);
        self.groups.push(group.clone());
        group
    }

    /// Merge `updates` into a group; `None` if the group does not exist
    pub fn edit_group(&mut self, id: &str, updates: GroupUpdate) -> Option<Group> {
        let group = self.groups.iter_mut().find(|g| g.id == id)?;

        // Blank updates keep the current value
        if let Some(name) = updates.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            group.name = name.to_string();
        }
        if let Some(color) = updates.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            group.color = color.to_string();
        }

        Some(group.clone())
    }

    /// Delete a group and move its favorites elsewhere.
    ///
    /// Members of the first (default) group go to the second group, which becomes
    /// the new default; members of any other group go to the default group.
    /// The last remaining group cannot be removed.
    pub fn remove_group(&mut self, id: &str) -> bool {
        let Some(index) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };
        if self.groups.len() == 1 {
            log::warn!("Refusing to remove the last group {}", id);
            return false;
        }

        let target = if index == 0 {
            self.groups[1].id.clone()
        } else {
            self.groups[0].id.clone()
        };

        for favorite in &mut self.favorites {
            if favorite.group_id.as_deref() == Some(id) {
                favorite.group_id = Some(target.clone());
            }
        }

        self.groups.remove(index);
        if index == 0 {
            self.groups[0].is_default = true;
        }

        true
    }

    /// Each group with its favorites, in insertion order.
    /// Favorites without a valid group show up under the default group.
    pub fn grouped(&self) -> Vec<(&Group, Vec<&Favorite>)> {
        let known: HashSet<&str> = self.groups.iter().map(|g| g.id.as_str()).collect();

        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let members = self
                    .favorites
                    .iter()
                    .filter(|f| match f.group_id.as_deref() {
                        Some(gid) if known.contains(gid) => gid == group.id,
                        _ => index == 0,
                    })
                    .collect();
                (group, members)
            })
            .collect()
    }

    /// Case-insensitive match on name or url
    pub fn search(&self, query: &str) -> Vec<&Favorite> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.favorites.iter().collect();
        }

        self.favorites
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&query) || f.url.to_lowercase().contains(&query))
            .collect()
    }

    /// Append already-validated favorites and groups (used by import)
    pub(crate) fn extend(&mut self, favorites: Vec<Favorite>, groups: Vec<Group>) {
        self.groups.extend(groups);
        self.favorites.extend(favorites);
    }
}

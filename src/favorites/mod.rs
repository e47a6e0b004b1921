//! Favorites, groups and the rules that keep them consistent.

mod collection;
mod model;
mod registry;
mod transfer;

pub use collection::FavoritesData;
pub use model::{DEFAULT_GROUP_NAME, Favorite, Group, GroupUpdate, SiteEntry};
pub(crate) use model::id_string;
pub use registry::FavoriteGroupRegistry;
pub use transfer::{EXPORT_VERSION, ExportDocument};

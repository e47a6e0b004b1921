/// Dashboard appearance settings stored under the `settings` key
use crate::storage::{self, KeyValueStore, SETTINGS_KEY};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TITLE: &str = "My Dashboard";
pub const DEFAULT_CUSTOM_COLOR: &str = "#667eea";

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern");
}

/// `#rgb` or `#rrggbb`
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Light,
    Gradient,
    Custom,
}

impl Theme {
    /// Cycle order
    pub const ALL: [Theme; 5] = [Theme::Default, Theme::Dark, Theme::Light, Theme::Gradient, Theme::Custom];

    pub fn id(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Gradient => "gradient",
            Theme::Custom => "custom",
        }
    }

    pub fn from_id(id: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "Default Gradient",
            Theme::Dark => "Dark Mode",
            Theme::Light => "Light Mode",
            Theme::Gradient => "Colorful Gradient",
            Theme::Custom => "Custom Color",
        }
    }

    pub fn next(self) -> Theme {
        let index = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(index + 1) % Theme::ALL.len()]
    }

    pub fn css_class(self) -> String {
        format!("theme-{}", self.id())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    Masonry,
    Compact,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Grid, Layout::Masonry, Layout::Compact];

    pub fn id(self) -> &'static str {
        match self {
            Layout::Grid => "grid",
            Layout::Masonry => "masonry",
            Layout::Compact => "compact",
        }
    }

    pub fn from_id(id: &str) -> Option<Layout> {
        Layout::ALL.into_iter().find(|l| l.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Layout::Grid => "Grid Layout",
            Layout::Masonry => "Masonry Layout",
            Layout::Compact => "Compact Layout",
        }
    }

    pub fn css_class(self) -> String {
        format!("layout-{}", self.id())
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Theme,
    #[serde(default, deserialize_with = "lenient_layout")]
    pub layout: Layout,
    #[serde(default)]
    pub background_image: String,
    #[serde(default = "default_title")]
    pub dashboard_title: String,
    #[serde(default = "default_custom_color", deserialize_with = "lenient_color")]
    pub custom_color: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_custom_color() -> String {
    DEFAULT_CUSTOM_COLOR.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::default(),
            layout: Layout::default(),
            background_image: String::new(),
            dashboard_title: default_title(),
            custom_color: default_custom_color(),
        }
    }
}

// Unknown names from newer or hand-edited data fall back to the defaults.
fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
    let id = Option::<String>::deserialize(deserializer)?;
    Ok(id.as_deref().and_then(Theme::from_id).unwrap_or_default())
}

fn lenient_layout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Layout, D::Error> {
    let id = Option::<String>::deserialize(deserializer)?;
    Ok(id.as_deref().and_then(Layout::from_id).unwrap_or_default())
}

fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let color = Option::<String>::deserialize(deserializer)?;
    Ok(color.filter(|c| is_hex_color(c)).unwrap_or_else(default_custom_color))
}

impl Settings {
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Settings {
        storage::load_json(store, SETTINGS_KEY, Settings::default()).await
    }

    pub async fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> bool {
        storage::save_json(store, SETTINGS_KEY, self).await
    }

    /// Advance to the next theme and return it
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    /// Rejects anything but `#rgb`/`#rrggbb`, keeping the previous color
    pub fn set_custom_color(&mut self, color: &str) -> bool {
        let color = color.trim();
        if !is_hex_color(color) {
            log::warn!("Ignoring invalid custom color '{}'", color);
            return false;
        }
        self.custom_color = color.to_string();
        true
    }

    /// Empty clears the background
    pub fn set_background(&mut self, image_url: &str) {
        self.background_image = image_url.trim().to_string();
    }

    /// Blank titles restore the default
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        self.dashboard_title = if title.is_empty() {
            default_title()
        } else {
            title.to_string()
        };
    }

    /// Classes for the page body: theme, layout and `custom-background` when an image is set
    pub fn body_classes(&self) -> Vec<String> {
        let mut classes = vec![self.theme.css_class(), self.layout.css_class()];
        if !self.background_image.is_empty() {
            classes.push("custom-background".to_string());
        }
        classes
    }

    /// Inline style for the page body
    pub fn body_style(&self) -> String {
        let mut style = String::new();
        if self.theme == Theme::Custom {
            style.push_str(&format!("--custom-bg-color: {};", self.custom_color));
        }
        if !self.background_image.is_empty() {
            style.push_str(&format!(
                "background-image: url(\"{}\");",
                self.background_image.replace('"', "%22")
            ));
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pollster::block_on;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Default);
        assert_eq!(settings.layout, Layout::Grid);
        assert_eq!(settings.background_image, "");
        assert_eq!(settings.dashboard_title, "My Dashboard");
        assert_eq!(settings.custom_color, "#667eea");
    }

    #[test]
    fn test_partial_and_unknown_values_deserialize() {
        let settings: Settings = serde_json::from_value(json!({
            "theme": "neon",
            "layout": "compact",
            "customColor": "blue"
        }))
        .unwrap();

        assert_eq!(settings.theme, Theme::Default);
        assert_eq!(settings.layout, Layout::Compact);
        assert_eq!(settings.custom_color, DEFAULT_CUSTOM_COLOR);
        assert_eq!(settings.dashboard_title, DEFAULT_TITLE);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "theme": "default",
                "layout": "grid",
                "backgroundImage": "",
                "dashboardTitle": "My Dashboard",
                "customColor": "#667eea"
            })
        );
    }

    #[test]
    fn test_cycle_theme_wraps() {
        let mut settings = Settings::default();
        let seen: Vec<Theme> = (0..5).map(|_| settings.cycle_theme()).collect();

        assert_eq!(
            seen,
            vec![Theme::Dark, Theme::Light, Theme::Gradient, Theme::Custom, Theme::Default]
        );
    }

    #[test]
    fn test_custom_color_validation() {
        let mut settings = Settings::default();

        assert!(settings.set_custom_color("#fff"));
        assert!(settings.set_custom_color(" #A1B2C3 "));
        assert_eq!(settings.custom_color, "#A1B2C3");

        assert!(!settings.set_custom_color("#12345"));
        assert!(!settings.set_custom_color("red"));
        assert_eq!(settings.custom_color, "#A1B2C3");
    }

    #[test]
    fn test_title_and_background() {
        let mut settings = Settings::default();
        settings.set_title("  Home  ");
        settings.set_background("https://img.example/bg.jpg");

        assert_eq!(settings.dashboard_title, "Home");
        assert!(settings.body_classes().contains(&"custom-background".to_string()));
        assert!(settings.body_style().contains("bg.jpg"));

        settings.set_title("   ");
        settings.set_background("");
        assert_eq!(settings.dashboard_title, DEFAULT_TITLE);
        assert_eq!(settings.body_classes(), vec!["theme-default", "layout-grid"]);
    }

    #[test]
    fn test_custom_theme_sets_color_variable() {
        let mut settings = Settings::default();
        assert_eq!(settings.body_style(), "");

        settings.theme = Theme::Custom;
        assert_eq!(settings.body_style(), "--custom-bg-color: #667eea;");
    }

    #[test]
    fn test_load_and_save() {
        let store = MemoryStore::new();
        assert_eq!(block_on(Settings::load(&store)), Settings::default());

        let mut settings = Settings::default();
        settings.layout = Layout::Masonry;
        assert!(block_on(settings.save(&store)));

        assert_eq!(block_on(Settings::load(&store)).layout, Layout::Masonry);
    }
}

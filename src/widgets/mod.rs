//! Dashboard widgets: a common capability trait, one module per kind, and
//! the registry that creates, persists and removes instances.

mod clock;
mod notes;
mod registry;
mod rss;
mod stocks;
mod todo;
mod weather;

pub use clock::{ClockWidget, format_date, format_time};
pub use notes::NotesWidget;
pub use registry::{WidgetRecord, WidgetRegistry};
pub use rss::{FeedItem, FeedState, RssWidget, parse_feed};
pub use stocks::{StockQuote, StocksWidget};
pub use todo::{TodoItem, TodoWidget};
pub use weather::{WeatherReport, WeatherWidget};

use serde_json::Value;
use yew::{Callback, Html};

/// User interaction routed from the rendered widget back to its state
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// New todo text, new stock symbol
    Add(String),
    /// Flip a todo's completed flag
    Toggle(String),
    /// Drop a todo (by id) or stock (by symbol)
    Remove(String),
    /// Replace free text: note contents, feed url
    Edit(String),
    /// Recompute transient state (mock data)
    Refresh,
    /// Result of fetching the widget's pending url
    Fetched(Result<String, String>),
}

/// What the settings dialog should ask for
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPrompt {
    pub label: &'static str,
    pub current: String,
}

/// A dashboard panel.
///
/// Each instance owns arbitrary JSON state saved under `widget_<id>`; the
/// registry stores it without looking inside.
pub trait Widget {
    fn id(&self) -> &str;

    /// Registry tag, e.g. "todo"
    fn kind(&self) -> &'static str;

    fn config(&self) -> &Value;

    fn title(&self) -> &'static str;

    fn icon(&self) -> &'static str;

    /// Hydrate from the stored per-instance blob (`{}` when nothing was saved)
    fn initialize(&mut self, data: &Value);

    /// State to persist under `widget_<id>`
    fn data(&self) -> Value;

    /// Apply a user interaction. Returns true when the widget changed.
    fn apply(&mut self, action: WidgetAction) -> bool;

    fn settings_prompt(&self) -> Option<SettingsPrompt> {
        None
    }

    fn apply_settings(&mut self, _value: &str) -> bool {
        false
    }

    /// Url the presentation layer should fetch and report back via `WidgetAction::Fetched`
    fn pending_fetch(&self) -> Option<String> {
        None
    }

    fn render(&self, on_action: Callback<WidgetAction>) -> Html;

    /// Release anything held for rendering before the widget is dropped
    fn destroy(&mut self) {}
}

pub type WidgetFactory = fn(String, Value) -> Box<dyn Widget>;

/// Registration entry: tag plus the factory that builds instances of it
#[derive(Clone, Copy)]
pub struct WidgetDescriptor {
    pub tag: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub create: WidgetFactory,
}

impl std::fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("tag", &self.tag)
            .field("title", &self.title)
            .finish()
    }
}

/// The widget kinds shipped with the dashboard
pub fn builtin_descriptors() -> Vec<WidgetDescriptor> {
    vec![
        weather::DESCRIPTOR,
        clock::DESCRIPTOR,
        todo::DESCRIPTOR,
        notes::DESCRIPTOR,
        stocks::DESCRIPTOR,
        rss::DESCRIPTOR,
    ]
}

/// String field of a widget data blob
pub(crate) fn data_str<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_tags_are_unique() {
        let mut tags: Vec<&str> = builtin_descriptors().iter().map(|d| d.tag).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags, vec!["clock", "notes", "rss", "stocks", "todo", "weather"]);
    }

    #[test]
    fn test_factories_build_matching_kinds() {
        for descriptor in builtin_descriptors() {
            let widget = (descriptor.create)(format!("{}_1", descriptor.tag), json!({}));
            assert_eq!(widget.kind(), descriptor.tag);
            assert_eq!(widget.title(), descriptor.title);
            assert_eq!(widget.id(), format!("{}_1", descriptor.tag));
        }
    }

    #[test]
    fn test_data_str() {
        let data = json!({ "notes": "hello", "count": 2 });
        assert_eq!(data_str(&data, "notes"), Some("hello"));
        assert_eq!(data_str(&data, "count"), None);
        assert_eq!(data_str(&data, "missing"), None);
    }
}

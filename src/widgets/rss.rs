/// RSS/Atom reader widget and a forgiving feed parser
use super::{SettingsPrompt, Widget, WidgetAction, WidgetDescriptor, data_str};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Value, json};
use std::collections::HashMap;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "rss",
    title: "RSS Reader",
    icon: "fas fa-rss",
    create,
};

pub const MAX_FEED_ITEMS: usize = 8;

const FIELDS: [&str; 8] = [
    "title",
    "link",
    "description",
    "summary",
    "content",
    "pubDate",
    "updated",
    "published",
];

lazy_static! {
    static ref ITEM_BLOCK: Regex = Regex::new(r"(?is)<item(?:\s[^>]*)?>(.*?)</item>").expect("item pattern");
    static ref ENTRY_BLOCK: Regex = Regex::new(r"(?is)<entry(?:\s[^>]*)?>(.*?)</entry>").expect("entry pattern");
    static ref LINK_HREF: Regex =
        Regex::new(r#"(?is)<link\b[^>]*?\bhref\s*=\s*["']([^"']*)["']"#).expect("href pattern");
    static ref FIELD: HashMap<&'static str, Regex> = FIELDS
        .iter()
        .map(|name| {
            let pattern = format!(r"(?is)<{}(?:\s[^>]*)?>(.*?)</{}>", name, name);
            (*name, Regex::new(&pattern).expect("field pattern"))
        })
        .collect();
    static ref CDATA: Regex = Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("cdata pattern");
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").expect("tag pattern");
    static ref NUMERIC_ENTITY: Regex = Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("entity pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
}

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(RssWidget::new(id, config))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

impl FeedItem {
    /// Publication date in local time when it parses, the raw text otherwise
    pub fn display_date(&self) -> String {
        let parsed = DateTime::parse_from_rfc2822(&self.pub_date)
            .or_else(|_| DateTime::parse_from_rfc3339(&self.pub_date));
        match parsed {
            Ok(date) => date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => self.pub_date.clone(),
        }
    }
}

/// Pull up to eight entries out of an RSS (`<item>`) or Atom (`<entry>`) document.
///
/// This is pattern matching, not XML parsing: malformed documents just yield
/// fewer items.
pub fn parse_feed(xml: &str) -> Vec<FeedItem> {
    let mut blocks: Vec<&str> = ITEM_BLOCK
        .captures_iter(xml)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if blocks.is_empty() {
        blocks = ENTRY_BLOCK
            .captures_iter(xml)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
    }

    blocks
        .into_iter()
        .take(MAX_FEED_ITEMS)
        .map(|block| {
            let title = field_text(block, &["title"]).unwrap_or_else(|| "No title".to_string());
            let link = LINK_HREF
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| decode_entities(m.as_str().trim()))
                .or_else(|| field_text(block, &["link"]))
                .unwrap_or_else(|| "#".to_string());
            let description =
                field_text(block, &["description", "summary", "content"]).unwrap_or_default();
            let pub_date = field_text(block, &["pubDate", "updated", "published"]).unwrap_or_default();

            FeedItem {
                title,
                link,
                description,
                pub_date,
            }
        })
        .collect()
}

/// Text of the first listed element present in `block`; empty elements count as absent
fn field_text(block: &str, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        let text = FIELD
            .get(name)?
            .captures(block)?
            .get(1)
            .map(|m| clean_text(m.as_str()))?;
        (!text.is_empty()).then_some(text)
    })
}

/// Unwrap CDATA, drop markup (including escaped markup), decode entities, collapse whitespace
pub fn clean_text(raw: &str) -> String {
    let unwrapped = CDATA.replace_all(raw, "$1");
    let stripped = TAG.replace_all(&unwrapped, " ");
    let decoded = decode_entities(&stripped);
    let stripped = TAG.replace_all(&decoded, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    numeric.replace("&amp;", "&")
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    /// No feed configured
    Idle,
    Loading,
    Loaded(Vec<FeedItem>),
    Failed(String),
}

pub struct RssWidget {
    id: String,
    config: Value,
    feed_url: String,
    state: FeedState,
    input_ref: NodeRef,
}

impl RssWidget {
    pub fn new(id: String, config: Value) -> RssWidget {
        RssWidget {
            id,
            config,
            feed_url: String::new(),
            state: FeedState::Idle,
            input_ref: NodeRef::default(),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    fn set_feed_url(&mut self, url: &str) {
        self.feed_url = url.trim().to_string();
        self.reload();
    }

    fn reload(&mut self) {
        self.state = if self.feed_url.is_empty() {
            FeedState::Idle
        } else {
            FeedState::Loading
        };
    }

    fn render_content(&self) -> Html {
        match &self.state {
            FeedState::Idle => html! {
                <div class="widget-error">
                    <p>{"No feed configured. Paste a feed URL above and click Load or use Settings."}</p>
                </div>
            },
            FeedState::Loading => html! {
                <div class="widget-loading"><div class="spinner"></div></div>
            },
            FeedState::Failed(reason) => html! {
                <div class="widget-error">
                    <i class="fas fa-exclamation-triangle"></i>
                    <p>{format!("Failed to load feed ({}). CORS may block some feeds.", reason)}</p>
                </div>
            },
            FeedState::Loaded(items) if items.is_empty() => html! {
                <div class="widget-error"><p>{"No feed entries found."}</p></div>
            },
            FeedState::Loaded(items) => html! {
                <div class="rss-list">
                    { for items.iter().map(|item| {
                        let date = item.display_date();
                        html! {
                            <div class="rss-item">
                                <a href={item.link.clone()} target="_blank" rel="noopener noreferrer">
                                    {&item.title}
                                </a>
                                if !date.is_empty() {
                                    <div class="rss-meta">{date}</div>
                                }
                                if !item.description.is_empty() {
                                    <div class="rss-desc">{&item.description}</div>
                                }
                            </div>
                        }
                    }) }
                </div>
            },
        }
    }
}

impl Widget for RssWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        DESCRIPTOR.tag
    }

    fn config(&self) -> &Value {
        &self.config
    }

    fn title(&self) -> &'static str {
        DESCRIPTOR.title
    }

    fn icon(&self) -> &'static str {
        DESCRIPTOR.icon
    }

    fn initialize(&mut self, data: &Value) {
        self.set_feed_url(data_str(data, "feedUrl").unwrap_or_default());
    }

    fn data(&self) -> Value {
        json!({ "feedUrl": self.feed_url })
    }

    fn apply(&mut self, action: WidgetAction) -> bool {
        match action {
            // The Load button ignores a blank field.
            WidgetAction::Edit(url) if !url.trim().is_empty() => {
                self.set_feed_url(&url);
                true
            }
            WidgetAction::Refresh => {
                self.reload();
                true
            }
            WidgetAction::Fetched(result) => {
                if self.state != FeedState::Loading {
                    return false;
                }
                self.state = match result {
                    Ok(body) => FeedState::Loaded(parse_feed(&body)),
                    Err(reason) => {
                        log::warn!("RSS load error for {}: {}", self.feed_url, reason);
                        FeedState::Failed(reason)
                    }
                };
                true
            }
            _ => false,
        }
    }

    fn settings_prompt(&self) -> Option<SettingsPrompt> {
        Some(SettingsPrompt {
            label: "Enter RSS/Atom feed URL:",
            current: self.feed_url.clone(),
        })
    }

    // An empty answer clears the feed.
    fn apply_settings(&mut self, value: &str) -> bool {
        self.set_feed_url(value);
        if let Some(input) = self.input_ref.cast::<HtmlInputElement>() {
            input.set_value(&self.feed_url);
        }
        true
    }

    fn pending_fetch(&self) -> Option<String> {
        match self.state {
            FeedState::Loading => Some(self.feed_url.clone()),
            _ => None,
        }
    }

    fn render(&self, on_action: Callback<WidgetAction>) -> Html {
        let submit = {
            let input_ref = self.input_ref.clone();
            let on_action = on_action.clone();
            move || {
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    on_action.emit(WidgetAction::Edit(input.value()));
                }
            }
        };

        let onkeypress = {
            let submit = submit.clone();
            Callback::from(move |e: KeyboardEvent| {
                if e.key() == "Enter" {
                    submit();
                }
            })
        };
        let onclick = Callback::from(move |_: MouseEvent| submit());

        html! {
            <>
                <div class="rss-controls">
                    <div class="rss-config">
                        <input
                            ref={self.input_ref.clone()}
                            class="rss-url-input"
                            type="text"
                            placeholder="Enter feed URL..."
                            maxlength="1024"
                            value={self.feed_url.clone()}
                            {onkeypress}
                        />
                        <button class="rss-load-btn" {onclick}>{"Load"}</button>
                    </div>
                </div>
                <div class="rss-content">{self.render_content()}</div>
            </>
        }
    }

    fn destroy(&mut self) {
        self.state = FeedState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Channel</title>
  <item>
    <title><![CDATA[First   post]]></title>
    <link>https://example.com/1</link>
    <description>&lt;p&gt;Hello &amp; welcome&lt;/p&gt;</description>
    <pubDate>Mon, 28 Oct 2024 09:00:00 GMT</pubDate>
  </item>
  <item>
    <description>untitled</description>
  </item>
</channel></rss>"#;

    const ATOM: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title type="html">Atom entry</title>
    <link rel="alternate" href="https://example.org/a"/>
    <summary>Short
      summary</summary>
    <updated>2024-10-28T09:00:00Z</updated>
  </entry>
</feed>"#;

    fn create_test_widget() -> RssWidget {
        RssWidget::new("rss_1".to_string(), json!({}))
    }

    #[test]
    fn test_parse_rss_items() {
        let items = parse_feed(RSS);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First post");
        assert_eq!(items[0].link, "https://example.com/1");
        assert_eq!(items[0].description, "Hello & welcome");
        assert_eq!(items[0].pub_date, "Mon, 28 Oct 2024 09:00:00 GMT");

        assert_eq!(items[1].title, "No title");
        assert_eq!(items[1].link, "#");
        assert_eq!(items[1].pub_date, "");
    }

    #[test]
    fn test_parse_atom_entries() {
        let items = parse_feed(ATOM);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Atom entry");
        assert_eq!(items[0].link, "https://example.org/a");
        assert_eq!(items[0].description, "Short summary");
        assert_eq!(items[0].pub_date, "2024-10-28T09:00:00Z");
        assert!(!items[0].display_date().is_empty());
    }

    #[test]
    fn test_parse_caps_at_eight() {
        let body: String = (0..12)
            .map(|i| format!("<item><title>Item {}</title></item>", i))
            .collect();
        let items = parse_feed(&format!("<rss><channel>{}</channel></rss>", body));

        assert_eq!(items.len(), MAX_FEED_ITEMS);
        assert_eq!(items[7].title, "Item 7");
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        assert!(parse_feed("not xml at all").is_empty());
        assert!(parse_feed("").is_empty());
    }

    #[test]
    fn test_clean_text_decodes_numeric_entities() {
        assert_eq!(clean_text("caf&#233; &#x2013; bar"), "café – bar");
        assert_eq!(clean_text("a&amp;lt;b"), "a&lt;b");
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        let item = FeedItem {
            title: String::new(),
            link: String::new(),
            description: String::new(),
            pub_date: "yesterday".to_string(),
        };
        assert_eq!(item.display_date(), "yesterday");
    }

    #[test]
    fn test_initialize_without_url_is_idle() {
        let mut widget = create_test_widget();
        widget.initialize(&json!({}));

        assert_eq!(widget.state(), &FeedState::Idle);
        assert_eq!(widget.pending_fetch(), None);
    }

    #[test]
    fn test_fetch_cycle() {
        let mut widget = create_test_widget();
        widget.initialize(&json!({ "feedUrl": "https://example.com/feed.xml" }));

        assert_eq!(widget.pending_fetch().as_deref(), Some("https://example.com/feed.xml"));

        assert!(widget.apply(WidgetAction::Fetched(Ok(RSS.to_string()))));
        assert!(matches!(widget.state(), FeedState::Loaded(items) if items.len() == 2));
        assert_eq!(widget.pending_fetch(), None);

        // Late results are dropped.
        assert!(!widget.apply(WidgetAction::Fetched(Err("HTTP 500".to_string()))));

        assert!(widget.apply(WidgetAction::Refresh));
        assert!(widget.apply(WidgetAction::Fetched(Err("HTTP 500".to_string()))));
        assert_eq!(widget.state(), &FeedState::Failed("HTTP 500".to_string()));
    }

    #[test]
    fn test_edit_ignores_blank_but_settings_clear() {
        let mut widget = create_test_widget();
        widget.initialize(&json!({ "feedUrl": "https://a.example/rss" }));

        assert!(!widget.apply(WidgetAction::Edit("   ".to_string())));
        assert_eq!(widget.feed_url(), "https://a.example/rss");

        assert!(widget.apply(WidgetAction::Edit(" https://b.example/rss ".to_string())));
        assert_eq!(widget.data(), json!({ "feedUrl": "https://b.example/rss" }));

        assert_eq!(widget.settings_prompt().unwrap().current, "https://b.example/rss");
        assert!(widget.apply_settings(""));
        assert_eq!(widget.feed_url(), "");
        assert_eq!(widget.state(), &FeedState::Idle);
    }
}

/// Watch list of ticker symbols with sample quotes
use super::{Widget, WidgetAction, WidgetDescriptor};
use crate::random::random_unit;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "stocks",
    title: "Stocks",
    icon: "fas fa-chart-line",
    create,
};

pub const MAX_SYMBOL_LEN: usize = 10;

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(StocksWidget::new(id, config))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    #[serde(deserialize_with = "lenient_number")]
    pub price: f64,
    /// Percent
    #[serde(deserialize_with = "lenient_number")]
    pub change: f64,
}

impl StockQuote {
    /// Price in 10..1010, change in -10..10 percent, both to two decimals
    pub fn sample(symbol: String) -> StockQuote {
        StockQuote {
            symbol,
            price: round_cents(random_unit() * 1000.0 + 10.0),
            change: round_cents((random_unit() - 0.5) * 20.0),
        }
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Quotes were once saved as preformatted strings ("123.45").
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number: {}", s))),
        other => Err(de::Error::custom(format!("invalid number: {}", other))),
    }
}

/// Upper-cased, trimmed symbol; `None` when blank or too long
pub fn normalize_symbol(input: &str) -> Option<String> {
    let symbol = input.trim().to_uppercase();
    if symbol.is_empty() || symbol.chars().count() > MAX_SYMBOL_LEN {
        return None;
    }
    Some(symbol)
}

pub struct StocksWidget {
    id: String,
    config: Value,
    stocks: Vec<StockQuote>,
    input_ref: NodeRef,
}

impl StocksWidget {
    pub fn new(id: String, config: Value) -> StocksWidget {
        StocksWidget {
            id,
            config,
            stocks: Vec::new(),
            input_ref: NodeRef::default(),
        }
    }

    pub fn stocks(&self) -> &[StockQuote] {
        &self.stocks
    }

    fn add(&mut self, input: &str) -> bool {
        let Some(symbol) = normalize_symbol(input) else {
            return false;
        };
        if self.stocks.iter().any(|s| s.symbol == symbol) {
            return false;
        }

        self.stocks.push(StockQuote::sample(symbol));
        true
    }

    fn remove(&mut self, symbol: &str) -> bool {
        let before = self.stocks.len();
        self.stocks.retain(|s| s.symbol != symbol);
        self.stocks.len() != before
    }
}

impl Widget for StocksWidget {
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
        self.stocks = data
            .get("stocks")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
    }

    fn data(&self) -> Value {
        json!({ "stocks": self.stocks })
    }

    fn apply(&mut self, action: WidgetAction) -> bool {
        match action {
            WidgetAction::Add(symbol) => self.add(&symbol),
            WidgetAction::Remove(symbol) => self.remove(&symbol),
            _ => false,
        }
    }

    fn render(&self, on_action: Callback<WidgetAction>) -> Html {
        let submit = {
            let input_ref = self.input_ref.clone();
            let on_action = on_action.clone();
            move || {
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    on_action.emit(WidgetAction::Add(input.value()));
                    input.set_value("");
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
                <div class="stock-input">
                    <input
                        ref={self.input_ref.clone()}
                        type="text"
                        placeholder="Enter symbol (e.g., AAPL)"
                        maxlength="10"
                        {onkeypress}
                    />
                    <button class="stock-add-btn" {onclick}>{"Add"}</button>
                </div>
                <div class="stocks-list">
                    { for self.stocks.iter().map(|stock| {
                        let symbol = stock.symbol.clone();
                        let sign = if stock.is_up() { "+" } else { "" };
                        html! {
                            <div class="stock-item" key={stock.symbol.clone()}>
                                <div class="stock-symbol">{&stock.symbol}</div>
                                <div class="stock-price">{format!("${:.2}", stock.price)}</div>
                                <div class={classes!("stock-change", if stock.is_up() { "positive" } else { "negative" })}>
                                    {format!("{}{:.2}%", sign, stock.change)}
                                </div>
                                <button
                                    class="stock-delete"
                                    onclick={on_action.reform(move |_: MouseEvent| WidgetAction::Remove(symbol.clone()))}
                                >
                                    {"×"}
                                </button>
                            </div>
                        }
                    }) }
                </div>
            </>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_widget() -> StocksWidget {
        let mut widget = StocksWidget::new("stocks_1".to_string(), json!({}));
        widget.initialize(&json!({}));
        widget
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_symbol("   "), None);
        assert_eq!(normalize_symbol("ABCDEFGHIJ"), Some("ABCDEFGHIJ".to_string()));
        assert_eq!(normalize_symbol("ABCDEFGHIJK"), None);
    }

    #[test]
    fn test_sample_quote_ranges() {
        for _ in 0..200 {
            let quote = StockQuote::sample("X".to_string());
            assert!((10.0..=1010.0).contains(&quote.price));
            assert!((-10.0..=10.0).contains(&quote.change));
        }
    }

    #[test]
    fn test_add_dedupes_case_insensitively() {
        let mut widget = create_test_widget();

        assert!(widget.apply(WidgetAction::Add("msft".to_string())));
        assert!(!widget.apply(WidgetAction::Add("MSFT".to_string())));
        assert!(!widget.apply(WidgetAction::Add("".to_string())));

        assert_eq!(widget.stocks().len(), 1);
        assert_eq!(widget.stocks()[0].symbol, "MSFT");
    }

    #[test]
    fn test_remove_by_symbol() {
        let mut widget = create_test_widget();
        widget.apply(WidgetAction::Add("AAPL".to_string()));
        widget.apply(WidgetAction::Add("GOOG".to_string()));

        assert!(widget.apply(WidgetAction::Remove("AAPL".to_string())));
        assert!(!widget.apply(WidgetAction::Remove("AAPL".to_string())));
        assert_eq!(widget.stocks().len(), 1);
        assert_eq!(widget.stocks()[0].symbol, "GOOG");
    }

    #[test]
    fn test_initialize_reads_string_quotes() {
        let mut widget = create_test_widget();
        widget.initialize(&json!({
            "stocks": [
                { "symbol": "AAPL", "price": "187.25", "change": "-1.50" },
                { "symbol": "TSLA", "price": 240.1, "change": 3 },
                { "symbol": "BAD", "price": "n/a", "change": "0" }
            ]
        }));

        assert_eq!(widget.stocks().len(), 2);
        assert_eq!(widget.stocks()[0].price, 187.25);
        assert!(!widget.stocks()[0].is_up());
        assert!(widget.stocks()[1].is_up());
    }
}

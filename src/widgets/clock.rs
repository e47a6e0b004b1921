/// Local time and date
use super::{Widget, WidgetAction, WidgetDescriptor};
use chrono::{DateTime, Local, TimeZone};
use serde_json::{Value, json};
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "clock",
    title: "Clock",
    icon: "fas fa-clock",
    create,
};

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(ClockWidget::new(id, config))
}

/// Shows the current time each time it is rendered; the page re-renders it every second.
pub struct ClockWidget {
    id: String,
    config: Value,
}

impl ClockWidget {
    pub fn new(id: String, config: Value) -> ClockWidget {
        ClockWidget { id, config }
    }
}

/// e.g. "09:05:03"
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}

/// e.g. "Monday, October 28, 2024"
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %-d, %Y").to_string()
}

impl Widget for ClockWidget {
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

    fn initialize(&mut self, _data: &Value) {}

    fn data(&self) -> Value {
        json!({})
    }

    fn apply(&mut self, action: WidgetAction) -> bool {
        matches!(action, WidgetAction::Refresh)
    }

    fn render(&self, _on_action: Callback<WidgetAction>) -> Html {
        let now = Local::now();

        html! {
            <div class="clock-widget-content">
                <div class="clock-time">{format_time(&now)}</div>
                <div class="clock-date">{format_date(&now)}</div>
                <div class="clock-timezone">{"Local Time"}</div>
            </div>
        }
    }
}

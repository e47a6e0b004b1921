/// Weather panel backed by generated sample conditions
use super::{SettingsPrompt, Widget, WidgetAction, WidgetDescriptor, data_str};
use crate::random::random_range;
use serde_json::{Value, json};
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "weather",
    title: "Weather",
    icon: "fas fa-cloud-sun",
    create,
};

pub const DEFAULT_LOCATION: &str = "New York";

const CONDITIONS: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy"];

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(WeatherWidget::new(id, config))
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: u32,
    pub description: &'static str,
    /// Percent
    pub humidity: u32,
    /// km/h
    pub wind_speed: u32,
}

impl WeatherReport {
    pub fn sample() -> WeatherReport {
        WeatherReport {
            temperature: random_range(10, 40),
            description: CONDITIONS[random_range(0, CONDITIONS.len() as u32 - 1) as usize],
            humidity: random_range(30, 80),
            wind_speed: random_range(5, 25),
        }
    }
}

pub struct WeatherWidget {
    id: String,
    config: Value,
    location: String,
    report: Option<WeatherReport>,
}

impl WeatherWidget {
    pub fn new(id: String, config: Value) -> WeatherWidget {
        WeatherWidget {
            id,
            config,
            location: DEFAULT_LOCATION.to_string(),
            report: None,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }
}

impl Widget for WeatherWidget {
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
        self.location = data_str(data, "location")
            .filter(|location| !location.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        self.report = Some(WeatherReport::sample());
    }

    fn data(&self) -> Value {
        json!({ "location": self.location })
    }

    fn apply(&mut self, action: WidgetAction) -> bool {
        match action {
            WidgetAction::Refresh => {
                self.report = Some(WeatherReport::sample());
                true
            }
            _ => false,
        }
    }

    fn settings_prompt(&self) -> Option<SettingsPrompt> {
        Some(SettingsPrompt {
            label: "Enter location:",
            current: self.location.clone(),
        })
    }

    fn apply_settings(&mut self, value: &str) -> bool {
        let location = value.trim();
        if location.is_empty() {
            return false;
        }

        self.location = location.to_string();
        self.report = Some(WeatherReport::sample());
        true
    }

    fn render(&self, _on_action: Callback<WidgetAction>) -> Html {
        let Some(report) = &self.report else {
            return html! {
                <div class="weather-info">
                    <div class="widget-loading"><div class="spinner"></div></div>
                </div>
            };
        };

        html! {
            <div class="weather-info">
                <div class="weather-location">{&self.location}</div>
                <div class="weather-temp">{format!("{}°C", report.temperature)}</div>
                <div class="weather-desc">{report.description}</div>
                <div class="weather-details">
                    <div class="weather-detail">
                        <i class="fas fa-tint"></i>
                        <div>{format!("Humidity: {}%", report.humidity)}</div>
                    </div>
                    <div class="weather-detail">
                        <i class="fas fa-wind"></i>
                        <div>{format!("Wind: {} km/h", report.wind_speed)}</div>
                    </div>
                </div>
            </div>
        }
    }

    fn destroy(&mut self) {
        self.report = None;
    }
}

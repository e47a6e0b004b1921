/// Free-text notes widget
use super::{Widget, WidgetAction, WidgetDescriptor, data_str};
use serde_json::{Value, json};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "notes",
    title: "Notes",
    icon: "fas fa-sticky-note",
    create,
};

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(NotesWidget::new(id, config))
}

pub struct NotesWidget {
    id: String,
    config: Value,
    notes: String,
}

impl NotesWidget {
    pub fn new(id: String, config: Value) -> NotesWidget {
        NotesWidget {
            id,
            config,
            notes: String::new(),
        }
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

impl Widget for NotesWidget {
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
        self.notes = data_str(data, "notes").unwrap_or_default().to_string();
    }

    fn data(&self) -> Value {
        json!({ "notes": self.notes })
    }

    // Every keystroke is saved.
    fn apply(&mut self, action: WidgetAction) -> bool {
        match action {
            WidgetAction::Edit(text) if text != self.notes => {
                self.notes = text;
                true
            }
            _ => false,
        }
    }

    fn render(&self, on_action: Callback<WidgetAction>) -> Html {
        let oninput = on_action.reform(|e: InputEvent| {
            let text = e
                .target_dyn_into::<HtmlTextAreaElement>()
                .map(|area| area.value())
                .unwrap_or_default();
            WidgetAction::Edit(text)
        });

        html! {
            <textarea
                placeholder="Write your notes here..."
                rows="6"
                value={self.notes.clone()}
                {oninput}
            />
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_replaces_text() {
        let mut widget = NotesWidget::new("notes_1".to_string(), json!({}));
        widget.initialize(&json!({}));
        assert_eq!(widget.notes(), "");

        assert!(widget.apply(WidgetAction::Edit("remember".to_string())));
        assert!(!widget.apply(WidgetAction::Edit("remember".to_string())));
        assert_eq!(widget.data(), json!({ "notes": "remember" }));
    }

    #[test]
    fn test_initialize_restores_notes() {
        let mut widget = NotesWidget::new("notes_1".to_string(), json!({}));
        widget.initialize(&json!({ "notes": "line one\nline two" }));

        assert_eq!(widget.notes(), "line one\nline two");
        assert!(!widget.apply(WidgetAction::Refresh));
    }
}

/// To-do list widget
use super::{Widget, WidgetAction, WidgetDescriptor};
use crate::favorites::id_string;
use crate::random::unique_id;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    tag: "todo",
    title: "To-Do List",
    icon: "fas fa-list-check",
    create,
};

pub const MAX_TODO_LEN: usize = 100;

fn create(id: String, config: Value) -> Box<dyn Widget> {
    Box::new(TodoWidget::new(id, config))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

pub struct TodoWidget {
    id: String,
    config: Value,
    todos: Vec<TodoItem>,
    input_ref: NodeRef,
}

impl TodoWidget {
    pub fn new(id: String, config: Value) -> TodoWidget {
        TodoWidget {
            id,
            config,
            todos: Vec::new(),
            input_ref: NodeRef::default(),
        }
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    fn add(&mut self, text: &str) -> bool {
        let text: String = text.trim().chars().take(MAX_TODO_LEN).collect();
        if text.is_empty() {
            return false;
        }

        let id = unique_id(|candidate| self.todos.iter().any(|t| t.id == candidate));
        self.todos.push(TodoItem {
            id,
            text,
            completed: false,
        });
        true
    }

    fn toggle(&mut self, todo_id: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.id == todo_id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, todo_id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != todo_id);
        self.todos.len() != before
    }
}

impl Widget for TodoWidget {
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
        self.todos = data
            .get("todos")
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
        json!({ "todos": self.todos })
    }

    fn apply(&mut self, action: WidgetAction) -> bool {
        match action {
            WidgetAction::Add(text) => self.add(&text),
            WidgetAction::Toggle(todo_id) => self.toggle(&todo_id),
            WidgetAction::Remove(todo_id) => self.remove(&todo_id),
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
                <div class="todo-input">
                    <input
                        ref={self.input_ref.clone()}
                        type="text"
                        placeholder="Add a new task..."
                        maxlength="100"
                        {onkeypress}
                    />
                    <button class="todo-add-btn" {onclick}>{"Add"}</button>
                </div>
                <div class="todo-list">
                    { for self.todos.iter().map(|todo| {
                        let toggle_id = todo.id.clone();
                        let remove_id = todo.id.clone();
                        html! {
                            <div class="todo-item" key={todo.id.clone()}>
                                <input
                                    type="checkbox"
                                    class="todo-checkbox"
                                    checked={todo.completed}
                                    onchange={on_action.reform(move |_: Event| WidgetAction::Toggle(toggle_id.clone()))}
                                />
                                <span class={classes!("todo-text", todo.completed.then_some("completed"))}>
                                    {&todo.text}
                                </span>
                                <button
                                    class="todo-delete"
                                    onclick={on_action.reform(move |_: MouseEvent| WidgetAction::Remove(remove_id.clone()))}
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

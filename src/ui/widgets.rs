/// Widgets panel and the add-widget picker

use super::DashboardHandle;
use super::components::{EmptyState, Modal, Notice};
use crate::platform;
use crate::widgets::WidgetAction;
use serde_json::json;
use std::collections::HashSet;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const TICK_MS: i32 = 1000;

#[derive(Properties, PartialEq)]
pub struct WidgetsPanelProps {
    pub dashboard: DashboardHandle,
    pub revision: u64,
    pub on_notice: Callback<Notice>,
}

#[function_component(WidgetsPanel)]
pub fn widgets_panel(props: &WidgetsPanelProps) -> Html {
    let tick = use_force_update();
    let in_flight = use_mut_ref(HashSet::<String>::new);

    // Redraw once a second for the clock
    use_effect_with((), move |_| {
        let window = web_sys::window();
        let closure = Closure::<dyn Fn()>::new(move || tick.force_update());
        let handle = window.as_ref().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TICK_MS,
            )
            .ok()
        });

        move || {
            if let (Some(window), Some(handle)) = (window, handle) {
                window.clear_interval_with_handle(handle);
            }
            drop(closure);
        }
    });

    // Start fetches widgets are waiting on
    {
        let dashboard = props.dashboard.clone();
        let in_flight = in_flight.clone();
        use_effect_with(props.revision, move |_| {
            for (id, url) in dashboard.widgets().pending_fetches() {
                let key = format!("{} {}", id, url);
                if !in_flight.borrow_mut().insert(key.clone()) {
                    continue;
                }

                let dashboard = dashboard.clone();
                let in_flight = in_flight.clone();
                spawn_local(async move {
                    let result = platform::fetch_text(&url).await;
                    in_flight.borrow_mut().remove(&key);
                    dashboard
                        .widgets()
                        .widget_action(&id, WidgetAction::Fetched(result))
                        .await;
                });
            }
            || ()
        });
    }

    let on_settings = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |id: String| {
            let prompt = dashboard
                .widgets()
                .with_widgets(|widgets| {
                    widgets.iter().find(|w| w.id() == id).map(|w| w.settings_prompt())
                })
                .flatten();
            let Some(prompt) = prompt else {
                on_notice.emit(Notice::info("Settings not implemented for this widget"));
                return;
            };
            let Some(value) = platform::prompt(prompt.label, &prompt.current) else {
                return;
            };

            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.widgets().update_widget_settings(&id, &value).await;
            });
        })
    };

    let on_delete = {
        let dashboard = props.dashboard.clone();
        Callback::from(move |id: String| {
            if !platform::confirm("Are you sure you want to delete this widget?") {
                return;
            }
            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.widgets().remove_widget(&id).await;
            });
        })
    };

    let cards = props.dashboard.widgets().with_widgets(|widgets| {
        widgets
            .iter()
            .map(|widget| {
                let id = widget.id().to_string();
                let on_action = {
                    let dashboard = props.dashboard.clone();
                    let id = id.clone();
                    Callback::from(move |action: WidgetAction| {
                        let dashboard = dashboard.clone();
                        let id = id.clone();
                        spawn_local(async move {
                            dashboard.widgets().widget_action(&id, action).await;
                        });
                    })
                };
                let settings = {
                    let id = id.clone();
                    on_settings.reform(move |_: MouseEvent| id.clone())
                };
                let delete = {
                    let id = id.clone();
                    on_delete.reform(move |_: MouseEvent| id.clone())
                };

                html! {
                    <div class={classes!("widget", format!("{}-widget", widget.kind()))} key={id}>
                        <div class="widget-header">
                            <h3 class="widget-title">
                                <i class={widget.icon()}></i>
                                {widget.title()}
                            </h3>
                            <div class="widget-actions">
                                <button class="widget-btn settings-btn" title="Settings" onclick={settings}>
                                    <i class="fas fa-cog"></i>
                                </button>
                                <button class="widget-btn delete-btn" title="Delete" onclick={delete}>
                                    <i class="fas fa-trash"></i>
                                </button>
                            </div>
                        </div>
                        <div class="widget-content">
                            {widget.render(on_action)}
                        </div>
                    </div>
                }
            })
            .collect::<Html>()
    });

    html! {
        <section class="widgets-section">
            if props.dashboard.widgets().is_empty() {
                <EmptyState icon="fas fa-puzzle-piece" message="No widgets yet. Press W to add one." />
            }
            <div id="widgets-container" class="widgets-grid">
                {cards}
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct AddWidgetDialogProps {
    pub dashboard: DashboardHandle,
    pub on_notice: Callback<Notice>,
    pub onclose: Callback<()>,
}

#[function_component(AddWidgetDialog)]
pub fn add_widget_dialog(props: &AddWidgetDialogProps) -> Html {
    let on_pick = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let onclose = props.onclose.clone();
        Callback::from(move |tag: &'static str| {
            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            let onclose = onclose.clone();
            spawn_local(async move {
                match dashboard.widgets().add_widget(tag, json!({})).await {
                    Ok(_) => {
                        on_notice.emit(Notice::success(format!("Added {} widget!", tag)));
                        onclose.emit(());
                    }
                    Err(e) => on_notice.emit(Notice::error(format!("Failed to add {} widget: {}", tag, e))),
                }
            });
        })
    };

    html! {
        <Modal title="Add Widget" onclose={props.onclose.clone()}>
            <div class="widget-types">
                { for props.dashboard.widgets().descriptors().iter().map(|descriptor| {
                    let tag = descriptor.tag;
                    html! {
                        <div class="widget-type" key={tag} onclick={on_pick.reform(move |_: MouseEvent| tag)}>
                            <i class={descriptor.icon}></i>
                            <span>{descriptor.title}</span>
                        </div>
                    }
                }) }
            </div>
        </Modal>
    }
}

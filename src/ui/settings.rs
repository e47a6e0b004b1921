/// Settings dialog: theme, layout, background, title and custom color

use super::DashboardHandle;
use super::components::{Modal, Notice};
use crate::platform;
use crate::settings::{Layout, Settings, Theme};
use crate::shortcuts::Shortcut;
use patternfly_yew::prelude::{Button, ButtonVariant};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SettingsDialogProps {
    pub dashboard: DashboardHandle,
    pub on_notice: Callback<Notice>,
    pub onclose: Callback<()>,
}

#[function_component(SettingsDialog)]
pub fn settings_dialog(props: &SettingsDialogProps) -> Html {
    // Edited locally, applied on save
    let initial = props.dashboard.clone();
    let draft = use_state(move || initial.settings());

    let on_theme = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(theme) = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| Theme::from_id(&select.value()))
            {
                draft.set(Settings { theme, ..(*draft).clone() });
            }
        })
    };

    let on_layout = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(layout) = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| Layout::from_id(&select.value()))
            {
                draft.set(Settings { layout, ..(*draft).clone() });
            }
        })
    };

    let on_text = |apply: fn(&mut Settings, String)| {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*draft).clone();
                apply(&mut next, input.value());
                draft.set(next);
            }
        })
    };
    let on_background = on_text(|s, value| s.background_image = value);
    let on_title = on_text(|s, value| s.dashboard_title = value);
    let on_color = on_text(|s, value| s.custom_color = value);

    let on_save = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let onclose = props.onclose.clone();
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            let draft = (*draft).clone();
            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            let onclose = onclose.clone();
            spawn_local(async move {
                let current = dashboard.settings();
                if draft.theme != current.theme {
                    dashboard.set_theme(draft.theme).await;
                }
                if draft.layout != current.layout {
                    dashboard.set_layout(draft.layout).await;
                }
                if draft.background_image != current.background_image {
                    dashboard.set_background(&draft.background_image).await;
                }
                if draft.dashboard_title != current.dashboard_title {
                    dashboard.set_title(&draft.dashboard_title).await;
                }
                if draft.custom_color != current.custom_color
                    && !dashboard.set_custom_color(&draft.custom_color).await
                {
                    on_notice.emit(Notice::error(format!(
                        "\"{}\" is not a valid color",
                        draft.custom_color
                    )));
                    return;
                }
                on_notice.emit(Notice::success("Settings saved!"));
                onclose.emit(());
            });
        })
    };

    let on_reset = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let onclose = props.onclose.clone();
        Callback::from(move |_: MouseEvent| {
            if !platform::confirm("Are you sure you want to reset all settings to default?") {
                return;
            }
            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            let onclose = onclose.clone();
            spawn_local(async move {
                dashboard.reset_settings().await;
                on_notice.emit(Notice::success("Settings reset to default!"));
                onclose.emit(());
            });
        })
    };

    html! {
        <Modal title="Settings" onclose={props.onclose.clone()}>
            <div class="form-group">
                <label for="theme-select">{"Theme"}</label>
                <select id="theme-select" onchange={on_theme}>
                    { for Theme::ALL.iter().map(|theme| html! {
                        <option value={theme.id()} selected={*theme == draft.theme}>{theme.name()}</option>
                    }) }
                </select>
            </div>
            if draft.theme == Theme::Custom {
                <div class="form-group">
                    <label for="custom-color">{"Custom color"}</label>
                    <input id="custom-color" type="color" value={draft.custom_color.clone()} oninput={on_color} />
                </div>
            }
            <div class="form-group">
                <label for="layout-select">{"Layout"}</label>
                <select id="layout-select" onchange={on_layout}>
                    { for Layout::ALL.iter().map(|layout| html! {
                        <option value={layout.id()} selected={*layout == draft.layout}>{layout.name()}</option>
                    }) }
                </select>
            </div>
            <div class="form-group">
                <label for="background-input">{"Background image URL"}</label>
                <input
                    id="background-input"
                    type="text"
                    placeholder="https://example.com/image.jpg"
                    value={draft.background_image.clone()}
                    oninput={on_background}
                />
            </div>
            <div class="form-group">
                <label for="title-input">{"Dashboard title"}</label>
                <input id="title-input" type="text" value={draft.dashboard_title.clone()} oninput={on_title} />
            </div>

            <div class="shortcuts-help">
                <h3>{"Keyboard shortcuts"}</h3>
                <ul>
                    { for Shortcut::all().into_iter().map(|shortcut| html! {
                        <li><kbd>{shortcut.key}</kbd>{" "}{shortcut.description}</li>
                    }) }
                </ul>
            </div>

            <div class="form-actions">
                <Button onclick={on_reset} variant={ButtonVariant::Danger}>{"Reset"}</Button>
                <Button onclick={on_save} variant={ButtonVariant::Primary}>{"Save"}</Button>
            </div>
        </Modal>
    }
}

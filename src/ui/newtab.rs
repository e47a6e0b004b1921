/// New-tab page: header, favorites, widgets and the dialogs over them

use super::DashboardHandle;
use super::components::{Notice, NoticeBanner};
use super::favorites::{AddFavoriteDialog, FavoritesBoard};
use super::settings::SettingsDialog;
use super::widgets::{AddWidgetDialog, WidgetsPanel};
use crate::dashboard::Dashboard;
use crate::platform::{self, PlatformStore};
use crate::settings::Theme;
use crate::shortcuts::{Shortcut, ShortcutAction};
use patternfly_yew::prelude::Spinner;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Dialog {
    AddFavorite,
    AddWidget,
    Settings,
}

fn theme_notice(theme: Theme) -> Notice {
    let id = theme.id();
    let mut label = id[..1].to_uppercase();
    label.push_str(&id[1..]);
    Notice::info(format!("Theme: {}", label))
}

#[function_component(NewTab)]
pub fn new_tab() -> Html {
    let dashboard = use_memo((), |_| Dashboard::new(Rc::new(PlatformStore::new())));
    let handle = DashboardHandle(dashboard.clone());
    let loaded = use_state(|| false);
    let dialog = use_state(|| None::<Dialog>);
    let notice = use_state(|| None::<Notice>);
    let redraw = use_force_update();

    // Subscribe to changes and load everything on mount
    {
        let dashboard = dashboard.clone();
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            let on_change = move || redraw.force_update();
            dashboard.favorites().subscribe(on_change.clone());
            dashboard.widgets().subscribe(on_change.clone());
            dashboard.subscribe_settings(on_change);

            spawn_local(async move {
                dashboard.load().await;
                loaded.set(true);
            });
            || ()
        });
    }

    // Keep <body> classes in step with settings
    {
        let dashboard = dashboard.clone();
        use_effect_with(dashboard.settings_revision(), move |_| {
            let settings = dashboard.settings();
            platform::apply_body_appearance(&settings.body_classes(), &settings.body_style());
            || ()
        });
    }

    let on_notice = {
        let notice = notice.clone();
        Callback::from(move |n: Notice| notice.set(Some(n)))
    };

    let on_cycle_theme = {
        let dashboard = dashboard.clone();
        let on_notice = on_notice.clone();
        Callback::from(move |_: ()| {
            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            spawn_local(async move {
                let theme = dashboard.cycle_theme().await;
                on_notice.emit(theme_notice(theme));
            });
        })
    };

    // Keyboard shortcuts
    {
        let dialog = dialog.clone();
        let on_cycle_theme = on_cycle_theme.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                let tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();
                let Some(action) = Shortcut::from_key(&e.key(), &tag) else {
                    return;
                };
                e.prevent_default();

                match action {
                    ShortcutAction::AddFavorite => dialog.set(Some(Dialog::AddFavorite)),
                    ShortcutAction::AddWidget => dialog.set(Some(Dialog::AddWidget)),
                    ShortcutAction::OpenSettings => dialog.set(Some(Dialog::Settings)),
                    ShortcutAction::CycleTheme => on_cycle_theme.emit(()),
                    ShortcutAction::CloseDialogs => dialog.set(None),
                }
            });

            if let Some(document) = &document {
                let _ = document
                    .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
            }

            move || {
                if let Some(document) = document {
                    let _ = document.remove_event_listener_with_callback(
                        "keydown",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let open = |target: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Some(target)))
    };
    let on_close = {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(None))
    };
    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| notice.set(None))
    };

    if !*loaded {
        return html! {
            <div class="loading-container">
                <Spinner />
            </div>
        };
    }

    let settings = dashboard.settings();
    let favorites_revision = dashboard.favorites().revision();
    let widgets_revision = dashboard.widgets().revision();

    html! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1 class="dashboard-title">{&settings.dashboard_title}</h1>
                <div class="header-actions">
                    <button id="add-favorite-btn" class="header-btn" title="Add favorite (F)" onclick={open(Dialog::AddFavorite)}>
                        <i class="fas fa-plus"></i>
                    </button>
                    <button id="add-widget-btn" class="header-btn" title="Add widget (W)" onclick={open(Dialog::AddWidget)}>
                        <i class="fas fa-puzzle-piece"></i>
                    </button>
                    <button id="theme-toggle" class="header-btn" title="Cycle theme (T)" onclick={on_cycle_theme.reform(|_: MouseEvent| ())}>
                        <i class="fas fa-palette"></i>
                    </button>
                    <button id="settings-btn" class="header-btn" title="Settings (S)" onclick={open(Dialog::Settings)}>
                        <i class="fas fa-cog"></i>
                    </button>
                </div>
            </header>

            if let Some(n) = (*notice).clone() {
                <NoticeBanner notice={n} ondismiss={on_dismiss} />
            }

            <main class="dashboard-main">
                <FavoritesBoard
                    dashboard={handle.clone()}
                    revision={favorites_revision}
                    on_notice={on_notice.clone()}
                />
                <WidgetsPanel
                    dashboard={handle.clone()}
                    revision={widgets_revision}
                    on_notice={on_notice.clone()}
                />
            </main>

            {
                match *dialog {
                    Some(Dialog::AddFavorite) => html! {
                        <AddFavoriteDialog
                            dashboard={handle.clone()}
                            revision={favorites_revision}
                            on_notice={on_notice.clone()}
                            onclose={on_close.clone()}
                        />
                    },
                    Some(Dialog::AddWidget) => html! {
                        <AddWidgetDialog
                            dashboard={handle.clone()}
                            on_notice={on_notice.clone()}
                            onclose={on_close.clone()}
                        />
                    },
                    Some(Dialog::Settings) => html! {
                        <SettingsDialog
                            dashboard={handle}
                            on_notice={on_notice}
                            onclose={on_close}
                        />
                    },
                    None => html! {},
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_notice_capitalizes() {
        assert_eq!(theme_notice(Theme::Gradient).message, "Theme: Gradient");
        assert_eq!(theme_notice(Theme::Dark).message, "Theme: Dark");
    }
}

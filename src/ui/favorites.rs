/// Favorites board, add-favorite dialog and group/import/export controls

use super::DashboardHandle;
use super::components::{EmptyState, Modal, Notice};
use crate::favorites::{Favorite, Group, GroupUpdate, SiteEntry};
use crate::platform;
use crate::sites::{QUICK_SITES, default_icon};
use patternfly_yew::prelude::{Button, ButtonVariant};
use std::collections::HashSet;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FavoritesBoardProps {
    pub dashboard: DashboardHandle,
    pub revision: u64,
    pub on_notice: Callback<Notice>,
}

#[function_component(FavoritesBoard)]
pub fn favorites_board(props: &FavoritesBoardProps) -> Html {
    let query = use_state(String::new);
    let new_group_name = use_state(String::new);

    let on_search = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let on_remove = {
        let dashboard = props.dashboard.clone();
        Callback::from(move |(id, name): (String, String)| {
            if !platform::confirm(&format!("Remove \"{}\" from favorites?", name)) {
                return;
            }
            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.favorites().remove_favorite(&id).await;
            });
        })
    };

    let on_move = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |(id, group_id): (String, String)| {
            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            spawn_local(async move {
                if let Err(e) = dashboard.favorites().move_favorite(&id, &group_id).await {
                    on_notice.emit(Notice::error(e.to_string()));
                }
            });
        })
    };

    let on_rename_group = {
        let dashboard = props.dashboard.clone();
        Callback::from(move |(id, name): (String, String)| {
            let Some(new_name) = platform::prompt("Group name:", &name) else {
                return;
            };
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() || new_name == name {
                return;
            }

            let dashboard = dashboard.clone();
            spawn_local(async move {
                let updates = GroupUpdate {
                    name: Some(new_name),
                    color: None,
                };
                dashboard.favorites().edit_group(&id, updates).await;
            });
        })
    };

    let on_delete_group = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |(id, name): (String, String)| {
            if !platform::confirm(&format!(
                "Delete group \"{}\"? Its favorites move to another group.",
                name
            )) {
                return;
            }

            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            spawn_local(async move {
                if !dashboard.favorites().remove_group(&id).await {
                    on_notice.emit(Notice::error("The last group cannot be deleted"));
                }
            });
        })
    };

    let on_group_name_input = {
        let new_group_name = new_group_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                new_group_name.set(input.value());
            }
        })
    };

    let on_create_group = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let new_group_name = new_group_name.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = new_group_name.trim().to_string();
            if name.is_empty() {
                return;
            }
            new_group_name.set(String::new());

            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            spawn_local(async move {
                let group = dashboard.favorites().create_group(&name, None).await;
                on_notice.emit(Notice::success(format!("Created group \"{}\"", group.name)));
            });
        })
    };

    let on_export = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |_: MouseEvent| {
            let document = dashboard.favorites().export_favorites();
            platform::download_file(&document.to_json(), &document.file_name());
            on_notice.emit(Notice::success(format!(
                "Exported {} favorites",
                document.favorites.len()
            )));
        })
    };

    let on_import = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");

            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            spawn_local(async move {
                let contents = match read_file(&file).await {
                    Ok(contents) => contents,
                    Err(e) => {
                        on_notice.emit(Notice::error(format!("Failed to read file: {}", e)));
                        return;
                    }
                };
                match dashboard.favorites().import_favorites(&contents).await {
                    Ok(count) => on_notice.emit(Notice::success(format!("Imported {} favorites", count))),
                    Err(e) => on_notice.emit(Notice::error(e.to_string())),
                }
            });
        })
    };

    let query_text = query.trim().to_string();
    let (sections, groups) = props.dashboard.favorites().with_data(|data| {
        let hits: Option<HashSet<&str>> = (!query_text.is_empty())
            .then(|| data.search(&query_text).into_iter().map(|f| f.id.as_str()).collect());

        let sections: Vec<(Group, Vec<Favorite>)> = data
            .grouped()
            .into_iter()
            .map(|(group, favorites)| {
                let favorites = favorites
                    .into_iter()
                    .filter(|f| hits.as_ref().is_none_or(|hits| hits.contains(f.id.as_str())))
                    .cloned()
                    .collect();
                (group.clone(), favorites)
            })
            .filter(|(_, favorites): &(Group, Vec<Favorite>)| hits.is_none() || !favorites.is_empty())
            .collect();
        (sections, data.groups().to_vec())
    });
    let can_delete_groups = groups.len() > 1;

    html! {
        <section class="favorites-section">
            <div class="favorites-toolbar">
                <input
                    class="favorites-search"
                    type="search"
                    placeholder="Search favorites..."
                    value={(*query).clone()}
                    oninput={on_search}
                />
                <form class="group-create" onsubmit={on_create_group}>
                    <input
                        type="text"
                        placeholder="New group name"
                        value={(*new_group_name).clone()}
                        oninput={on_group_name_input}
                    />
                    <button type="submit" class="btn-secondary">{"Add group"}</button>
                </form>
                <Button onclick={on_export} variant={ButtonVariant::Secondary}>
                    {"Export"}
                </Button>
                <label class="import-label">
                    {"Import"}
                    <input type="file" accept=".json,application/json" class="hidden-input" onchange={on_import} />
                </label>
            </div>

            if sections.is_empty() {
                <EmptyState icon="fas fa-search" message="No favorites match your search." />
            }

            { for sections.into_iter().map(|(group, favorites)| {
                let rename = {
                    let on_rename_group = on_rename_group.clone();
                    let args = (group.id.clone(), group.name.clone());
                    Callback::from(move |_: MouseEvent| on_rename_group.emit(args.clone()))
                };
                let delete = {
                    let on_delete_group = on_delete_group.clone();
                    let args = (group.id.clone(), group.name.clone());
                    Callback::from(move |_: MouseEvent| on_delete_group.emit(args.clone()))
                };

                html! {
                    <div class="favorite-group" key={group.id.clone()}>
                        <div class="group-header">
                            <span class="group-color" style={format!("background-color: {};", group.color)}></span>
                            <h3 class="group-name">{&group.name}</h3>
                            <span class="group-count">{favorites.len()}</span>
                            <button class="group-btn" title="Rename group" onclick={rename}>
                                <i class="fas fa-pen"></i>
                            </button>
                            if can_delete_groups {
                                <button class="group-btn" title="Delete group" onclick={delete}>
                                    <i class="fas fa-trash"></i>
                                </button>
                            }
                        </div>
                        <div class="favorites-grid">
                            if favorites.is_empty() {
                                <p class="group-empty">{"No favorites in this group yet."}</p>
                            }
                            { for favorites.iter().map(|favorite| html! {
                                <FavoriteTile
                                    key={favorite.id.clone()}
                                    favorite={favorite.clone()}
                                    groups={groups.clone()}
                                    on_remove={on_remove.clone()}
                                    on_move={on_move.clone()}
                                />
                            }) }
                        </div>
                    </div>
                }
            }) }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct FavoriteTileProps {
    favorite: Favorite,
    groups: Vec<Group>,
    on_remove: Callback<(String, String)>,
    on_move: Callback<(String, String)>,
}

#[function_component(FavoriteTile)]
fn favorite_tile(props: &FavoriteTileProps) -> Html {
    let favorite = &props.favorite;
    let icon = if favorite.icon.is_empty() {
        default_icon(&favorite.url).to_string()
    } else {
        favorite.icon.clone()
    };

    let onclick_remove = {
        let on_remove = props.on_remove.clone();
        let args = (favorite.id.clone(), favorite.name.clone());
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_remove.emit(args.clone());
        })
    };

    let onchange_group = {
        let on_move = props.on_move.clone();
        let id = favorite.id.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                on_move.emit((id.clone(), select.value()));
            }
        })
    };

    html! {
        <div class="favorite-item">
            <a class="favorite-link" href={favorite.url.clone()} title={favorite.url.clone()}>
                <div class="favorite-icon"><i class={icon}></i></div>
                <div class="favorite-name">{&favorite.name}</div>
            </a>
            if props.groups.len() > 1 {
                <select class="favorite-move" title="Move to group" onchange={onchange_group}>
                    { for props.groups.iter().map(|group| html! {
                        <option
                            value={group.id.clone()}
                            selected={favorite.group_id.as_deref() == Some(group.id.as_str())}
                        >
                            {&group.name}
                        </option>
                    }) }
                </select>
            }
            <button class="favorite-remove" title="Remove" onclick={onclick_remove}>{"×"}</button>
        </div>
    }
}

async fn read_file(file: &web_sys::File) -> Result<String, String> {
    let text = JsFuture::from(file.text())
        .await
        .map_err(|e| format!("{:?}", e))?;
    text.as_string().ok_or_else(|| "File is not text".to_string())
}

#[derive(Clone, Copy, PartialEq)]
enum AddTab {
    Manual,
    QuickAdd,
}

#[derive(Properties, PartialEq)]
pub struct AddFavoriteDialogProps {
    pub dashboard: DashboardHandle,
    pub revision: u64,
    pub on_notice: Callback<Notice>,
    pub onclose: Callback<()>,
}

#[function_component(AddFavoriteDialog)]
pub fn add_favorite_dialog(props: &AddFavoriteDialogProps) -> Html {
    let tab = use_state(|| AddTab::Manual);
    let name = use_state(String::new);
    let url = use_state(String::new);
    let icon = use_state(String::new);
    let group_id = use_state(String::new);
    let selected = use_state(HashSet::<&'static str>::new);

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                handle.set(input.value());
            }
        })
    };
    let on_name = text_input(&name);
    let on_url = text_input(&url);
    let on_icon = text_input(&icon);

    let on_group = {
        let group_id = group_id.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                group_id.set(select.value());
            }
        })
    };

    let on_tab = {
        let tab = tab.clone();
        move |target: AddTab| {
            let tab = tab.clone();
            Callback::from(move |_: MouseEvent| tab.set(target))
        }
    };

    let onsubmit = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let onclose = props.onclose.clone();
        let (name, url, icon, group_id) = (name.clone(), url.clone(), icon.clone(), group_id.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = name.trim().to_string();
            let url = url.trim().to_string();
            let icon = Some(icon.trim().to_string()).filter(|i| !i.is_empty());
            let group_id = Some((*group_id).clone()).filter(|g| !g.is_empty());

            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            let onclose = onclose.clone();
            spawn_local(async move {
                let added = dashboard
                    .favorites()
                    .add_favorite(&name, &url, icon.as_deref(), group_id.as_deref())
                    .await;
                match added {
                    Ok(favorite) => {
                        on_notice.emit(Notice::success(format!("Added \"{}\" to favorites!", favorite.name)));
                        onclose.emit(());
                    }
                    Err(e) => on_notice.emit(Notice::error(e.to_string())),
                }
            });
        })
    };

    let toggle_site = {
        let selected = selected.clone();
        move |site_url: &'static str| {
            let selected = selected.clone();
            Callback::from(move |_: Event| {
                let mut next = (*selected).clone();
                if !next.remove(site_url) {
                    next.insert(site_url);
                }
                selected.set(next);
            })
        }
    };

    let on_add_selected = {
        let dashboard = props.dashboard.clone();
        let on_notice = props.on_notice.clone();
        let onclose = props.onclose.clone();
        let selected = selected.clone();
        let group_id = group_id.clone();
        Callback::from(move |_: MouseEvent| {
            if selected.is_empty() {
                on_notice.emit(Notice::error("Please select at least one site to add."));
                return;
            }
            let sites: Vec<SiteEntry> = QUICK_SITES
                .iter()
                .filter(|site| selected.contains(site.url))
                .map(SiteEntry::from)
                .collect();
            let group_id = Some((*group_id).clone()).filter(|g| !g.is_empty());
            selected.set(HashSet::new());

            let dashboard = dashboard.clone();
            let on_notice = on_notice.clone();
            let onclose = onclose.clone();
            spawn_local(async move {
                let added = dashboard
                    .favorites()
                    .add_favorites_bulk(&sites, group_id.as_deref())
                    .await;
                on_notice.emit(Notice::success(format!("Added {} site(s) to favorites.", added)));
                onclose.emit(());
            });
        })
    };

    let (groups, available) = props.dashboard.favorites().with_data(|data| {
        let available: Vec<_> = QUICK_SITES
            .iter()
            .filter(|site| !data.contains_url(site.url))
            .collect();
        (data.groups().to_vec(), available)
    });
    let icon_preview = if icon.trim().is_empty() {
        default_icon(url.trim()).to_string()
    } else {
        icon.trim().to_string()
    };

    let group_select = html! {
        <div class="form-group">
            <label for="favorite-group">{"Group"}</label>
            <select id="favorite-group" onchange={on_group}>
                { for groups.iter().map(|group| html! {
                    <option value={group.id.clone()} selected={*group_id == group.id || (group_id.is_empty() && group.is_default)}>
                        {&group.name}
                    </option>
                }) }
            </select>
        </div>
    };

    html! {
        <Modal title="Add Favorite" onclose={props.onclose.clone()}>
            <div class="tab-buttons">
                <button class={classes!("tab-btn", (*tab == AddTab::Manual).then_some("active"))} onclick={on_tab(AddTab::Manual)}>
                    {"Manual"}
                </button>
                <button class={classes!("tab-btn", (*tab == AddTab::QuickAdd).then_some("active"))} onclick={on_tab(AddTab::QuickAdd)}>
                    {"Quick Add"}
                </button>
            </div>

            if *tab == AddTab::Manual {
                <form class="tab-panel active" {onsubmit}>
                    <div class="form-group">
                        <label for="site-name">{"Name"}</label>
                        <input id="site-name" type="text" placeholder="Site name (optional)" value={(*name).clone()} oninput={on_name} />
                    </div>
                    <div class="form-group">
                        <label for="site-url">{"URL"}</label>
                        <input id="site-url" type="text" placeholder="https://example.com" required={true} value={(*url).clone()} oninput={on_url} />
                    </div>
                    <div class="form-group">
                        <label for="site-icon">{"Icon class"}</label>
                        <div class="icon-input">
                            <input id="site-icon" type="text" placeholder={icon_preview.clone()} value={(*icon).clone()} oninput={on_icon} />
                            <i class={icon_preview}></i>
                        </div>
                    </div>
                    {group_select.clone()}
                    <div class="form-actions">
                        <button type="button" class="btn-secondary" onclick={props.onclose.reform(|_: MouseEvent| ())}>{"Cancel"}</button>
                        <button type="submit" class="btn-primary">{"Add Favorite"}</button>
                    </div>
                </form>
            } else {
                <div class="tab-panel active">
                    if available.is_empty() {
                        <EmptyState icon="fas fa-check" message="Every quick-add site is already in your favorites." />
                    }
                    <div class="quick-add-list">
                        { for available.iter().map(|site| html! {
                            <label class="quick-add-item" key={site.url}>
                                <input
                                    type="checkbox"
                                    checked={selected.contains(site.url)}
                                    onchange={toggle_site(site.url)}
                                />
                                <i class={default_icon(site.url)}></i>
                                <span>{site.name}</span>
                            </label>
                        }) }
                    </div>
                    {group_select}
                    <div class="form-actions">
                        <Button onclick={on_add_selected} variant={ButtonVariant::Primary}>
                            {format!("Add selected ({})", selected.len())}
                        </Button>
                    </div>
                </div>
            }
        </Modal>
    }
}

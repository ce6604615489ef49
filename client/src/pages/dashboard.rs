//! Admin dashboard: catalog table with add, edit and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `Protected requires=Admin`; the backend enforces the same
//! rule, this page only assumes it. Listings are saved as JSON, or as
//! multipart form data when header, background or carousel images are
//! picked.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::notice::{Notice, NoticeBanner};
use crate::net::api::{ImageUploads, asset_url};
use crate::net::types::{Game, GameInput};
use crate::util::format::split_list;

pub const GAME_ADDED: &str = "Game added successfully!";
pub const GAME_UPDATED: &str = "Game updated successfully!";
pub const SAVE_FAILED: &str = "Failed to save game";
pub const GAME_DELETED: &str = "Game deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete game";
pub const LOAD_FAILED: &str = "Failed to load games";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this game?";

/// Raw text of the add/edit form, as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameForm {
    pub name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub price: String,
    pub developer: String,
    pub publisher: String,
    pub categories: String,
    pub tags: String,
    pub trailer_url: String,
    pub release_date: String,
    pub is_featured: bool,
    pub is_published: bool,
}

impl GameForm {
    /// Prefill from an existing listing.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let input = GameInput::from(game);
        Self {
            name: input.name,
            short_description: input.short_description,
            detailed_description: input.detailed_description,
            price: input.price.to_string(),
            developer: input.developer,
            publisher: input.publisher,
            categories: input.categories,
            tags: input.tags,
            trailer_url: input.trailer_url,
            release_date: input.release_date.unwrap_or_default(),
            is_featured: input.is_featured,
            is_published: input.is_published,
        }
    }

    /// Validate and convert to the wire payload.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when the name is blank or the price is
    /// not a non-negative number.
    pub fn to_input(&self) -> Result<GameInput, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required");
        }
        let price = parse_price(&self.price)?;
        let release_date = Some(self.release_date.trim()).filter(|d| !d.is_empty()).map(str::to_owned);
        Ok(GameInput {
            name: name.to_owned(),
            short_description: self.short_description.trim().to_owned(),
            detailed_description: self.detailed_description.clone(),
            price,
            developer: self.developer.trim().to_owned(),
            publisher: self.publisher.trim().to_owned(),
            categories: normalize_list(&self.categories),
            tags: normalize_list(&self.tags),
            trailer_url: self.trailer_url.trim().to_owned(),
            release_date,
            is_featured: self.is_featured,
            is_published: self.is_published,
        })
    }
}

/// Parse a price field; blank means free.
///
/// # Errors
///
/// Returns a user-facing message for non-numeric, negative or non-finite
/// input.
pub fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err("Price must be a non-negative number"),
    }
}

/// Two-step delete on a table row: the Delete button arms the row and only
/// the confirm button removes the listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteConfirm {
    #[default]
    Idle,
    Armed,
}

impl DeleteConfirm {
    #[must_use]
    pub fn request(self) -> Self {
        Self::Armed
    }

    #[must_use]
    pub fn cancel(self) -> Self {
        Self::Idle
    }

    /// Next state, and whether the delete should be sent.
    #[must_use]
    pub fn confirm(self) -> (Self, bool) {
        (Self::Idle, self == Self::Armed)
    }
}

/// Canonical `a, b, c` form of a comma-separated list input.
#[must_use]
pub fn normalize_list(raw: &str) -> String {
    split_list(Some(raw)).join(", ")
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let games = RwSignal::new(Vec::<Game>::new());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(None::<Notice>);
    let form = RwSignal::new(GameForm::default());
    let editing = RwSignal::new(None::<i64>);
    let show_form = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let reload = move || {
        loading.set(true);
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_games().await {
                Ok(list) => games.set(list),
                Err(e) => {
                    log::warn!("dashboard load failed: {e}");
                    notice.set(Some(Notice::error(LOAD_FAILED)));
                }
            }
            loading.set(false);
        });
    };

    #[cfg(feature = "hydrate")]
    reload();

    let header_input = NodeRef::<leptos::html::Input>::new();
    let background_input = NodeRef::<leptos::html::Input>::new();
    let gallery_input = NodeRef::<leptos::html::Input>::new();

    let open_form = move |target: Option<i64>, values: GameForm| {
        editing.set(target);
        form.set(values);
        for input in [header_input, background_input, gallery_input] {
            if let Some(el) = input.get_untracked() {
                el.set_value("");
            }
        }
        show_form.set(true);
    };

    let on_add = move |_| open_form(None, GameForm::default());

    let on_edit = Callback::new(move |game: Game| open_form(Some(game.game_id), GameForm::from_game(&game)));

    let on_delete = Callback::new(move |game_id: i64| {
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_game(game_id).await {
                Ok(()) => {
                    notice.set(Some(Notice::success(GAME_DELETED)));
                    reload();
                }
                Err(e) => {
                    log::warn!("delete of game {game_id} failed: {e}");
                    notice.set(Some(Notice::error(DELETE_FAILED)));
                }
            }
        });
    });

    let picked_images = move || {
        #[allow(unused_mut)]
        let mut uploads = ImageUploads::default();
        #[cfg(feature = "hydrate")]
        for (part, input) in [
            (crate::net::api::HEADER_IMAGE_PART, header_input),
            (crate::net::api::BACKGROUND_IMAGE_PART, background_input),
            (crate::net::api::GAME_IMAGES_PART, gallery_input),
        ] {
            let Some(files) = input.get_untracked().and_then(|el| el.files()) else {
                continue;
            };
            for file in (0..files.length()).filter_map(|i| files.get(i)) {
                uploads.push(part, file);
            }
        }
        uploads
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let input = match form.with_untracked(GameForm::to_input) {
            Ok(input) => input,
            Err(message) => {
                notice.set(Some(Notice::warning(message)));
                return;
            }
        };
        let uploads = picked_images();
        let target = editing.get_untracked();
        saving.set(true);
        leptos::task::spawn_local(async move {
            let result = match target {
                Some(id) => crate::net::api::update_game(id, &input, &uploads).await.map(|()| GAME_UPDATED),
                None => crate::net::api::create_game(&input, &uploads).await.map(|()| GAME_ADDED),
            };
            match result {
                Ok(message) => {
                    notice.set(Some(Notice::success(message)));
                    show_form.set(false);
                    reload();
                }
                Err(e) => {
                    log::warn!("save failed: {e}");
                    notice.set(Some(Notice::error(SAVE_FAILED)));
                }
            }
            saving.set(false);
        });
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h2>"Manage Games"</h2>
                <button class="btn btn--primary" on:click=on_add>
                    "Add Game"
                </button>
            </header>
            <NoticeBanner notice=notice />
            <Show when=move || show_form.get()>
                <form class="dashboard-form" on:submit=on_submit>
                    <h3>{move || if editing.get().is_some() { "Edit Game" } else { "Add Game" }}</h3>
                    <TextField label="Name" form=form get=|f| f.name.clone() set=|f, v| f.name = v />
                    <TextField
                        label="Short Description"
                        form=form
                        get=|f| f.short_description.clone()
                        set=|f, v| f.short_description = v
                    />
                    <label class="dashboard-form__label">
                        "Detailed Description"
                        <textarea
                            class="dashboard-form__input"
                            rows="4"
                            prop:value=move || form.with(|f| f.detailed_description.clone())
                            on:input=move |ev| form.update(|f| f.detailed_description = event_target_value(&ev))
                        ></textarea>
                    </label>
                    <TextField label="Price" form=form get=|f| f.price.clone() set=|f, v| f.price = v />
                    <TextField label="Developer" form=form get=|f| f.developer.clone() set=|f, v| f.developer = v />
                    <TextField label="Publisher" form=form get=|f| f.publisher.clone() set=|f, v| f.publisher = v />
                    <TextField
                        label="Categories (comma-separated)"
                        form=form
                        get=|f| f.categories.clone()
                        set=|f, v| f.categories = v
                    />
                    <TextField label="Tags (comma-separated)" form=form get=|f| f.tags.clone() set=|f, v| f.tags = v />
                    <TextField
                        label="Trailer URL"
                        form=form
                        get=|f| f.trailer_url.clone()
                        set=|f, v| f.trailer_url = v
                    />
                    <label class="dashboard-form__label">
                        "Release Date"
                        <input
                            class="dashboard-form__input"
                            type="date"
                            prop:value=move || form.with(|f| f.release_date.clone())
                            on:input=move |ev| form.update(|f| f.release_date = event_target_value(&ev))
                        />
                    </label>
                    <label class="dashboard-form__label">
                        "Header Image"
                        <input class="dashboard-form__file" type="file" accept="image/*" node_ref=header_input />
                    </label>
                    <label class="dashboard-form__label">
                        "Background Image"
                        <input class="dashboard-form__file" type="file" accept="image/*" node_ref=background_input />
                    </label>
                    <label class="dashboard-form__label">
                        "Game Images (carousel)"
                        <input
                            class="dashboard-form__file"
                            type="file"
                            accept="image/*"
                            multiple
                            node_ref=gallery_input
                        />
                    </label>
                    <label class="dashboard-form__check">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.is_featured)
                            on:change=move |ev| form.update(|f| f.is_featured = event_target_checked(&ev))
                        />
                        "Featured"
                    </label>
                    <label class="dashboard-form__check">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.is_published)
                            on:change=move |ev| form.update(|f| f.is_published = event_target_checked(&ev))
                        />
                        "Published"
                    </label>
                    <div class="dashboard-form__actions">
                        <button class="btn" type="button" on:click=move |_| show_form.set(false)>
                            "Cancel"
                        </button>
                        <button class="btn btn--primary" type="submit" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p class="page-loading">"Loading games..."</p> }>
                <table class="dashboard-table">
                    <thead>
                        <tr>
                            <th>"Image"</th>
                            <th>"Name"</th>
                            <th>"Developer"</th>
                            <th>"Publisher"</th>
                            <th>"Price"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            games
                                .get()
                                .into_iter()
                                .map(|game| view! { <GameRow game=game on_edit=on_edit on_delete=on_delete /> })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}

#[component]
fn GameRow(game: Game, on_edit: Callback<Game>, on_delete: Callback<i64>) -> impl IntoView {
    let id = game.game_id;
    let image = game.header_image_url.as_deref().map(asset_url);
    let name = game.name.clone();
    let edit_target = game.clone();
    let confirm = RwSignal::new(DeleteConfirm::Idle);

    let on_confirm = move |_| {
        let (next, delete) = confirm.get_untracked().confirm();
        confirm.set(next);
        if delete {
            on_delete.run(id);
        }
    };

    view! {
        <tr>
            <td>
                {match image {
                    Some(src) => view! { <img class="dashboard-table__thumb" src=src alt=name.clone() /> }.into_any(),
                    None => "No image".into_any(),
                }}
            </td>
            <td>{game.name}</td>
            <td>{game.developer.unwrap_or_default()}</td>
            <td>{game.publisher.unwrap_or_default()}</td>
            <td>{game.price.to_string()}</td>
            <td class="dashboard-table__actions">
                <button class="btn" on:click=move |_| on_edit.run(edit_target.clone())>
                    "Edit"
                </button>
                <Show
                    when=move || confirm.get() == DeleteConfirm::Armed
                    fallback=move || {
                        view! {
                            <button class="btn btn--danger" on:click=move |_| confirm.update(|c| *c = c.request())>
                                "Delete"
                            </button>
                        }
                    }
                >
                    <span class="dashboard-table__confirm">
                        {DELETE_PROMPT}
                        <button class="btn btn--danger" on:click=on_confirm>
                            "Yes"
                        </button>
                        <button class="btn" on:click=move |_| confirm.update(|c| *c = c.cancel())>
                            "No"
                        </button>
                    </span>
                </Show>
            </td>
        </tr>
    }
}

/// Single-line text input bound to one `GameForm` field.
#[component]
fn TextField(
    label: &'static str,
    form: RwSignal<GameForm>,
    get: fn(&GameForm) -> String,
    set: fn(&mut GameForm, String),
) -> impl IntoView {
    view! {
        <label class="dashboard-form__label">
            {label}
            <input
                class="dashboard-form__input"
                type="text"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </label>
    }
}

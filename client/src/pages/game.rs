//! Game detail page with screenshot/trailer carousel and library action.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route. The listing loads for everyone; ownership is probed through
//! the signed-in user's library and simply reads as "not owned" when the
//! probe fails (for example, when nobody is signed in).

#[cfg(test)]
#[path = "game_test.rs"]
mod game_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::notice::{Notice, NoticeBanner};
use crate::net::api::{AddToLibraryOutcome, ApiError, asset_url};
use crate::net::types::Game;
use crate::util::format::{detail_price_label, is_free, or_dash, short_date, split_list, youtube_embed_url};

pub const GAME_NOT_FOUND: &str = "Game not found";
pub const ADDED_TO_LIBRARY: &str = "Game added to your library!";
pub const ADD_FAILED: &str = "Failed to add game to profile";
pub const ADD_NOT_IMPLEMENTED: &str = "Add to profile is not implemented yet.";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server.";

/// Parse the `:id` route parameter.
#[must_use]
pub fn parse_game_id(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// State of the add/buy button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseAction {
    Checking,
    Owned,
    Add,
    Buy,
}

impl PurchaseAction {
    #[must_use]
    pub fn for_game(checking: bool, owned: bool, price: f64) -> Self {
        if owned {
            Self::Owned
        } else if checking {
            Self::Checking
        } else if is_free(price) {
            Self::Add
        } else {
            Self::Buy
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "Checking...",
            Self::Owned => "Game Owned",
            Self::Add => "Add Game",
            Self::Buy => "Buy Game",
        }
    }

    #[must_use]
    pub fn enabled(self) -> bool {
        matches!(self, Self::Add | Self::Buy)
    }
}

/// Feedback for an add-to-library attempt.
#[must_use]
pub fn add_outcome_notice(result: &Result<AddToLibraryOutcome, ApiError>) -> Notice {
    match result {
        Ok(AddToLibraryOutcome::Added) => Notice::success(ADDED_TO_LIBRARY),
        Ok(AddToLibraryOutcome::NotImplemented) => Notice::info(ADD_NOT_IMPLEMENTED),
        Ok(AddToLibraryOutcome::Unexpected(_)) => Notice::error(UNEXPECTED_RESPONSE),
        Err(err) => Notice::error(err.user_message(ADD_FAILED)),
    }
}

/// One carousel entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slide {
    Image { src: String, alt: String },
    Trailer { src: String, title: String },
}

/// Screenshots in listing order, then the trailer when one is set.
#[must_use]
pub fn carousel_slides(game: &Game) -> Vec<Slide> {
    let mut slides: Vec<Slide> = game
        .game_images
        .iter()
        .enumerate()
        .map(|(index, path)| Slide::Image {
            src: asset_url(path),
            alt: format!("{} screenshot {}", game.name, index + 1),
        })
        .collect();
    if let Some(src) = game.trailer_url.as_deref().and_then(youtube_embed_url) {
        slides.push(Slide::Trailer { src, title: format!("{} Trailer", game.name) });
    }
    slides
}

/// Next (or previous) slide index, wrapping at both ends.
#[must_use]
pub fn step_slide(index: usize, len: usize, forward: bool) -> usize {
    match (len, forward) {
        (0, _) => 0,
        (len, true) => (index + 1) % len,
        (len, false) => (index + len - 1) % len,
    }
}

#[component]
pub fn GamePage() -> impl IntoView {
    let params = use_params_map();
    let game_id = Memo::new(move |_| params.with(|p| parse_game_id(p.get("id").as_deref())));

    let game = RwSignal::new(None::<Game>);
    let loading = RwSignal::new(true);
    let owned = RwSignal::new(false);
    let checking = RwSignal::new(true);
    let notice = RwSignal::new(None::<Notice>);

    Effect::new(move || {
        let requested = game_id.get();
        loading.set(true);
        owned.set(false);
        checking.set(true);
        notice.set(None);
        let Some(id) = requested else {
            game.set(None);
            loading.set(false);
            checking.set(false);
            return;
        };
        leptos::task::spawn_local(async move {
            let result = crate::net::api::fetch_game(id).await;
            if game_id.get_untracked() != Some(id) {
                return;
            }
            match result {
                Ok(found) => game.set(Some(found)),
                Err(e) => {
                    log::info!("game {id} not loaded: {e}");
                    game.set(None);
                    checking.set(false);
                    loading.set(false);
                    return;
                }
            }
            loading.set(false);

            let is_owned = match crate::net::api::fetch_owned_games().await {
                Ok(library) => library.iter().any(|entry| entry.game_id == id),
                Err(e) => {
                    log::debug!("ownership probe failed: {e}");
                    false
                }
            };
            if game_id.get_untracked() == Some(id) {
                owned.set(is_owned);
                checking.set(false);
            }
        });
    });

    let on_add = Callback::new(move |()| {
        let Some(current) = game.get_untracked() else {
            return;
        };
        if owned.get_untracked() {
            return;
        }
        let id = current.game_id;
        leptos::task::spawn_local(async move {
            let result = crate::net::api::add_to_library(id).await;
            if matches!(result, Ok(AddToLibraryOutcome::Added)) {
                owned.set(true);
            }
            notice.set(Some(add_outcome_notice(&result)));
        });
    });

    view! {
        <div class="game-page">
            <NoticeBanner notice=notice />
            {move || {
                if loading.get() {
                    return view! { <p class="page-loading">"Loading game..."</p> }.into_any();
                }
                match game.get() {
                    Some(game) => view! { <GameDetail game=game owned=owned checking=checking on_add=on_add /> }.into_any(),
                    None => view! { <h3 class="game-page__not-found">{GAME_NOT_FOUND}</h3> }.into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn GameDetail(game: Game, owned: RwSignal<bool>, checking: RwSignal<bool>, on_add: Callback<()>) -> impl IntoView {
    let slides = carousel_slides(&game);
    let slide_count = slides.len();
    let has_slides = slide_count != 0;
    let active = RwSignal::new(0_usize);
    let price = game.price;
    let action = Memo::new(move |_| PurchaseAction::for_game(checking.get(), owned.get(), price));
    let background = game
        .background_image_url
        .as_deref()
        .map(|path| format!("background-image: url({})", asset_url(path)));
    let categories = split_list(game.categories.as_deref());
    let tags = split_list(game.tags.as_deref());
    let has_categories = !categories.is_empty();
    let has_tags = !tags.is_empty();

    view! {
        {background.map(|style| view! { <div class="game-page__background" style=style></div> })}
        <div class="game-page__content">
            <h2 class="game-page__title">{game.name.clone()}</h2>
            <p class="game-page__description-short">{game.short_description.clone().unwrap_or_default()}</p>

            <Show when=move || has_slides>
                <div class="game-page__carousel">
                    {slides
                        .clone()
                        .into_iter()
                        .enumerate()
                        .map(|(index, slide)| {
                            let body = match slide {
                                Slide::Image { src, alt } => {
                                    view! { <img class="game-page__carousel-image" src=src alt=alt /> }.into_any()
                                }
                                Slide::Trailer { src, title } => {
                                    view! {
                                        <iframe
                                            class="game-page__carousel-video"
                                            src=src
                                            title=title
                                            allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                                            allowfullscreen=true
                                        ></iframe>
                                    }
                                        .into_any()
                                }
                            };
                            view! {
                                <div
                                    class="game-page__carousel-slide"
                                    class:game-page__carousel-slide--active=move || active.get() == index
                                >
                                    {body}
                                </div>
                            }
                        })
                        .collect_view()}
                    <button
                        class="game-page__carousel-prev"
                        aria-label="Previous"
                        on:click=move |_| active.update(|i| *i = step_slide(*i, slide_count, false))
                    >
                        "‹"
                    </button>
                    <button
                        class="game-page__carousel-next"
                        aria-label="Next"
                        on:click=move |_| active.update(|i| *i = step_slide(*i, slide_count, true))
                    >
                        "›"
                    </button>
                </div>
            </Show>

            <div class="game-page__columns">
                <section class="game-page__main">
                    {game
                        .detailed_description
                        .clone()
                        .filter(|text| !text.trim().is_empty())
                        .map(|text| {
                            view! {
                                <h4>"About This Game"</h4>
                                <p class="game-page__description-detailed">{text}</p>
                            }
                        })}
                    <div class="game-page__tags">
                        <Show when=move || has_categories>
                            <span class="game-page__tags-label">"Categories: "</span>
                            {categories
                                .clone()
                                .into_iter()
                                .map(|item| view! { <span class="tag tag--category">{item}</span> })
                                .collect_view()}
                        </Show>
                        <Show when=move || has_tags>
                            <span class="game-page__tags-label">"Tags: "</span>
                            {tags.clone().into_iter().map(|item| view! { <span class="tag">{item}</span> }).collect_view()}
                        </Show>
                    </div>
                </section>

                <aside class="game-page__sidebar">
                    <div class="game-page__price-block">
                        <strong>"Price:"</strong>
                        <span class="game-page__price-value">{detail_price_label(game.price)}</span>
                    </div>
                    <button
                        class="btn game-page__buy-button"
                        class:game-page__buy-button--owned=move || action.get() == PurchaseAction::Owned
                        disabled=move || !action.get().enabled()
                        on:click=move |_| on_add.run(())
                    >
                        {move || action.get().label()}
                    </button>
                    <dl class="game-page__info">
                        <dt>"Developer:"</dt>
                        <dd>{or_dash(game.developer.as_deref())}</dd>
                        <dt>"Publisher:"</dt>
                        <dd>{or_dash(game.publisher.as_deref())}</dd>
                        <dt>"Release Date:"</dt>
                        <dd>{short_date(game.release_date.as_deref())}</dd>
                    </dl>
                </aside>
            </div>
        </div>
    }
}

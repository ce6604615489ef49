//! Public catalog landing page.

use leptos::prelude::*;

use crate::components::game_card::GameCard;
use crate::net::types::Game;

#[component]
pub fn HomePage() -> impl IntoView {
    let games = RwSignal::new(Vec::<Game>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_games().await {
            Ok(list) => games.set(list),
            Err(e) => {
                log::warn!("catalog load failed: {e}");
                error.set(Some("Failed to load games".to_owned()));
            }
        }
        loading.set(false);
    });

    view! {
        <div class="home-page">
            <h2 class="home-page__title">"Available Games"</h2>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p class="page-loading">"Loading games..."</p> }>
                <div class="home-page__grid">
                    {move || {
                        games.get().into_iter().map(|game| view! { <GameCard game=game /> }).collect_view()
                    }}
                </div>
            </Show>
        </div>
    }
}

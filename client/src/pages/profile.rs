//! Signed-in user's profile: identity, owned library, friends.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::api::asset_url;
use crate::net::types::{Friend, OwnedGame};
use crate::state::session::AppSession;
use crate::util::format::short_date;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let state = expect_context::<AppSession>().state();
    let library = RwSignal::new(Vec::<OwnedGame>::new());
    let friends = RwSignal::new(Vec::<Friend>::new());
    let library_error = RwSignal::new(None::<String>);
    let friends_error = RwSignal::new(None::<String>);
    let tab = RwSignal::new(ProfileTab::Library);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let (owned, accepted) =
            futures::future::join(crate::net::api::fetch_owned_games(), crate::net::api::fetch_friends()).await;
        match owned {
            Ok(list) => library.set(list),
            Err(e) => library_error.set(Some(e.user_message("Failed to load library"))),
        }
        match accepted {
            Ok(list) => friends.set(list),
            Err(e) => friends_error.set(Some(e.user_message("Failed to load friends list"))),
        }
    });

    let name = {
        let state = state.clone();
        move || state.with(|s| s.display_name().unwrap_or_default().to_owned())
    };
    let capability = move || state.with(|s| s.capability().map(|c| c.label()).unwrap_or_default());

    view! {
        <div class="profile-page">
            <section class="profile-page__header">
                <span class="profile-page__avatar" aria-hidden="true"></span>
                <div>
                    <h2>{name}</h2>
                    <p class="profile-page__role">{capability}</p>
                </div>
            </section>
            <nav class="profile-page__tabs">
                <button
                    class="profile-page__tab"
                    class:profile-page__tab--active=move || tab.get() == ProfileTab::Library
                    on:click=move |_| tab.set(ProfileTab::Library)
                >
                    "Library"
                </button>
                <button
                    class="profile-page__tab"
                    class:profile-page__tab--active=move || tab.get() == ProfileTab::Friends
                    on:click=move |_| tab.set(ProfileTab::Friends)
                >
                    "Friends"
                </button>
            </nav>
            <Show when=move || tab.get() == ProfileTab::Library>
                <ListError error=library_error />
                <ul class="profile-page__list">
                    {move || {
                        library
                            .get()
                            .into_iter()
                            .map(|entry| {
                                let href = format!("/game/{}", entry.game_id);
                                let title = entry.name.unwrap_or_else(|| format!("Game #{}", entry.game_id));
                                let cover = entry.header_image_url.as_deref().map(asset_url);
                                view! {
                                    <li class="profile-page__item">
                                        {cover.map(|src| view! { <img class="profile-page__cover" src=src alt="" /> })}
                                        <A href=href>{title}</A>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
            <Show when=move || tab.get() == ProfileTab::Friends>
                <ListError error=friends_error />
                <ul class="profile-page__list">
                    {move || {
                        friends
                            .get()
                            .into_iter()
                            .map(|friend| {
                                view! {
                                    <li class="profile-page__item">
                                        <strong>{friend.username}</strong>
                                        <span class="profile-page__since">
                                            "Friends since " {short_date(friend.since.as_deref())}
                                        </span>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProfileTab {
    Library,
    Friends,
}

#[component]
fn ListError(error: RwSignal<Option<String>>) -> impl IntoView {
    move || error.get().map(|text| view! { <p class="page-error">{text}</p> })
}

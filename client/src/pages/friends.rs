//! Friends list with incoming/outgoing requests.

#[cfg(test)]
#[path = "friends_test.rs"]
mod friends_test;

use leptos::prelude::*;

use crate::components::notice::{Notice, NoticeBanner};
use crate::net::api::{ApiError, FriendsOverview};
use crate::net::types::FriendRequest;
use crate::util::format::short_date;

pub const LOAD_FAILED: &str = "Failed to load friends list";

/// Trim the add-friend input.
///
/// # Errors
///
/// Returns a warning when nothing but whitespace was entered.
pub fn validate_username(raw: &str) -> Result<String, &'static str> {
    let username = raw.trim();
    if username.is_empty() { Err("Enter a username") } else { Ok(username.to_owned()) }
}

#[must_use]
pub fn send_notice(username: &str, result: &Result<(), ApiError>) -> Notice {
    match result {
        Ok(()) => Notice::success(format!("Friend request sent to {username}!")),
        Err(err) => Notice::error(err.user_message("Failed to send request.")),
    }
}

#[must_use]
pub fn accept_notice(result: &Result<(), ApiError>) -> Notice {
    match result {
        Ok(()) => Notice::success("Friend request accepted!"),
        Err(_) => Notice::error("Failed to accept request"),
    }
}

/// Declining and cancelling share an endpoint; the backend says which
/// happened.
#[must_use]
pub fn reject_notice(result: &Result<Option<String>, ApiError>) -> Notice {
    match result {
        Ok(Some(message)) if !message.trim().is_empty() => Notice::success(message.clone()),
        Ok(_) => Notice::success("Request handled successfully!"),
        Err(_) => Notice::error("Failed to decline or cancel request"),
    }
}

#[must_use]
pub fn remove_notice(username: &str, result: &Result<(), ApiError>) -> Notice {
    match result {
        Ok(()) => Notice::success(format!("Removed {username} from your friends list.")),
        Err(err) => Notice::error(err.user_message("Failed to remove friend.")),
    }
}

#[component]
pub fn FriendsPage() -> impl IntoView {
    let overview = RwSignal::new(FriendsOverview::default());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(None::<Notice>);
    let new_friend = RwSignal::new(String::new());

    let reload = move || {
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_friends_overview().await {
                Ok(latest) => overview.set(latest),
                Err(e) => {
                    log::warn!("friends load failed: {e}");
                    notice.set(Some(Notice::error(LOAD_FAILED)));
                }
            }
            loading.set(false);
        });
    };

    #[cfg(feature = "hydrate")]
    reload();

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let username = match validate_username(&new_friend.get_untracked()) {
            Ok(username) => username,
            Err(message) => {
                notice.set(Some(Notice::warning(message)));
                return;
            }
        };
        leptos::task::spawn_local(async move {
            let result = crate::net::api::send_friend_request(&username).await;
            if result.is_ok() {
                new_friend.set(String::new());
                reload();
            }
            notice.set(Some(send_notice(&username, &result)));
        });
    };

    let on_accept = Callback::new(move |id: i64| {
        leptos::task::spawn_local(async move {
            let result = crate::net::api::accept_friend_request(id).await;
            if result.is_ok() {
                reload();
            }
            notice.set(Some(accept_notice(&result)));
        });
    });

    let on_reject = Callback::new(move |id: i64| {
        leptos::task::spawn_local(async move {
            let result = crate::net::api::reject_friend_request(id).await;
            if result.is_ok() {
                reload();
            }
            notice.set(Some(reject_notice(&result)));
        });
    });

    let on_remove = Callback::new(move |username: String| {
        leptos::task::spawn_local(async move {
            let result = crate::net::api::remove_friend(&username).await;
            if result.is_ok() {
                reload();
            }
            notice.set(Some(remove_notice(&username, &result)));
        });
    });

    view! {
        <div class="friends-page">
            <h2>"Friends"</h2>
            <NoticeBanner notice=notice />
            <form class="friends-page__add" on:submit=on_send>
                <input
                    class="friends-page__input"
                    type="text"
                    placeholder="Enter username"
                    prop:value=move || new_friend.get()
                    on:input=move |ev| new_friend.set(event_target_value(&ev))
                />
                <button class="btn btn--primary" type="submit">
                    "Send Request"
                </button>
            </form>
            <Show when=move || !loading.get() fallback=|| view! { <p class="page-loading">"Loading friends..."</p> }>
                <section class="friends-page__section">
                    <h3>"Your Friends"</h3>
                    <ul class="friends-page__list">
                        {move || {
                            overview
                                .with(|o| o.friends.clone())
                                .into_iter()
                                .map(|friend| {
                                    let target = friend.username.clone();
                                    view! {
                                        <li class="friends-page__item">
                                            <strong>{friend.username}</strong>
                                            <span class="friends-page__meta">
                                                "Since " {short_date(friend.since.as_deref())}
                                            </span>
                                            <button
                                                class="btn btn--danger"
                                                on:click=move |_| on_remove.run(target.clone())
                                            >
                                                "Remove"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </section>
                <section class="friends-page__section">
                    <h3>"Incoming Requests"</h3>
                    <RequestList
                        requests=Signal::derive(move || overview.with(|o| o.incoming.clone()))
                        primary=Some(("Accept", on_accept))
                        secondary=("Decline", on_reject)
                    />
                </section>
                <section class="friends-page__section">
                    <h3>"Sent Requests"</h3>
                    <RequestList
                        requests=Signal::derive(move || overview.with(|o| o.outgoing.clone()))
                        primary=None
                        secondary=("Cancel", on_reject)
                    />
                </section>
            </Show>
        </div>
    }
}

#[component]
fn RequestList(
    requests: Signal<Vec<FriendRequest>>,
    primary: Option<(&'static str, Callback<i64>)>,
    secondary: (&'static str, Callback<i64>),
) -> impl IntoView {
    view! {
        <ul class="friends-page__list">
            {move || {
                requests
                    .get()
                    .into_iter()
                    .map(|request| {
                        let id = request.id;
                        view! {
                            <li class="friends-page__item">
                                <strong>{request.username}</strong>
                                <span class="friends-page__meta">"Sent " {short_date(request.sent_at.as_deref())}</span>
                                {primary
                                    .map(|(label, action)| {
                                        view! {
                                            <button class="btn btn--primary" on:click=move |_| action.run(id)>
                                                {label}
                                            </button>
                                        }
                                    })}
                                <button class="btn" on:click=move |_| secondary.1.run(id)>
                                    {secondary.0}
                                </button>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

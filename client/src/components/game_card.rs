//! Catalog card linking to a game's detail page.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::api::asset_url;
use crate::net::types::Game;
use crate::util::format::card_price_label;

/// Shown when a listing has no header image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200";

#[component]
pub fn GameCard(game: Game) -> impl IntoView {
    let href = format!("/game/{}", game.game_id);
    let image = game.header_image_url.as_deref().map_or_else(|| PLACEHOLDER_IMAGE.to_owned(), asset_url);
    let description = game
        .short_description
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "No description".to_owned());
    let price = card_price_label(game.price);

    view! {
        <div class="game-card">
            <A href=href>
                <img class="game-card__cover" src=image alt=game.name.clone() />
                <div class="game-card__body">
                    <h3 class="game-card__name">{game.name}</h3>
                    <p class="game-card__description">{description}</p>
                    <strong class="game-card__price">{price}</strong>
                </div>
            </A>
        </div>
    }
}

use super::*;

fn filled_form() -> GameForm {
    GameForm {
        name: "  Hades ".to_owned(),
        price: "24.99".to_owned(),
        categories: "Action, ,Roguelike ".to_owned(),
        tags: "indie".to_owned(),
        release_date: "2020-09-17".to_owned(),
        is_published: true,
        ..GameForm::default()
    }
}

#[test]
fn parse_price_accepts_blank_as_free() {
    assert_eq!(parse_price(""), Ok(0.0));
    assert_eq!(parse_price("   "), Ok(0.0));
}

#[test]
fn parse_price_accepts_non_negative_numbers() {
    assert_eq!(parse_price("0"), Ok(0.0));
    assert_eq!(parse_price(" 19.5 "), Ok(19.5));
}

#[test]
fn parse_price_rejects_negative_and_garbage() {
    for raw in ["-1", "abc", "NaN", "inf"] {
        assert_eq!(parse_price(raw), Err("Price must be a non-negative number"), "raw={raw}");
    }
}

#[test]
fn normalize_list_trims_and_joins() {
    assert_eq!(normalize_list(" Action,RPG ,, Indie"), "Action, RPG, Indie");
    assert_eq!(normalize_list(""), "");
}

#[test]
fn to_input_builds_payload() {
    let input = filled_form().to_input().expect("valid form");
    assert_eq!(input.name, "Hades");
    assert!((input.price - 24.99).abs() < f64::EPSILON);
    assert_eq!(input.categories, "Action, Roguelike");
    assert_eq!(input.release_date.as_deref(), Some("2020-09-17"));
    assert!(input.is_published);
    assert!(!input.is_featured);
}

#[test]
fn to_input_requires_name() {
    let form = GameForm { name: "  ".to_owned(), ..filled_form() };
    assert_eq!(form.to_input(), Err("Name is required"));
}

#[test]
fn to_input_rejects_bad_price() {
    let form = GameForm { price: "-3".to_owned(), ..filled_form() };
    assert_eq!(form.to_input(), Err("Price must be a non-negative number"));
}

#[test]
fn to_input_omits_blank_release_date() {
    let form = GameForm { release_date: " ".to_owned(), ..filled_form() };
    assert_eq!(form.to_input().expect("valid form").release_date, None);
}

#[test]
fn from_game_prefills_every_field() {
    let game: Game = serde_json::from_value(serde_json::json!({
        "gameId": 3,
        "name": "Celeste",
        "price": 19.99,
        "developer": "Maddy Makes Games",
        "tags": "platformer",
        "releaseDate": "2018-01-25T00:00:00",
        "isFeatured": true
    }))
    .expect("valid game json");

    let form = GameForm::from_game(&game);
    assert_eq!(form.name, "Celeste");
    assert_eq!(form.price, "19.99");
    assert_eq!(form.developer, "Maddy Makes Games");
    assert_eq!(form.publisher, "");
    assert_eq!(form.release_date, "2018-01-25");
    assert!(form.is_featured);
    assert_eq!(form.to_input().expect("round trips").tags, "platformer");
}

#[test]
fn delete_needs_request_then_confirm() {
    let armed = DeleteConfirm::default().request();
    assert_eq!(armed, DeleteConfirm::Armed);
    assert_eq!(armed.confirm(), (DeleteConfirm::Idle, true));
}

#[test]
fn confirm_without_request_does_not_delete() {
    assert_eq!(DeleteConfirm::Idle.confirm(), (DeleteConfirm::Idle, false));
}

#[test]
fn cancel_disarms_the_row() {
    let state = DeleteConfirm::Idle.request().cancel();
    assert_eq!(state, DeleteConfirm::Idle);
    assert_eq!(state.confirm(), (DeleteConfirm::Idle, false));
}

use super::*;

#[test]
fn page_title_capitalizes_first_segment() {
    assert_eq!(page_title("/dashboard"), "Dashboard");
    assert_eq!(page_title("/game/42"), "Game");
    assert_eq!(page_title("/friends/"), "Friends");
}

#[test]
fn page_title_defaults_to_home_for_root() {
    assert_eq!(page_title("/"), "Home");
    assert_eq!(page_title(""), "Home");
}

#[test]
fn is_active_matches_exact_and_nested_paths() {
    assert!(is_active("/home", "/home"));
    assert!(is_active("/profile", "/profile/settings"));
    assert!(!is_active("/home", "/homework"));
    assert!(!is_active("/dashboard", "/home"));
}

#[test]
fn is_active_treats_root_as_home() {
    assert!(is_active("/home", "/"));
    assert!(!is_active("/friends", "/"));
}

#[test]
fn nav_items_cover_every_routed_section() {
    let paths: Vec<&str> = NAV_ITEMS.iter().map(|(path, _)| *path).collect();
    assert_eq!(paths, ["/home", "/dashboard", "/profile", "/friends"]);
}

use super::*;

#[test]
fn validate_login_input_trims_username_only() {
    assert_eq!(
        validate_login_input("  alice ", " secret  "),
        Ok(("alice".to_owned(), " secret  ".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_username_first() {
    assert_eq!(validate_login_input("   ", ""), Err("Please input your username!"));
    assert_eq!(validate_login_input("", "secret"), Err("Please input your username!"));
}

#[test]
fn validate_login_input_requires_password() {
    assert_eq!(validate_login_input("alice", ""), Err("Please input your password!"));
    assert_eq!(validate_login_input("alice", "   "), Err("Please input your password!"));
}

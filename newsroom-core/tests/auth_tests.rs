use newsroom_core::auth;

#[test]
fn password_error_enumerates_missing_requirements() {
    let message = auth::password_error("abc").expect("weak password");
    assert!(message.starts_with("Password must contain"));
    assert!(message.contains("at least 8 characters"));
    assert!(message.contains("an uppercase letter"));
    assert!(message.contains("a number"));
    assert!(message.contains("a special character"));
    // "abc" already has lowercase letters.
    assert!(!message.contains("a lowercase letter"));
}

#[test]
fn acceptable_password_produces_no_error() {
    assert!(auth::password_error("Test@1234").is_none());
}

#[test]
fn email_shape_validation() {
    assert!(auth::validate_email("user@example.com"));
    assert!(auth::validate_email("first.last@mail.co.uk"));

    assert!(!auth::validate_email("bademail"));
    assert!(!auth::validate_email("user@nodot"));
    assert!(!auth::validate_email("user name@example.com"));
    assert!(!auth::validate_email("@example.com"));
    assert!(!auth::validate_email("user@.com"));
    assert!(!auth::validate_email("user@example."));
}

#[test]
fn password_hash_round_trip() {
    let hash = auth::hash_password("Test@1234").expect("hash");
    assert!(auth::verify_password("Test@1234", &hash).expect("verify"));
    assert!(!auth::verify_password("WrongPass123!", &hash).expect("verify"));
}

#[test]
fn token_round_trip_accepts_bearer_prefix() {
    let token = auth::issue_token("secret", "u1", "a@example.com").expect("issue");

    let claims = auth::verify_token("secret", &token).expect("bare token");
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email, "a@example.com");

    let claims = auth::verify_token("secret", &format!("Bearer {token}")).expect("with prefix");
    assert_eq!(claims.sub, "u1");

    assert!(auth::verify_token("other-secret", &token).is_err());
    assert!(auth::verify_token("secret", "not-a-token").is_err());
}

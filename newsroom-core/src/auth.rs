use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access denied. No token provided.")]
    MissingToken,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token signing failed: {0}")]
    Sign(jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

pub fn issue_token(secret: &str, user_id: &str, email: &str) -> Result<String, AuthError> {
    let claims = Claims {
        sub: user_id.to_owned(),
        email: email.to_owned(),
        exp: Utc::now().timestamp() + TOKEN_LIFETIME_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Sign)
}

/// Accepts the raw `Authorization` value, with or without a `Bearer ` prefix.
pub fn verify_token(secret: &str, header_value: &str) -> Result<Claims, AuthError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Shape check for `local@domain.tld`: exactly one `@`, a dotted domain,
/// no whitespace anywhere.
pub fn validate_email(email: &str) -> bool {
    fn part_ok(part: &str) -> bool {
        !part.is_empty() && !part.chars().any(|ch| ch.is_whitespace() || ch == '@')
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    part_ok(local) && part_ok(host) && part_ok(tld)
}

/// `None` when the password is acceptable; otherwise a message listing
/// every missing requirement.
pub fn password_error(password: &str) -> Option<String> {
    let mut missing = Vec::new();
    if password.chars().count() < 8 {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|ch| ch.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|ch| ch.is_ascii_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        missing.push("a number");
    }
    if !password.chars().any(|ch| !ch.is_ascii_alphanumeric()) {
        missing.push("a special character");
    }
    if missing.is_empty() {
        None
    } else {
        Some(format!("Password must contain {}.", missing.join(", ")))
    }
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_core::auth;
use newsroom_core::{Article, HeadlinesView, NewsError, Preferences, User};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// Fields arrive as options so a missing field yields the API's own 400
// message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub preferences: Option<Preferences>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            preferences: user.preferences,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: PublicUser,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(body.username),
        non_empty(body.email),
        non_empty(body.password),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };
    if !auth::validate_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if let Some(message) = auth::password_error(&password) {
        return Err(ApiError::bad_request(message));
    }

    let user = User {
        id: Utc::now().timestamp_millis().to_string(),
        username,
        email,
        password: auth::hash_password(&password)?,
        preferences: Some(Preferences::default()),
    };
    state.users.create(user.clone()).await?;
    info!(email = %user.email, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_owned(),
            data: user.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(body.email), non_empty(body.password)) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };
    if !auth::validate_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }

    let Some(user) = state.users.find_by_email(&email).await else {
        return Err(ApiError::bad_request("Invalid credentials"));
    };
    if !auth::verify_password(&password, &user.password)? {
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    let token = auth::issue_token(&state.jwt_secret, &user.id, &user.email)?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_owned(),
        token,
    }))
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: Option<Preferences>,
}

pub async fn get_preferences(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let record = state
        .users
        .find_by_id(&user.user_id)
        .await
        .ok_or(NewsError::UserNotFound)?;
    Ok(Json(PreferencesResponse {
        preferences: record.preferences,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub categories: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdatePreferencesResponse {
    pub message: String,
    pub preferences: Preferences,
}

pub async fn update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<UpdatePreferencesRequest>,
) -> Result<Json<UpdatePreferencesResponse>, ApiError> {
    let (Some(categories), Some(languages)) = (body.categories, body.languages) else {
        return Err(NewsError::InvalidPreferences.into());
    };
    let preferences = state
        .users
        .update_preferences(
            &user.user_id,
            Preferences {
                categories,
                languages,
            },
        )
        .await?;
    Ok(Json(UpdatePreferencesResponse {
        message: "Preferences updated successfully".to_owned(),
        preferences,
    }))
}

pub async fn get_news(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<HeadlinesView>, ApiError> {
    let view = state.cache.get_headlines(&user.user_id).await?;
    Ok(Json(view))
}

pub async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Json<MessageResponse> {
    state.cache.mark_read(&id).await;
    Json(MessageResponse {
        message: format!("Article {id} marked as read"),
    })
}

pub async fn mark_favorite(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Json<MessageResponse> {
    state.cache.mark_favorite(&id).await;
    Json(MessageResponse {
        message: format!("Article {id} marked as favorite"),
    })
}

pub async fn read_articles(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<Vec<Article>> {
    Json(state.cache.read_articles().await)
}

pub async fn favorite_articles(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<Vec<Article>> {
    Json(state.cache.favorite_articles().await)
}

pub async fn search_news(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.cache.search(&keyword).await?))
}

use std::path::PathBuf;

use newsroom_core::{NewsError, Preferences, User, UserStore};

fn temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "newsroom_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

fn sample_user(id: &str, email: &str) -> User {
    User {
        id: id.into(),
        username: "Sample".into(),
        email: email.into(),
        password: "hash".into(),
        preferences: Some(Preferences::default()),
    }
}

#[tokio::test]
async fn store_persists_users_and_preferences_across_reloads() {
    let dir = temp_dir("store");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("users.json");

    let store = UserStore::load_from(&path).await;
    store
        .create(sample_user("u1", "a@example.com"))
        .await
        .expect("create user");
    store
        .update_preferences(
            "u1",
            Preferences {
                categories: vec!["science".into()],
                languages: vec!["de".into()],
            },
        )
        .await
        .expect("update preferences");

    let reloaded = UserStore::load_from(&path).await;
    let user = reloaded
        .find_by_email("a@example.com")
        .await
        .expect("user on disk");
    assert_eq!(user.id, "u1");
    let prefs = reloaded.preferences("u1").await.expect("preferences");
    assert_eq!(prefs.categories, vec!["science".to_owned()]);
    assert_eq!(prefs.languages, vec!["de".to_owned()]);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = UserStore::in_memory();
    store
        .create(sample_user("u1", "a@example.com"))
        .await
        .expect("first create");
    let err = store
        .create(sample_user("u2", "a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, NewsError::UserExists));
}

#[tokio::test]
async fn preference_validation_rejects_empty_strings() {
    let store = UserStore::in_memory();
    store
        .create(sample_user("u1", "a@example.com"))
        .await
        .expect("create user");

    let err = store
        .update_preferences(
            "u1",
            Preferences {
                categories: vec!["ok".into(), String::new()],
                languages: vec!["en".into()],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NewsError::InvalidPreferences));
}

#[tokio::test]
async fn load_falls_back_to_tmp_file_on_corruption() {
    let dir = temp_dir("corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("users.json");

    tokio::fs::write(&path, b"{ this is not json ")
        .await
        .unwrap();
    let users = vec![sample_user("u1", "a@example.com")];
    let bytes = serde_json::to_vec(&users).unwrap();
    tokio::fs::write(dir.join("users.json.tmp"), bytes)
        .await
        .unwrap();

    let store = UserStore::load_from(&path).await;
    let user = store.find_by_email("a@example.com").await;
    assert!(
        user.is_some(),
        "should fall back to tmp file when main is corrupted"
    );

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

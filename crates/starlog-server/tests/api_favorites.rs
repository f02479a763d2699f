mod common;

use axum::http::StatusCode;
use common::{send, setup_app, signup};

#[tokio::test]
async fn add_list_and_remove_favorites() {
    let (_dir, app, _pool) = setup_app();
    let user = signup(&app, "rey").await;

    let (status, fav) = send(
        &app,
        "POST",
        &format!("/api/users/{user}/favorites/planets/2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fav["planet_id"], 2);
    assert_eq!(fav["planet_name"], "Hoth");
    assert_eq!(fav["user_id"], user);
    assert!(fav["added_date"].is_string());

    let (status, fav) = send(
        &app,
        "POST",
        &format!("/api/users/{user}/favorites/character/3"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fav["character_name"], "Yoda");

    let (status, all) = send(&app, "GET", &format!("/api/users/{user}/favorites"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["planets"].as_array().unwrap().len(), 1);
    assert_eq!(all["characters"][0]["character_id"], 3);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{user}/favorites/planets/2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, all) = send(&app, "GET", &format!("/api/users/{user}/favorites"), None).await;
    assert!(all["planets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn favorite_errors_map_to_statuses() {
    let (_dir, app, _pool) = setup_app();
    let user = signup(&app, "poe").await;

    let uri = format!("/api/users/{user}/favorites/planets/1");
    assert_eq!(send(&app, "POST", &uri, None).await.0, StatusCode::CREATED);
    assert_eq!(send(&app, "POST", &uri, None).await.0, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/users/{user}/favorites/starships/1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("unknown favorite kind: starships"));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .ends_with("Expected one of: planets, characters"));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/users/{user}/favorites/characters/404"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/users/9999/favorites/planets/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{user}/favorites/characters/1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/users/9999/favorites", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_account_cascades_favorites() {
    let (_dir, app, pool) = setup_app();
    let user = signup(&app, "finn").await;

    send(&app, "POST", &format!("/api/users/{user}/favorites/planets/1"), None).await;
    send(&app, "POST", &format!("/api/users/{user}/favorites/characters/1"), None).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{user}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let conn = pool.get().unwrap();
    let remaining: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM favorite_planet WHERE user_id = ?1)
                  + (SELECT COUNT(*) FROM favorite_character WHERE user_id = ?1)",
            [user],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

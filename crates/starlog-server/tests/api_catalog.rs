mod common;

use axum::http::StatusCode;
use common::{send, setup_app};

#[tokio::test]
async fn list_planets_and_characters() {
    let (_dir, app, _pool) = setup_app();

    let (status, planets) = send(&app, "GET", "/api/planets", None).await;
    assert_eq!(status, StatusCode::OK);
    let planets = planets.as_array().unwrap();
    assert_eq!(planets.len(), 2);
    assert_eq!(planets[0]["name"], "Tatooine");
    assert_eq!(planets[0]["climate"], "arid");
    assert!(planets[1]["terrain"].is_null());

    let (status, characters) = send(&app, "GET", "/api/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    let characters = characters.as_array().unwrap();
    assert_eq!(characters.len(), 3);
    assert_eq!(characters[0]["homeworld_name"], "Tatooine");
    assert!(characters[2]["homeworld_id"].is_null());
}

#[tokio::test]
async fn get_single_records() {
    let (_dir, app, _pool) = setup_app();

    let (status, planet) = send(&app, "GET", "/api/planets/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(planet["name"], "Tatooine");

    let (status, character) = send(&app, "GET", "/api/characters/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(character["name"], "Luke Skywalker");
    assert_eq!(character["height"], "172");

    let (status, _) = send(&app, "GET", "/api/planets/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/characters/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn native_characters_of_planet() {
    let (_dir, app, _pool) = setup_app();

    let (status, natives) = send(&app, "GET", "/api/planets/1/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = natives
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Luke Skywalker", "Owen Lars"]);

    let (status, natives) = send(&app, "GET", "/api/planets/2/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(natives.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "GET", "/api/planets/42/characters", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

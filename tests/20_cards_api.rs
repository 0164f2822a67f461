mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_card(server: &common::TestServer, user: &str, pass: &str, body: Value) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/cards", server.base_url))
        .basic_auth(user, Some(pass))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res
        .headers()
        .get("Location")
        .context("missing Location header")?
        .to_str()?
        .to_string();
    Ok(location)
}

#[tokio::test]
async fn create_then_fetch_via_location_header() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let location = create_card(server, "sarah1", "abc123", json!({ "amount": 250.00 })).await?;
    assert!(location.starts_with("/cards/"));

    let res = client
        .get(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let card = res.json::<Value>().await?;
    assert!(card["id"].as_i64().is_some());
    assert_eq!(card["amount"].as_f64(), Some(250.00));
    assert_eq!(card["owner"].as_str(), Some("sarah1"));
    Ok(())
}

#[tokio::test]
async fn create_ignores_caller_supplied_id_and_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let location = create_card(
        server,
        "sarah1",
        "abc123",
        json!({ "id": 987654, "amount": 55.50, "owner": "kumar2" }),
    )
    .await?;
    assert_ne!(location, "/cards/987654");

    let res = client
        .get(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let card = res.json::<Value>().await?;
    assert_eq!(card["owner"].as_str(), Some("sarah1"));
    assert_eq!(card["amount"].as_f64(), Some(55.50));
    Ok(())
}

#[tokio::test]
async fn update_replaces_amount_of_an_owned_card() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let location = create_card(server, "sarah1", "abc123", json!({ "amount": 100.00 })).await?;

    let res = client
        .put(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .json(&json!({ "amount": 19.99 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.content_length().unwrap_or(0) == 0);

    let res = client
        .get(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    let card = res.json::<Value>().await?;
    assert_eq!(card["amount"].as_f64(), Some(19.99));
    assert_eq!(card["owner"].as_str(), Some("sarah1"));
    Ok(())
}

#[tokio::test]
async fn update_of_missing_or_foreign_card_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/cards/99999", server.base_url))
        .basic_auth("sarah1", Some("abc123"))
        .json(&json!({ "amount": 19.99 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // card 102 belongs to kumar2; sarah1 sees 404, not 403
    let res = client
        .put(format!("{}/cards/102", server.base_url))
        .basic_auth("sarah1", Some("abc123"))
        .json(&json!({ "amount": 333.33 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // and kumar2's card is unchanged
    let res = client
        .get(format!("{}/cards/102", server.base_url))
        .basic_auth("kumar2", Some("xyz789"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let card = res.json::<Value>().await?;
    assert_eq!(card["amount"].as_f64(), Some(200.00));
    Ok(())
}

#[tokio::test]
async fn cross_owner_reads_look_like_missing_cards() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/cards/102", server.base_url))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/cards/99999", server.base_url))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent_only_in_its_effect() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let location = create_card(server, "sarah1", "abc123", json!({ "amount": 42.00 })).await?;

    let res = client
        .delete(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // a second delete reports the card as gone rather than succeeding again
    let res = client
        .delete(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_cannot_touch_foreign_cards() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let location = create_card(server, "kumar2", "xyz789", json!({ "amount": 77.00 })).await?;

    let res = client
        .delete(format!("{}{}", server.base_url, location))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // still there for its owner
    let res = client
        .get(format!("{}{}", server.base_url, location))
        .basic_auth("kumar2", Some("xyz789"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn non_numeric_card_ids_are_bad_requests() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/cards/not-a-number", server.base_url))
        .basic_auth("sarah1", Some("abc123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use book_review_api::auth::TokenService;

#[tokio::test]
async fn review_is_attached_to_book() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;
    let book_id = server.create_book(&user, "Dune", "Frank Herbert", "SciFi").await?;

    let res = server.review(&user, &book_id, 5, "A classic").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let review: Value = res.json().await?;
    assert_eq!(review["data"]["bookId"], book_id.as_str());
    assert_eq!(review["data"]["userId"], user.id.as_str());
    assert_eq!(review["data"]["rating"], 5);

    let body: Value = server.get(&format!("/books/{}", book_id)).await?.json().await?;
    let reviews = body["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "A classic");
    Ok(())
}

#[tokio::test]
async fn second_review_by_same_user_is_a_conflict() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;
    let book_id = server.create_book(&user, "Dune", "Frank Herbert", "SciFi").await?;

    assert_eq!(server.review(&user, &book_id, 4, "first").await?.status(), StatusCode::CREATED);
    let res = server.review(&user, &book_id, 2, "second").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::error_code(res).await?, "CONFLICT");

    let body: Value = server.get(&format!("/books/{}", book_id)).await?.json().await?;
    let reviews = body["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "first");
    Ok(())
}

#[tokio::test]
async fn different_users_may_review_same_book() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let ada = server.create_user("ada@example.com").await?;
    let bob = server.create_user("bob@example.com").await?;
    let book_id = server.create_book(&ada, "Dune", "Frank Herbert", "SciFi").await?;

    assert_eq!(server.review(&ada, &book_id, 5, "loved it").await?.status(), StatusCode::CREATED);
    assert_eq!(server.review(&bob, &book_id, 3, "fine").await?.status(), StatusCode::CREATED);

    let body: Value = server.get(&format!("/books/{}", book_id)).await?.json().await?;
    let comments: Vec<&str> = body["data"]["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["comment"].as_str())
        .collect();
    assert_eq!(comments, vec!["loved it", "fine"]);
    Ok(())
}

#[tokio::test]
async fn review_input_is_validated() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;
    let book_id = server.create_book(&user, "Dune", "Frank Herbert", "SciFi").await?;

    for body in [
        json!({ "comment": "no rating" }),
        json!({ "rating": 4 }),
        json!({ "rating": 0, "comment": "too low" }),
        json!({ "rating": 6, "comment": "too high" }),
    ] {
        let res = server
            .post_json(&format!("/books/{}/reviews", book_id), Some(&user.token), &body)
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "accepted {}", body);
        assert_eq!(common::error_code(res).await?, "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn review_for_missing_book_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;

    let res = server
        .review(&user, "7d3f9c7e-3c55-4b5e-9a59-3f9a3c1f5e11", 3, "ghost")
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn owner_can_update_and_delete() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;
    let book_id = server.create_book(&user, "Dune", "Frank Herbert", "SciFi").await?;
    let created: Value = server.review(&user, &book_id, 2, "slow start").await?.json().await?;
    let review_id = created["data"]["id"].as_str().unwrap().to_string();

    let res = server
        .put_json(
            &format!("/reviews/{}", review_id),
            &user.token,
            &json!({ "rating": 4, "comment": "grew on me" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["data"]["rating"], 4);
    assert_eq!(updated["data"]["comment"], "grew on me");

    let res = server.delete(&format!("/reviews/{}", review_id), &user.token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = res.json().await?;
    assert_eq!(deleted["data"]["id"], review_id.as_str());

    let res = server.delete(&format!("/reviews/{}", review_id), &user.token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Deleting frees the slot for a new review.
    assert_eq!(server.review(&user, &book_id, 5, "again").await?.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn non_owner_is_forbidden_and_review_is_unchanged() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let owner = server.create_user("owner@example.com").await?;
    let other = server.create_user("other@example.com").await?;
    let book_id = server.create_book(&owner, "Dune", "Frank Herbert", "SciFi").await?;
    let created: Value = server.review(&owner, &book_id, 3, "mine").await?.json().await?;
    let review_id = created["data"]["id"].as_str().unwrap().to_string();

    let res = server
        .put_json(
            &format!("/reviews/{}", review_id),
            &other.token,
            &json!({ "rating": 1, "comment": "hijacked" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(common::error_code(res).await?, "FORBIDDEN");

    let res = server.delete(&format!("/reviews/{}", review_id), &other.token).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = server.get(&format!("/books/{}", book_id)).await?.json().await?;
    let reviews = body["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 3);
    assert_eq!(reviews[0]["comment"], "mine");
    Ok(())
}

#[tokio::test]
async fn missing_review_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;

    let res = server
        .put_json(
            "/reviews/7d3f9c7e-3c55-4b5e-9a59-3f9a3c1f5e11",
            &user.token,
            &json!({ "rating": 3, "comment": "?" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.delete("/reviews/not-a-uuid", &user.token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn token_for_deleted_account_cannot_review() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let user = server.create_user("ada@example.com").await?;
    let book_id = server.create_book(&user, "Dune", "Frank Herbert", "SciFi").await?;

    // Same secret as the test server, but the account was never stored.
    let tokens = TokenService::new("test-secret", 1);
    let ghost = Uuid::new_v4();
    let stale = common::TestUser {
        id: ghost.to_string(),
        email: "gone@example.com".to_string(),
        token: tokens.issue(ghost, "gone@example.com")?,
    };

    let res = server.review(&stale, &book_id, 4, "from beyond").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::error_code(res).await?, "UNAUTHORIZED");

    let body: Value = server.get(&format!("/books/{}", book_id)).await?.json().await?;
    assert_eq!(body["data"]["reviews"], json!([]));
    Ok(())
}

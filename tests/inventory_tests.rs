mod common;

use axum::http::StatusCode;
use common::{json_request, spawn_app};
use futures::future::join_all;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_purchases_never_oversell() {
    let app = spawn_app().await;
    let admin = app.user_token("admin@example.com", true).await;
    let user = app.user_token("user@example.com", false).await;

    let sweet = app
        .create_sweet(
            &admin,
            json!({"name": "Rare Truffle", "category": "Chocolate", "price": 3.0, "quantity": 10}),
        )
        .await;
    let id = sweet["id"].as_i64().unwrap();

    let attempts = (0..10).map(|_| {
        let router = app.router.clone();
        let request = json_request(
            "POST",
            &format!("/api/sweets/{id}/purchase"),
            Some(&user),
            Some(json!({"quantity": 3})),
        );
        tokio::spawn(async move {
            use tower::ServiceExt;
            router.oneshot(request).await.unwrap().status()
        })
    });

    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let succeeded = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();
    assert_eq!(succeeded, 3, "{statuses:?}");
    assert_eq!(rejected, 7, "{statuses:?}");

    let (_, current) = app
        .request("GET", &format!("/api/sweets/{id}"), Some(&user), None)
        .await;
    assert_eq!(current["quantity"], 1);

    let (_, purchases) = app.request("GET", "/api/purchases", Some(&user), None).await;
    assert_eq!(purchases.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_purchase_then_restock_restores_quantity() {
    let app = spawn_app().await;
    let admin = app.user_token("admin@example.com", true).await;

    let sweet = app
        .create_sweet(
            &admin,
            json!({"name": "Sherbet", "category": "Powder", "price": 0.8, "quantity": 12}),
        )
        .await;
    let id = sweet["id"].as_i64().unwrap();

    for amount in [1, 5, 12] {
        let (status, _) = app
            .request(
                "POST",
                &format!("/api/sweets/{id}/purchase"),
                Some(&admin),
                Some(json!({"quantity": amount})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .request(
                "POST",
                &format!("/api/sweets/{id}/restock"),
                Some(&admin),
                Some(json!({"amount": amount})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sweet"]["quantity"], 12);
    }
}

#[tokio::test]
async fn test_draining_stock_to_zero() {
    let app = spawn_app().await;
    let admin = app.user_token("admin@example.com", true).await;

    let sweet = app
        .create_sweet(
            &admin,
            json!({"name": "Licorice", "category": "Chewy", "price": 1.1, "quantity": 2}),
        )
        .await;
    let id = sweet["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/sweets/{id}/purchase"),
            Some(&admin),
            Some(json!({"quantity": "2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sweet"]["quantity"], 0);

    let (status, body) = app
        .request("POST", &format!("/api/sweets/{id}/purchase"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InsufficientStock");
    assert_eq!(body["available"], 0);
}

#[tokio::test]
async fn test_restock_past_the_stock_limit_is_rejected() {
    let app = spawn_app().await;
    let admin = app.user_token("admin@example.com", true).await;

    let near_max = i64::MAX - 5;
    let sweet = app
        .create_sweet(
            &admin,
            json!({"name": "Bottomless Jar", "category": "Jelly Beans", "price": 0.1, "quantity": near_max}),
        )
        .await;
    let id = sweet["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/sweets/{id}/restock"),
            Some(&admin),
            Some(json!({"amount": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "ValidationError");

    let (_, sweet) = app
        .request("GET", &format!("/api/sweets/{id}"), Some(&admin), None)
        .await;
    assert_eq!(sweet["quantity"], near_max);

    let (status, sweet) = app
        .request(
            "POST",
            &format!("/api/sweets/{id}/restock"),
            Some(&admin),
            Some(json!({"amount": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sweet["sweet"]["quantity"], i64::MAX);
}

use super::*;
use crate::api::auth::UserIdTokens;
use crate::models::UserId;
use crate::testing::Fixture;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

fn make_app(fx: &Fixture) -> Router {
    router(Arc::new(AppState {
        market: fx.market.clone(),
        tokens: Arc::new(UserIdTokens::new(fx.store.clone())),
    }))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<UserId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let fx = Fixture::new().await;
    let (status, body) = call(&make_app(&fx), "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn protected_routes_need_a_known_token() {
    let fx = Fixture::new().await;
    let app = make_app(&fx);
    let uri = format!("/api/properties/{}/bid", fx.property.id);

    let (status, body) = call(&app, "POST", &uri, None, Some(json!({ "amount": 10 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");

    let (status, _) = call(
        &app,
        "POST",
        &uri,
        Some(UserId::new()),
        Some(json!({ "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_ids_get_a_json_message() {
    let fx = Fixture::new().await;
    let (status, body) = call(
        &make_app(&fx),
        "GET",
        "/api/properties/not-a-uuid/bids",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn bidding_and_booking_flow() {
    let fx = Fixture::new().await;
    let app = make_app(&fx);
    let rival = fx.add_buyer("rival").await;
    let property = fx.property.id;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/properties/{property}/bid"),
        Some(rival.id),
        Some(json!({ "amount": 200000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["bidderProfile"]["username"], "rival");

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/properties/{property}/bid"),
        Some(fx.seller.id),
        Some(json!({ "amount": 300000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot bid on your own property");

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/properties/{property}/bids"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["highestBid"], 200000.0);
    assert_eq!(body["minimumBid"], 0.0);

    let booking = |amount: f64| {
        json!({
            "propertyId": property,
            "appointmentDate": "2026-06-01",
            "appointmentTime": "10:00",
            "bidAmount": amount,
            "notes": "Evening works too",
        })
    };

    let (status, body) = call(
        &app,
        "POST",
        "/api/appointments",
        Some(fx.buyer.id),
        Some(booking(179_999.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("competitive"));

    let (status, body) = call(
        &app,
        "POST",
        "/api/appointments",
        Some(fx.buyer.id),
        Some(booking(180_000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["sellerProfile"]["username"], "seller");
    let appointment = body["id"].as_str().unwrap().to_string();

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/properties/{property}/appointments"),
        None,
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let status_uri = format!("/api/appointments/{appointment}/status");
    let (status, _) = call(
        &app,
        "PATCH",
        &status_uri,
        Some(fx.buyer.id),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "PATCH",
        &status_uri,
        Some(fx.seller.id),
        Some(json!({ "status": "sold" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status");

    let (status, body) = call(
        &app,
        "PATCH",
        &status_uri,
        Some(fx.seller.id),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, body) = call(
        &app,
        "GET",
        "/api/appointments?role=buyer",
        Some(fx.buyer.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = call(
        &app,
        "GET",
        "/api/appointments?role=seller",
        Some(fx.buyer.id),
        None,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/appointments/{appointment}"),
        Some(rival.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "DELETE",
        &format!("/api/appointments/{appointment}"),
        Some(fx.buyer.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Appointment cancelled successfully");

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/properties/{property}/appointments"),
        None,
        None,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reviews_update_the_public_profile() {
    let fx = Fixture::new().await;
    let app = make_app(&fx);
    let review = json!({
        "sellerId": fx.seller.id,
        "propertyId": fx.property.id,
        "rating": 4,
        "comment": "Smooth viewing",
    });

    let (status, body) = call(
        &app,
        "POST",
        "/api/reviews",
        Some(fx.buyer.id),
        Some(review.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reviewType"], "both");
    assert_eq!(body["buyerProfile"]["username"], "buyer");

    let (status, body) = call(&app, "POST", "/api/reviews", Some(fx.buyer.id), Some(review)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have already reviewed this property");

    let (_, body) = call(&app, "GET", &format!("/api/users/{}", fx.seller.id), None, None).await;
    assert_eq!(body["averageRating"], 4.0);
    assert_eq!(body["totalSales"], 1);

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/reviews/property/{}", fx.property.id),
        None,
        None,
    )
    .await;
    assert_eq!(body["totalReviews"], 1);
    assert_eq!(body["averageRating"], 4.0);

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/reviews/seller/{}", fx.seller.id),
        None,
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn notification_inbox_round() {
    let fx = Fixture::new().await;
    let app = make_app(&fx);
    for amount in [100, 200, 300] {
        call(
            &app,
            "POST",
            &format!("/api/properties/{}/bid", fx.property.id),
            Some(fx.buyer.id),
            Some(json!({ "amount": amount })),
        )
        .await;
    }

    let (status, body) = call(
        &app,
        "GET",
        "/api/notifications?limit=2",
        Some(fx.seller.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 2);
    assert_eq!(body["unreadCount"], 3);
    let first = body["notifications"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/api/notifications/{first}/read"),
        Some(fx.buyer.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/notifications/{first}/read"),
        Some(fx.seller.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRead"], true);

    let (_, body) = call(
        &app,
        "PATCH",
        "/api/notifications/read-all",
        Some(fx.seller.id),
        None,
    )
    .await;
    assert_eq!(body["updated"], 2);

    let (_, body) = call(
        &app,
        "GET",
        "/api/notifications?unreadOnly=true",
        Some(fx.seller.id),
        None,
    )
    .await;
    assert!(body["notifications"].as_array().unwrap().is_empty());
    assert_eq!(body["unreadCount"], 0);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/notifications/{first}"),
        Some(fx.seller.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "DELETE", "/api/notifications", Some(fx.seller.id), None).await;
    assert_eq!(body["deleted"], 2);
}

#[tokio::test]
async fn sellers_register_and_list() {
    let fx = Fixture::new().await;
    let app = make_app(&fx);

    let (status, user) = call(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "newseller", "email": "New@Example.com", "role": "seller" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "new@example.com");
    let seller: UserId = user["id"].as_str().unwrap().parse().unwrap();

    let listing = json!({
        "title": "Corner shop",
        "description": "Street-level retail",
        "location": "Old Town",
        "address": "7 Market Square",
        "price": 450000,
        "minimumBid": 400000,
        "bedrooms": 0,
        "bathrooms": 1,
        "area": 60,
        "propertyType": "Commercial",
        "images": ["https://img.example.com/shop.jpg"],
    });
    let (status, body) = call(
        &app,
        "POST",
        "/api/properties",
        Some(seller),
        Some(listing.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "available");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "POST", "/api/properties", Some(fx.buyer.id), Some(listing)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/properties/{id}"),
        Some(seller),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let (_, body) = call(&app, "GET", "/api/properties", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/properties/{id}"),
        Some(seller),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/properties/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

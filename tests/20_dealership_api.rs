mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn listing_returns_the_callers_subtree() -> Result<()> {
    let app = TestApp::new();
    let root = app.seed("root", None).await?;
    let north = app.seed("north", Some(&root)).await?;
    let _shop = app.seed("shop", Some(&north)).await?;
    let _stranger = app.seed("stranger", None).await?;

    let (status, body) = app.get("/api/dealerships", &app.token(&root)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let (status, body) = app.get("/api/dealerships", &app.token(&north)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let north_node = body["data"]
        .as_array()
        .and_then(|nodes| nodes.iter().find(|n| n["dealership_id"] == north.as_str()))
        .cloned()
        .unwrap_or_default();
    assert_eq!(north_node["sub_dealerships"][0]["name"], "shop");
    Ok(())
}

#[tokio::test]
async fn child_cannot_list_its_parent() -> Result<()> {
    let app = TestApp::new();
    let root = app.seed("root", None).await?;
    let child = app.seed("child", Some(&root)).await?;

    let (status, body) = app
        .get(&format!("/api/dealerships?dealership_id={}", root), &app.token(&child)?)
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn detail_includes_owned_records() -> Result<()> {
    let app = TestApp::new();
    let root = app.seed("root", None).await?;
    let child = app.seed("child", Some(&root)).await?;
    let token = app.token(&root)?;

    let (status, _) = app
        .post(
            "/api/customers",
            &token,
            json!({"first_name": "Ann", "last_name": "Lee", "email": "ann@example.com", "phone": "555-0101"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get(&format!("/api/dealerships/{}", root), &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "root");
    assert_eq!(body["data"]["customers"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["sub_dealerships"][0]["dealership_id"], child.as_str());
    assert_eq!(body["data"]["vehicles"], json!([]));
    assert_eq!(body["data"]["sales"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_attaches_under_caller_by_default() -> Result<()> {
    let app = TestApp::new();
    let root = app.seed("root", None).await?;

    let (status, body) = app
        .post(
            "/api/dealerships",
            &app.token(&root)?,
            json!({"name": "branch", "address": "9 Branch Rd", "parent_dealership_id": null}),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["parent_dealership_id"], root.as_str());
    Ok(())
}

#[tokio::test]
async fn reparenting_under_own_descendant_is_unprocessable() -> Result<()> {
    let app = TestApp::new();
    let root = app.seed("root", None).await?;
    let a = app.seed("a", Some(&root)).await?;
    let b = app.seed("b", Some(&a)).await?;

    let (status, body) = app
        .put(
            &format!("/api/dealerships/{}", a),
            &app.token(&root)?,
            json!({"name": "a", "address": "1 A St", "parent_dealership_id": b}),
        )
        .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    Ok(())
}

#[tokio::test]
async fn sales_listing_always_checks_the_target() -> Result<()> {
    let app = TestApp::new();
    let x = app.seed("x", None).await?;
    let y = app.seed("y", None).await?;

    let (status, _) = app.get(&format!("/api/dealerships/{}/sales", x), &app.token(&x)?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/dealerships/{}/sales", y), &app.token(&x)?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

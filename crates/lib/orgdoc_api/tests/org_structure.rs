//! Organisation hierarchy guard rails over HTTP.

mod common;

use axum::http::StatusCode;

use orgdoc_core::seed;

/// Resolve a department id by name through the API.
async fn department_id(app: &axum::Router, access: &str, name: &str) -> String {
    let resp = common::send(app, "GET", "/api/departments", Some(access), None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    body["departments"]
        .as_array()
        .expect("departments array")
        .iter()
        .find(|d| d["name"] == name)
        .unwrap_or_else(|| panic!("department {name} not found"))["id"]
        .as_str()
        .expect("id")
        .to_string()
}

#[tokio::test]
async fn creation_guards_reject_duplicates_and_unknown_parents() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);
    let (access, _) = common::login(&app, "admin", seed::DEMO_PASSWORD).await;

    // Department names are globally unique.
    let resp = common::send(
        &app,
        "POST",
        "/api/departments",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Engineering" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // A division cannot hang off a parent that does not exist.
    let resp = common::send(
        &app,
        "POST",
        "/api/divisions",
        Some(&access),
        None,
        Some(serde_json::json!({
            "name": "Orphan",
            "departmentId": "00000000-0000-0000-0000-000000000000"
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Sibling division names collide; the same name under another
    // department does not.
    let engineering = department_id(&app, &access, "Engineering").await;
    let operations = department_id(&app, &access, "Operations").await;

    let resp = common::send(
        &app,
        "POST",
        "/api/divisions",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Platform", "departmentId": engineering })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = common::send(
        &app,
        "POST",
        "/api/divisions",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Platform", "departmentId": operations })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Blank names never reach the database.
    let resp = common::send(
        &app,
        "POST",
        "/api/departments",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "   " })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn deletion_is_blocked_until_the_subtree_is_empty() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);
    let (access, _) = common::login(&app, "admin", seed::DEMO_PASSWORD).await;

    // Seeded Engineering still has divisions attached.
    let engineering = department_id(&app, &access, "Engineering").await;
    let resp = common::send(
        &app,
        "DELETE",
        &format!("/api/departments/{engineering}"),
        Some(&access),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Build a fresh three-level branch, then tear it down leaf-first.
    let resp = common::send(
        &app,
        "POST",
        "/api/departments",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Research" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let research = common::read_json(resp).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let resp = common::send(
        &app,
        "POST",
        "/api/divisions",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Labs", "departmentId": research })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let labs = common::read_json(resp).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let resp = common::send(
        &app,
        "POST",
        "/api/units",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Optics", "divisionId": labs })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let optics = common::read_json(resp).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    // Parent deletion is refused while a child exists.
    let resp = common::send(
        &app,
        "DELETE",
        &format!("/api/divisions/{labs}"),
        Some(&access),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    for uri in [
        format!("/api/units/{optics}"),
        format!("/api/divisions/{labs}"),
        format!("/api/departments/{research}"),
    ] {
        let resp = common::send(&app, "DELETE", &uri, Some(&access), None, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{uri}");
    }

    let resp = common::send(
        &app,
        "GET",
        &format!("/api/departments/{research}"),
        Some(&access),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn unit_names_are_scoped_to_their_division() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);
    let (access, _) = common::login(&app, "admin", seed::DEMO_PASSWORD).await;

    let resp = common::send(&app, "GET", "/api/divisions", Some(&access), None, None).await;
    let body = common::read_json(resp).await;
    let divisions = body["divisions"].as_array().expect("divisions");
    let platform = divisions
        .iter()
        .find(|d| d["name"] == "Platform")
        .expect("Platform division")["id"]
        .as_str()
        .expect("id")
        .to_string();
    let product = divisions
        .iter()
        .find(|d| d["name"] == "Product")
        .expect("Product division")["id"]
        .as_str()
        .expect("id")
        .to_string();

    // "Storage" already exists under Platform.
    let resp = common::send(
        &app,
        "POST",
        "/api/units",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Storage", "divisionId": platform })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = common::send(
        &app,
        "POST",
        "/api/units",
        Some(&access),
        None,
        Some(serde_json::json!({ "name": "Storage", "divisionId": product })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    db.stop().await.expect("db stop");
}

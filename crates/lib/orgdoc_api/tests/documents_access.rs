//! Document visibility and capability enforcement over HTTP.

mod common;

use axum::Router;
use axum::http::StatusCode;

use orgdoc_core::models::user::NewUser;
use orgdoc_core::seed;

/// Titles of the documents the given session can see.
async fn visible_titles(app: &Router, access: &str) -> Vec<String> {
    let resp = common::send(app, "GET", "/api/documents", Some(access), None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    let mut titles: Vec<String> = body["documents"]
        .as_array()
        .expect("documents array")
        .iter()
        .map(|d| d["title"].as_str().expect("title").to_string())
        .collect();
    titles.sort();
    titles
}

/// Resolve a visible document id by title.
async fn document_id(app: &Router, access: &str, title: &str) -> String {
    let resp = common::send(app, "GET", "/api/documents", Some(access), None, None).await;
    let body = common::read_json(resp).await;
    body["documents"]
        .as_array()
        .expect("documents array")
        .iter()
        .find(|d| d["title"] == title)
        .unwrap_or_else(|| panic!("document {title} not visible"))["id"]
        .as_str()
        .expect("id")
        .to_string()
}

#[tokio::test]
async fn visibility_follows_flat_placement() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    // asmith sits in Engineering / Platform / Storage and sees all
    // three seeded documents.
    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;
    assert_eq!(
        visible_titles(&app, &asmith).await,
        vec!["Employee handbook", "Platform roadmap", "Storage runbook"]
    );

    // bjones is in Engineering / Product: the division-scoped roadmap
    // belongs to a sibling division and stays hidden. Department
    // placement grants nothing at division or unit scope.
    let (bjones, _) = common::login(&app, "bjones", seed::DEMO_PASSWORD).await;
    assert_eq!(visible_titles(&app, &bjones).await, vec!["Employee handbook"]);

    // cdavis is in a different department entirely.
    let (cdavis, _) = common::login(&app, "cdavis", seed::DEMO_PASSWORD).await;
    assert_eq!(visible_titles(&app, &cdavis).await, vec!["Employee handbook"]);

    // admin has every capability but no placement: capabilities do not
    // widen visibility.
    let (admin, _) = common::login(&app, "admin", seed::DEMO_PASSWORD).await;
    assert_eq!(visible_titles(&app, &admin).await, vec!["Employee handbook"]);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn invisible_documents_return_not_found_by_id() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;
    let (bjones, _) = common::login(&app, "bjones", seed::DEMO_PASSWORD).await;

    let runbook = document_id(&app, &asmith, "Storage runbook").await;

    // Same id, different viewer: invisible behaves like nonexistent.
    let resp = common::send(
        &app,
        "GET",
        &format!("/api/documents/{runbook}"),
        Some(&bjones),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = common::send(
        &app,
        "GET",
        &format!("/api/documents/{runbook}/versions"),
        Some(&bjones),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn upload_and_delete_capabilities_are_enforced() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    let upload_body = serde_json::json!({
        "title": "Quarterly report",
        "filePath": "/docs/quarterly-report.pdf",
        "fileType": "application/pdf",
        "fileSize": 123456,
        "privacyScope": "department"
    });

    // Viewers cannot upload at all.
    let (bjones, _) = common::login(&app, "bjones", seed::DEMO_PASSWORD).await;
    let resp = common::send(
        &app,
        "POST",
        "/api/documents",
        Some(&bjones),
        None,
        Some(upload_body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // asmith (contributor) uploads a department-scoped document.
    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;
    let engineering = orgdoc_core::org::list_departments(&pool, None)
        .await
        .expect("departments")
        .into_iter()
        .find(|d| d.name == "Engineering")
        .expect("Engineering");
    let mut body = upload_body.clone();
    body["departmentId"] = serde_json::json!(engineering.id.to_string());
    let resp = common::send(&app, "POST", "/api/documents", Some(&asmith), None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let report = common::read_json(resp).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    // Department-scoped: a colleague elsewhere in Engineering sees it.
    assert!(
        visible_titles(&app, &bjones)
            .await
            .contains(&"Quarterly report".to_string())
    );

    // The uploader cannot delete without the delete capability.
    let resp = common::send(
        &app,
        "DELETE",
        &format!("/api/documents/{report}"),
        Some(&asmith),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // admin holds the delete capability but no placement, so the
    // document is not even visible to them.
    let (admin, _) = common::login(&app, "admin", seed::DEMO_PASSWORD).await;
    let resp = common::send(
        &app,
        "DELETE",
        &format!("/api/documents/{report}"),
        Some(&admin),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A deleter placed inside Engineering can see it and remove it.
    let admin_role = orgdoc_core::roles::list_roles(&pool)
        .await
        .expect("roles")
        .into_iter()
        .find(|r| r.name == "admin")
        .expect("admin role");
    orgdoc_core::users::create_user(
        &pool,
        NewUser {
            username: "dana".into(),
            email: "dana@orgdoc.local".into(),
            password: "Dana1234!".into(),
            first_name: "Dana".into(),
            last_name: "Reed".into(),
            role_id: admin_role.id,
            department_id: Some(engineering.id),
            division_id: None,
            unit_id: None,
        },
    )
    .await
    .expect("create dana");

    let (dana, _) = common::login(&app, "dana", "Dana1234!").await;
    let resp = common::send(
        &app,
        "DELETE",
        &format!("/api/documents/{report}"),
        Some(&dana),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Deactivated documents vanish from every view.
    let resp = common::send(
        &app,
        "GET",
        &format!("/api/documents/{report}"),
        Some(&asmith),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn versions_inherit_scope_and_list_newest_first() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;
    let runbook = document_id(&app, &asmith, "Storage runbook").await;

    let resp = common::send(
        &app,
        "POST",
        &format!("/api/documents/{runbook}/versions"),
        Some(&asmith),
        None,
        Some(serde_json::json!({
            "filePath": "/docs/storage-runbook-v2.md",
            "fileType": "text/markdown",
            "fileSize": 35012
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let v2 = common::read_json(resp).await;
    assert_eq!(v2["versionNumber"], 2);
    assert_eq!(v2["title"], "Storage runbook");
    assert_eq!(v2["privacyScope"], "unit");

    let resp = common::send(
        &app,
        "GET",
        &format!("/api/documents/{runbook}/versions"),
        Some(&asmith),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    let numbers: Vec<i64> = body["versions"]
        .as_array()
        .expect("versions")
        .iter()
        .map(|d| d["versionNumber"].as_i64().expect("versionNumber"))
        .collect();
    assert_eq!(numbers, vec![2, 1]);

    // No visibility, no versioning.
    let (bjones, _) = common::login(&app, "bjones", seed::DEMO_PASSWORD).await;
    let resp = common::send(
        &app,
        "POST",
        &format!("/api/documents/{runbook}/versions"),
        Some(&bjones),
        None,
        Some(serde_json::json!({
            "filePath": "/docs/sneaky.md",
            "fileType": "text/markdown",
            "fileSize": 1
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn search_is_bounded_by_visibility() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;
    let (cdavis, _) = common::login(&app, "cdavis", seed::DEMO_PASSWORD).await;

    let resp = common::send(
        &app,
        "GET",
        "/api/documents/search?q=runbook",
        Some(&asmith),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let hits = common::read_json(resp).await;
    assert_eq!(hits["documents"].as_array().expect("documents").len(), 1);

    // Same query, viewer outside the unit: nothing.
    let resp = common::send(
        &app,
        "GET",
        "/api/documents/search?q=runbook",
        Some(&cdavis),
        None,
        None,
    )
    .await;
    let hits = common::read_json(resp).await;
    assert!(hits["documents"].as_array().expect("documents").is_empty());

    // Description text matches too.
    let resp = common::send(
        &app,
        "GET",
        "/api/documents/search?q=onboarding",
        Some(&cdavis),
        None,
        None,
    )
    .await;
    let hits = common::read_json(resp).await;
    assert_eq!(
        hits["documents"].as_array().expect("documents")[0]["title"],
        "Employee handbook"
    );

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn scoped_uploads_require_a_matching_placement_reference() {
    let Some((mut db, pool)) = common::start_db().await else {
        return;
    };
    seed::seed_demo(&pool).await.expect("seed demo data");

    let state = common::test_state(pool.clone(), &db.connection_url());
    let app = orgdoc_api::router(state);

    let (asmith, _) = common::login(&app, "asmith", seed::DEMO_PASSWORD).await;

    // Division scope without a division reference is malformed.
    let resp = common::send(
        &app,
        "POST",
        "/api/documents",
        Some(&asmith),
        None,
        Some(serde_json::json!({
            "title": "Placeless",
            "filePath": "/docs/placeless.pdf",
            "fileType": "application/pdf",
            "fileSize": 1024,
            "privacyScope": "division"
        })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    db.stop().await.expect("db stop");
}

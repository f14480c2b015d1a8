/// Integration tests for the taskboard API
///
/// These tests drive the full stack end-to-end through the router:
/// registration and login, team lifecycle, membership rules, task
/// visibility, sub-board uniqueness, comment access, and cascade deletion.
///
/// They require a running PostgreSQL database (DATABASE_URL) and a
/// JWT_SECRET of at least 32 characters in the environment.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

/// The full happy path: register → login → create team → create task,
/// then an outsider is denied access to the task.
#[tokio::test]
async fn test_register_login_team_task_flow() {
    let ctx = TestContext::new().await.unwrap();

    let user = ctx.register_user("member").await;

    // Login returns a working token for the same account
    let (status, body) = ctx
        .request_json(
            "POST",
            "/api/users/login",
            None,
            Some(json!({
                "username": user.username,
                "password": "integration-test-pw",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"].as_str().unwrap(), user.id.to_string());
    // The password hash never appears in any response
    assert!(body["user"].get("password_hash").is_none());

    let team_id = ctx.create_team(&user).await;

    // The creator shows up as both admin and member
    let (status, body) = ctx
        .request_json("GET", &format!("/api/teams/{}", team_id), Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin_id"].as_str().unwrap(), user.id.to_string());
    assert_eq!(
        body["member_ids"].as_array().unwrap(),
        &vec![json!(user.id.to_string())]
    );

    let task_id = ctx.create_task(&user, team_id).await;

    let (status, body) = ctx
        .request_json("GET", &format!("/api/tasks/{}", task_id), Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["creator_id"].as_str().unwrap(), user.id.to_string());
    assert_eq!(body["team_id"].as_str().unwrap(), team_id.to_string());

    // A user outside the team cannot read the task
    let outsider = ctx.register_user("member").await;
    let (status, _) = ctx
        .request_json(
            "GET",
            &format!("/api/tasks/{}", task_id),
            Some(&outsider.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request_json("GET", "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request_json("GET", "/api/users/me", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_team_name_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;

    let name = format!("team-{}", uuid::Uuid::new_v4().simple());

    let (status, _) = ctx
        .request_json(
            "POST",
            "/api/teams",
            Some(&user.token),
            Some(json!({ "name": name })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .request_json(
            "POST",
            "/api/teams",
            Some(&user.token),
            Some(json!({ "name": name })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
}

#[tokio::test]
async fn test_member_management_rules() {
    let ctx = TestContext::new().await.unwrap();
    let admin = ctx.register_user("member").await;
    let member = ctx.register_user("member").await;
    let team_id = ctx.create_team(&admin).await;
    let members_uri = format!("/api/teams/{}/members", team_id);

    // Admin adds a member
    let (status, body) = ctx
        .request_json(
            "POST",
            &members_uri,
            Some(&admin.token),
            Some(json!({ "member_id": member.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["member_ids"]
        .as_array()
        .unwrap()
        .contains(&json!(member.id.to_string())));

    // Adding the same member again fails
    let (status, _) = ctx
        .request_json(
            "POST",
            &members_uri,
            Some(&admin.token),
            Some(json!({ "member_id": member.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A non-admin cannot manage membership
    let (status, _) = ctx
        .request_json(
            "POST",
            &members_uri,
            Some(&member.token),
            Some(json!({ "member_id": member.id })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The admin can never be removed
    let (status, _) = ctx
        .request_json(
            "DELETE",
            &members_uri,
            Some(&admin.token),
            Some(json!({ "member_id": admin.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Removing the regular member succeeds and updates the member list
    let (status, body) = ctx
        .request_json(
            "DELETE",
            &members_uri,
            Some(&admin.token),
            Some(json!({ "member_id": member.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["member_ids"]
        .as_array()
        .unwrap()
        .contains(&json!(member.id.to_string())));
}

#[tokio::test]
async fn test_create_task_with_invalid_due_time() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let team_id = ctx.create_team(&user).await;

    let (status, body) = ctx
        .request_json(
            "POST",
            "/api/tasks",
            Some(&user.token),
            Some(json!({
                "title": "Fix bug",
                "due_time": "not-a-date",
                "team_id": team_id,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    // Nothing was written
    let (status, body) = ctx
        .request_json("GET", "/api/tasks?page=1&limit=10", Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_task_listing_visibility_and_filter() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let team_a = ctx.create_team(&user).await;
    let team_b = ctx.create_team(&user).await;
    ctx.create_task(&user, team_a).await;
    ctx.create_task(&user, team_b).await;

    let stranger = ctx.register_user("member").await;
    let team_c = ctx.create_team(&stranger).await;
    ctx.create_task(&stranger, team_c).await;

    // The user sees only tasks from their own teams
    let (status, body) = ctx
        .request_json("GET", "/api/tasks?page=1&limit=10", Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"].as_i64().unwrap(), 2);
    for task in body["tasks"].as_array().unwrap() {
        let team_id = task["team_id"].as_str().unwrap();
        assert!(team_id == team_a.to_string() || team_id == team_b.to_string());
    }

    // Filtering by a team the user doesn't belong to fails
    let (status, _) = ctx
        .request_json(
            "GET",
            &format!("/api/tasks?page=1&limit=10&team_id={}", team_c),
            Some(&user.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Filtering by an own team narrows the listing
    let (status, body) = ctx
        .request_json(
            "GET",
            &format!("/api/tasks?page=1&limit=10&team_id={}", team_a),
            Some(&user.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_sub_board_uniqueness_within_task() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let team_id = ctx.create_team(&user).await;
    let task_1 = ctx.create_task(&user, team_id).await;
    let task_2 = ctx.create_task(&user, team_id).await;
    let boards_uri = format!("/api/tasks/{}/subboards", task_1);

    let (status, _) = ctx
        .request_json(
            "POST",
            &boards_uri,
            Some(&user.token),
            Some(json!({ "name": "Backlog" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Case-different duplicate under the same task fails
    let (status, _) = ctx
        .request_json(
            "POST",
            &boards_uri,
            Some(&user.token),
            Some(json!({ "name": "backlog" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The same name under a different task succeeds
    let (status, _) = ctx
        .request_json(
            "POST",
            &format!("/api/tasks/{}/subboards", task_2),
            Some(&user.token),
            Some(json!({ "name": "Backlog" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_task_delete_cascades() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let team_id = ctx.create_team(&user).await;
    let task_id = ctx.create_task(&user, team_id).await;

    let (status, _) = ctx
        .request_json(
            "POST",
            &format!("/api/tasks/{}/subboards", task_id),
            Some(&user.token),
            Some(json!({ "name": "Backlog" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request_json(
            "POST",
            &format!("/api/tasks/{}/comments", task_id),
            Some(&user.token),
            Some(json!({ "content": "first!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Delete the task
    let (status, body) = ctx
        .request_json(
            "DELETE",
            &format!("/api/tasks/{}", task_id),
            Some(&user.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(true));

    // Children listings now report the task as missing
    let (status, _) = ctx
        .request_json(
            "GET",
            &format!("/api/tasks/{}/subboards", task_id),
            Some(&user.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request_json(
            "GET",
            &format!("/api/tasks/{}/comments", task_id),
            Some(&user.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_flow_and_outsider_rejection() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let outsider = ctx.register_user("member").await;
    let team_id = ctx.create_team(&user).await;
    let task_id = ctx.create_task(&user, team_id).await;
    let comments_uri = format!("/api/tasks/{}/comments", task_id);

    let (status, body) = ctx
        .request_json(
            "POST",
            &comments_uri,
            Some(&user.token),
            Some(json!({ "content": "looks good" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_str().unwrap(), user.id.to_string());

    let (status, body) = ctx
        .request_json("GET", &comments_uri, Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .request_json(
            "POST",
            &comments_uri,
            Some(&outsider.token),
            Some(json!({ "content": "let me in" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.register_user("member").await;
    let team_id = ctx.create_team(&user).await;

    let (status, body) = ctx
        .request_json("GET", "/api/users/me", Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"].as_str().unwrap(), user.username);
    assert!(body["team_ids"]
        .as_array()
        .unwrap()
        .contains(&json!(team_id.to_string())));
    assert!(body.get("password_hash").is_none());

    // Update the username
    let (status, body) = ctx
        .request_json(
            "PATCH",
            "/api/users/me",
            Some(&user.token),
            Some(json!({ "username": format!("renamed-{}", uuid::Uuid::new_v4().simple()) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["username"].as_str().unwrap(), user.username);

    // Deletion is refused while the user administers a team
    let (status, _) = ctx
        .request_json("DELETE", "/api/users/me", Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

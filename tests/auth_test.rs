mod common;

use serde_json::Value;

#[tokio::test]
async fn register_and_login_user() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();

    let resp = client
        .post(app.url("/user_register"))
        .json(&serde_json::json!({
            "name": "Asha",
            "phone": phone,
            "location": "Main St",
            "password": "pw1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["message"], "User registered successfully");

    // Login with the same credentials
    let resp = client
        .post(app.url("/user_login"))
        .json(&serde_json::json!({ "phone": phone, "password": "pw1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["role"], "user");

    // The session cookie now opens the user-gated report listing.
    let resp = client.get(app.url("/report")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn login_sets_http_only_session_cookie() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_user(&app, &client, &phone, "secret_pw").await;

    let resp = client
        .post(app.url("/user_login"))
        .json(&serde_json::json!({ "phone": phone, "password": "secret_pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let cookies: Vec<String> = resp
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .collect();

    assert!(cookies
        .iter()
        .any(|c| c.starts_with("session=") && c.contains("HttpOnly")));
}

#[tokio::test]
async fn duplicate_phone_rejected_within_role_only() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_user(&app, &client, &phone, "first_pw").await;

    // Same phone in the users table: conflict, no duplicate row.
    let resp = client
        .post(app.url("/user_register"))
        .json(&serde_json::json!({
            "name": "Somebody Else",
            "phone": phone,
            "location": "Elsewhere",
            "password": "other_pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Phone already exists");

    // Original credentials still log in; the duplicate ones never took.
    common::login_user(&app, &client, &phone, "first_pw").await;

    // The same phone is fine in the volunteers table: uniqueness is per role.
    let resp = client
        .post(app.url("/volunteer_register"))
        .json(&serde_json::json!({
            "name": "Same Phone Volunteer",
            "phone": phone,
            "area": "North Ward",
            "password": "vol_pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn duplicate_volunteer_phone_rejected() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_volunteer(&app, &client, &phone, "vol_pw").await;

    let resp = client
        .post(app.url("/volunteer_register"))
        .json(&serde_json::json!({
            "name": "Copycat",
            "phone": phone,
            "area": "South Ward",
            "password": "vol_pw2"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn wrong_password_and_unknown_phone_get_same_error() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_user(&app, &client, &phone, "right_pw").await;

    let resp = client
        .post(app.url("/user_login"))
        .json(&serde_json::json!({ "phone": phone, "password": "wrong_pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let wrong_pw_body: Value = resp.json().await.unwrap();

    let resp = client
        .post(app.url("/user_login"))
        .json(&serde_json::json!({ "phone": "000-000000", "password": "right_pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let unknown_body: Value = resp.json().await.unwrap();

    // No distinction between unknown identifier and wrong password.
    assert_eq!(wrong_pw_body["error"], unknown_body["error"]);
    assert_eq!(wrong_pw_body["error"], "Invalid login");
}

#[tokio::test]
async fn default_admin_credential_logs_in() {
    let app = common::spawn_app().await;
    let client = app.new_client();

    let resp = client
        .post(app.url("/admin_login"))
        .json(&serde_json::json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["username"], "admin");

    let resp = client.get(app.url("/manage_reports")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn concurrent_admin_seeding_is_idempotent() {
    let app = common::spawn_app().await;

    // Two instances bootstrapping against the same database must both
    // succeed and leave a single working credential behind.
    let (first, second) = tokio::join!(
        cleanstreet::services::bootstrap_admin::ensure_default_admin(&app.db),
        cleanstreet::services::bootstrap_admin::ensure_default_admin(&app.db),
    );
    first.expect("first seeding attempt failed");
    second.expect("second seeding attempt failed");

    let client = app.new_client();
    common::login_admin(&app, &client).await;
}

#[tokio::test]
async fn admin_wrong_password_fails() {
    let app = common::spawn_app().await;
    let client = app.new_client();

    let resp = client
        .post(app.url("/admin_login"))
        .json(&serde_json::json!({ "username": "admin", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn logout_clears_session() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_user(&app, &client, &phone, "pw").await;
    common::login_user(&app, &client, &phone, "pw").await;

    let resp = client.get(app.url("/report")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    // Any gated route now points back at its login form.
    let resp = client.get(app.url("/report")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["login"], "/user_login");
}

#[tokio::test]
async fn fresh_login_replaces_previous_role() {
    let app = common::spawn_app().await;
    let client = app.new_client();
    let phone = common::unique_phone();
    common::register_user(&app, &client, &phone, "pw").await;
    common::login_user(&app, &client, &phone, "pw").await;

    // Logging in as admin rebuilds the session; the user role is gone.
    common::login_admin(&app, &client).await;

    let resp = client.get(app.url("/manage_reports")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(app.url("/report")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
}

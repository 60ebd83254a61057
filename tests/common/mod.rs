#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Once,
};
use tokio::sync::OnceCell;

static INIT: Once = Once::new();
static DB_SETUP: OnceCell<()> = OnceCell::const_new();
static PHONE_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "SESSION_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Keep the governor out of the way when tests hammer the forms.
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = cleanstreet::config::session::SessionConfig::from_env().unwrap();
        let _ = cleanstreet::utils::token::init_session_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Fresh client with its own cookie jar, i.e. its own session.
    pub fn new_client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build client")
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Migrate and clean once per process; every caller awaits completion so
    // no test runs against a half-prepared schema. Tests stay independent
    // through unique phone numbers rather than repeated truncation.
    DB_SETUP
        .get_or_init(|| async {
            cleanstreet::migration::Migrator::up(&db, None)
                .await
                .expect("Failed to run migrations");
            cleanup_tables(&db).await;
        })
        .await;

    cleanstreet::services::bootstrap_admin::ensure_default_admin(&db)
        .await
        .expect("Failed to seed default admin");

    let upload_config = cleanstreet::services::upload::UploadConfig {
        upload_dir: "./test_uploads".to_string(),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(cleanstreet::routes::create_routes())
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(upload_config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // Reverse dependency order.
    for table in ["reports", "volunteers", "users", "admin"] {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

pub fn unique_phone() -> String {
    let counter = PHONE_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("555-{:06}", counter)
}

/// Register a citizen and return their id. Does not log in.
pub async fn register_user(app: &TestApp, client: &Client, phone: &str, password: &str) -> i32 {
    let resp = client
        .post(app.url("/user_register"))
        .json(&serde_json::json!({
            "name": "Test Citizen",
            "phone": phone,
            "location": "Riverside",
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse register response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to register user '{}': status={}, body={}",
            phone, status, body
        );
    }
    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

pub async fn login_user(app: &TestApp, client: &Client, phone: &str, password: &str) {
    let resp = client
        .post(app.url("/user_login"))
        .json(&serde_json::json!({ "phone": phone, "password": password }))
        .send()
        .await
        .expect("Failed to log in user");
    assert_eq!(resp.status(), 200, "user login should succeed");
}

pub async fn register_volunteer(
    app: &TestApp,
    client: &Client,
    phone: &str,
    password: &str,
) -> i32 {
    let resp = client
        .post(app.url("/volunteer_register"))
        .json(&serde_json::json!({
            "name": "Test Volunteer",
            "phone": phone,
            "area": "North Ward",
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register volunteer");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse register response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to register volunteer '{}': status={}, body={}",
            phone, status, body
        );
    }
    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

pub async fn login_volunteer(app: &TestApp, client: &Client, phone: &str, password: &str) {
    let resp = client
        .post(app.url("/volunteer_login"))
        .json(&serde_json::json!({ "phone": phone, "password": password }))
        .send()
        .await
        .expect("Failed to log in volunteer");
    assert_eq!(resp.status(), 200, "volunteer login should succeed");
}

/// Log in with the seeded default administrator credential.
pub async fn login_admin(app: &TestApp, client: &Client) {
    let resp = client
        .post(app.url("/admin_login"))
        .json(&serde_json::json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .expect("Failed to log in admin");
    assert_eq!(resp.status(), 200, "admin login should succeed");
}

/// Submit a waste report as the logged-in citizen; returns the report id.
pub async fn submit_report(
    app: &TestApp,
    client: &Client,
    location: &str,
    description: &str,
) -> i32 {
    let form = reqwest::multipart::Form::new()
        .text("location", location.to_string())
        .text("description", description.to_string())
        .part(
            "image",
            reqwest::multipart::Part::bytes(b"fake image bytes".to_vec())
                .file_name("incident.jpg"),
        );

    let resp = client
        .post(app.url("/report"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit report");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse report response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to submit report: status={}, body={}", status, body);
    }
    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

/// Read a report row straight from the store.
pub async fn fetch_report(db: &DatabaseConnection, report_id: i32) -> cleanstreet::models::ReportModel {
    use sea_orm::EntityTrait;

    cleanstreet::models::Report::find_by_id(report_id)
        .one(db)
        .await
        .expect("Failed to query report")
        .expect("Report row missing")
}

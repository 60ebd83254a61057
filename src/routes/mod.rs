use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use axum::{routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    credential_routes(&rate_limit_config).merge(gated_routes(&rate_limit_config))
}

/// Credential forms: registration and the three role logins.
fn credential_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/user_register", routing::post(handlers::user::register))
        .route("/user_login", routing::post(handlers::user::login))
        .route(
            "/volunteer_register",
            routing::post(handlers::volunteer::register),
        )
        .route(
            "/volunteer_login",
            routing::post(handlers::volunteer::login),
        )
        .route("/admin_login", routing::post(handlers::admin::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Session-gated routes; each handler checks its own role.
fn gated_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Citizens
        .route(
            "/report",
            routing::get(handlers::user::list_my_reports).post(handlers::user::create_report),
        )
        // Volunteers
        .route(
            "/volunteer_dashboard",
            routing::get(handlers::volunteer::dashboard),
        )
        .route(
            "/volunteer_complete",
            routing::post(handlers::volunteer::complete),
        )
        // Administrator
        .route(
            "/manage_reports",
            routing::get(handlers::admin::manage_reports).post(handlers::admin::assign_report),
        )
        .route("/admin_approve", routing::post(handlers::admin::approve_report))
        // Session teardown
        .route("/logout", routing::get(handlers::auth::logout));

    with_optional_rate_limit(router, config.enabled, config.gated)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}

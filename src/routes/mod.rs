use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::{
    middleware::{
        admin_gate::{admin_api_gate, admin_page_gate},
        auth::auth_jwt_middleware,
    },
    state::AppState,
};

pub mod account_links;
pub mod admin;
pub mod cron;
pub mod health;
pub mod notifications;
pub mod recovery;
pub mod recruiting;
pub mod suggestions;

pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public())
        .merge(protected(state.clone()))
        .merge(admin_api(state.clone()))
        .merge(admin_pages(state))
}

fn public() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/config/public", get(health::public_config))
        .route(
            "/api/cron/surface-suggestions",
            post(cron::cron_surface_suggestions),
        )
}

fn protected(state: AppState) -> Router<AppState> {
    Router::new()
        // ! suggestions
        .route("/api/suggestions", get(suggestions::list_surfaced))
        .route(
            "/api/suggestions/surface",
            post(suggestions::surface_suggestions),
        )
        // ! account links
        .route(
            "/api/account-links",
            get(account_links::list_account_links).post(account_links::create_account_link),
        )
        .route(
            "/api/account-links/check-user",
            get(account_links::check_user),
        )
        // ! recruiting records
        .route(
            "/api/schools",
            get(recruiting::list_schools).post(recruiting::create_school),
        )
        .route(
            "/api/coaches",
            get(recruiting::list_coaches).post(recruiting::create_coach),
        )
        .route(
            "/api/interactions",
            get(recruiting::list_interactions).post(recruiting::create_interaction),
        )
        .route(
            "/api/offers",
            get(recruiting::list_offers).post(recruiting::create_offer),
        )
        .route(
            "/api/tasks",
            get(recruiting::list_tasks).post(recruiting::create_task),
        )
        .route(
            "/api/tasks/{task_id}/complete",
            post(recruiting::complete_task),
        )
        // ! recovery & notifications
        .route("/api/recovery", get(recovery::recovery_status))
        .route(
            "/api/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            post(notifications::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_jwt_middleware))
}

fn admin_api(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{user_id}/admin", patch(admin::set_admin))
        .route_layer(middleware::from_fn_with_state(state, admin_api_gate))
}

fn admin_pages(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/{*rest}", get(admin::unknown_view))
        .route_layer(middleware::from_fn_with_state(state, admin_page_gate))
}

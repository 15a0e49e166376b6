use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use modkit::{PaginationMeta, SseBroadcaster};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

/// OpenAPI documentation for the users endpoints
#[derive(OpenApi)]
#[openapi(
    info(title = "User Directory API", description = "In-memory user directory"),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::users_events,
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::UserEvent,
        PaginationMeta
    )),
    tags((name = handlers::USERS_TAG, description = "User directory CRUD and change stream"))
)]
pub struct ApiDoc;

/// CRUD routes under `/users`; the service is injected via `Extension`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service))
}

/// SSE route for user events. The broadcaster is injected per-route via `Extension`.
pub fn register_users_sse_route(router: Router, sse: SseBroadcaster<dto::UserEvent>) -> Router {
    router.route(
        "/users/events",
        get(handlers::users_events).layer(Extension(sse)),
    )
}

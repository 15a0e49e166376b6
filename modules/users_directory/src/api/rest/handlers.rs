use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    response::{IntoResponse, Json},
    Extension,
};
use modkit::{
    created_json, message_json, ok_json, ApiError, ApiResponse, ApiResult, SseBroadcaster,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    page_to_parts, CreateUserReq, ListUsersQuery, UpdateUserReq, UserDto, UserEvent,
};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub const USERS_TAG: &str = "users";

/// Ids that are not UUIDs cannot name a stored user.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        debug!(id = raw, "Unparseable user id");
        ApiError::from(DomainError::user_not_found(Uuid::nil()))
    })
}

/// List users, optionally one page at a time
#[utoipa::path(
    get,
    path = "/users",
    tag = USERS_TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users in insertion order", body = ApiResponse<Vec<UserDto>>),
        (status = 400, description = "Invalid pagination", body = ApiResponse<String>),
        (status = 500, description = "Internal server error", body = ApiResponse<String>)
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    info!(?query, "Listing users");

    if query.is_paged() {
        let page = svc.list_users_page(query.page, query.limit).await?;
        let (items, meta) = page_to_parts(page);
        return Ok(Json(ApiResponse::ok(items).with_pagination(meta)));
    }

    let users: Vec<UserDto> = svc
        .list_users()
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(users)))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found", body = ApiResponse<String>)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    info!("Getting user with id: {}", id);

    let user = svc.get_user(id).await?;
    Ok(ok_json(UserDto::from(user)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = USERS_TAG,
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = ApiResponse<UserDto>),
        (status = 400, description = "Missing fields, invalid email or malformed body", body = ApiResponse<String>),
        (status = 409, description = "Email already in use", body = ApiResponse<String>),
        (status = 500, description = "Internal server error", body = ApiResponse<String>)
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    info!(email = %req.email, "Creating user");

    let user = svc.create_user(req.into()).await?;
    Ok(created_json(UserDto::from(user)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(("id" = String, Path, description = "User UUID")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserDto>),
        (status = 400, description = "Invalid email, empty name, unchanged email or malformed body", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ApiResponse<String>),
        (status = 409, description = "Email already in use", body = ApiResponse<String>)
    )
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            // An unknown id wins over a malformed body
            svc.get_user(id).await?;
            return Err(rejection.into());
        }
    };
    info!("Updating user {} with: {:?}", id, req);

    let user = svc.update_user(id, req.into()).await?;
    Ok(ok_json(UserDto::from(user)))
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ApiResponse<String>)
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    info!("Deleting user: {}", id);

    svc.delete_user(id).await?;
    Ok(message_json("User deleted successfully"))
}

/// Live stream of user changes (Server-Sent Events, event name `users_events`)
#[utoipa::path(
    get,
    path = "/users/events",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "SSE stream of UserEvent", content_type = "text/event-stream", body = UserEvent)
    )
)]
pub async fn users_events(
    Extension(sse): Extension<SseBroadcaster<UserEvent>>,
) -> impl IntoResponse {
    info!("New SSE connection for user events");
    sse.sse_response_named("users_events")
}

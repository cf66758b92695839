//! HTTP/JSON transport.
//!
//! Every user route builds a [`CallInfo`], runs the handler through the
//! [`Pipeline`](crate::pipeline::Pipeline) and encodes the outcome. Decoding
//! failures are turned into `InvalidArgument` inside the pipeline so they are
//! logged like any other failed call.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use super::state::AppState;
use crate::core::{User, UserId};
use crate::handler::dto::UpdateUserBody;
use crate::handler::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UserHandler, methods,
};
use crate::pipeline::{CallInfo, CallResult, Reply};
use crate::status::{Code, Status};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(healthcheck))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        );

    if state.describe_enabled {
        router = router.route("/", get(describe));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Serialize)]
struct MethodDescriptor {
    name: &'static str,
    route: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceDescriptor {
    service: &'static str,
    methods: Vec<MethodDescriptor>,
}

async fn describe() -> Json<ServiceDescriptor> {
    let routes = [
        "GET /users/:id",
        "POST /users",
        "PUT /users/:id",
        "DELETE /users/:id",
        "GET /users",
    ];

    Json(ServiceDescriptor {
        service: "users.UsersService",
        methods: methods::ALL
            .into_iter()
            .zip(routes)
            .map(|(name, route)| MethodDescriptor { name, route })
            .collect(),
    })
}

async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<UserId>, PathRejection>,
) -> Response {
    let request = id
        .map(|Path(id)| GetUserRequest { id })
        .map_err(|rejection| rejection.body_text());

    serve(&state, methods::GET, &headers, request, StatusCode::OK, |handler, request| async move {
        handler.get(request).await.map(Reply::User)
    })
    .await
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let request = body
        .map(|Json(request)| request)
        .map_err(|rejection| rejection.body_text());

    serve(
        &state,
        methods::CREATE_USER,
        &headers,
        request,
        StatusCode::CREATED,
        |handler, request| async move { handler.create_user(request).await.map(Reply::User) },
    )
    .await
}

async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<UserId>, PathRejection>,
    body: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Response {
    let request = match (id, body) {
        (Ok(Path(id)), Ok(Json(body))) => Ok(body.with_id(id)),
        (Err(rejection), _) => Err(rejection.body_text()),
        (_, Err(rejection)) => Err(rejection.body_text()),
    };

    serve(
        &state,
        methods::UPDATE_USER,
        &headers,
        request,
        StatusCode::OK,
        |handler, request| async move { handler.update_user(request).await.map(Reply::User) },
    )
    .await
}

async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<UserId>, PathRejection>,
) -> Response {
    let request = id
        .map(|Path(id)| DeleteUserRequest { id })
        .map_err(|rejection| rejection.body_text());

    serve(
        &state,
        methods::DELETE_USER,
        &headers,
        request,
        StatusCode::NO_CONTENT,
        |handler, request| async move {
            handler.delete_user(request).await.map(|()| Reply::Empty)
        },
    )
    .await
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListUsersRequest>, QueryRejection>,
) -> Response {
    let request = query
        .map(|Query(request)| request)
        .map_err(|rejection| rejection.body_text());

    serve(
        &state,
        methods::LIST_USERS,
        &headers,
        request,
        StatusCode::OK,
        |handler, request| async move { handler.list_users(request).await.map(Reply::Users) },
    )
    .await
}

async fn serve<T, F, Fut>(
    state: &AppState,
    method: &'static str,
    headers: &HeaderMap,
    request: Result<T, String>,
    success: StatusCode,
    op: F,
) -> Response
where
    T: fmt::Debug + Send,
    F: FnOnce(Arc<UserHandler>, T) -> Fut + Send,
    Fut: Future<Output = CallResult> + Send,
{
    let call = CallInfo::new(method, call_id(headers), &Decoded(&request));
    let handler = Arc::clone(&state.handler);

    let outcome = state
        .pipeline
        .dispatch(&call, async move {
            let request = request.map_err(Status::invalid_argument)?;
            op(handler, request).await
        })
        .await;

    encode(&call, outcome, success)
}

/// Reuses a caller-supplied UUID request id, otherwise mints one.
fn call_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4)
}

struct Decoded<'a, T>(&'a Result<T, String>);

impl<T: fmt::Debug> fmt::Debug for Decoded<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(request) => request.fmt(f),
            Err(rejection) => write!(f, "<undecodable: {rejection}>"),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserList {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: Code,
    pub message: String,
    pub call_id: String,
}

pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn encode(call: &CallInfo, outcome: CallResult, success: StatusCode) -> Response {
    let mut response = match outcome {
        Ok(Reply::User(user)) => (success, Json(user)).into_response(),
        Ok(Reply::Users(users)) => (success, Json(UserList { users })).into_response(),
        Ok(Reply::Empty) => StatusCode::NO_CONTENT.into_response(),
        Err(status) => {
            let body = ErrorResponse {
                code: status.code(),
                message: status.message().to_string(),
                call_id: call.call_id().to_string(),
            };
            (http_status(status.code()), Json(body)).into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&call.call_id().to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

use std::sync::Arc;

use tracing::{error, info};

use super::dto::{
    CreateUserRequest, DEFAULT_LIST_LIMIT, DeleteUserRequest, GetUserRequest, ListUsersRequest,
    UpdateUserRequest,
};
use crate::core::{DomainError, User, UserId};
use crate::service::UserService;
use crate::status::Status;

/// Adapts request messages to [`UserService`] calls.
///
/// Structural checks (positive ids, non-empty names, non-negative paging)
/// fail fast here without touching the service. Domain errors are mapped
/// with [`to_status`]; internal failures never carry their detail outward.
pub struct UserHandler {
    service: Arc<UserService>,
}

impl UserHandler {
    pub fn new(service: Arc<UserService>) -> Self {
        Self { service }
    }

    pub async fn get(&self, request: GetUserRequest) -> Result<User, Status> {
        info!(uid = request.id, "get user request");
        require_positive_id(request.id)?;

        let user = self
            .service
            .get_user(request.id)
            .await
            .map_err(|err| to_status(err, "failed to get user"))?;

        let Some(user) = user else {
            return Err(Status::not_found("user not found"));
        };

        info!(uid = user.id, "get user success");
        Ok(user)
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, Status> {
        info!(name = %request.name, "create user request");
        if request.name.is_empty() {
            return Err(Status::invalid_argument("name is required"));
        }

        let user = self
            .service
            .create_user(User::new(request.name, request.age))
            .await
            .map_err(|err| to_status(err, "failed to create user"))?;

        info!(uid = user.id, name = %user.name, "create user success");
        Ok(user)
    }

    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Status> {
        info!(uid = request.id, "update user request");
        require_positive_id(request.id)?;

        let user = self
            .service
            .update_user(User::new(request.name, request.age).with_id(request.id))
            .await
            .map_err(|err| to_status(err, "failed to update user"))?;

        info!(uid = user.id, "update user success");
        Ok(user)
    }

    pub async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Status> {
        info!(uid = request.id, "delete user request");
        require_positive_id(request.id)?;

        self.service
            .delete_user(request.id)
            .await
            .map_err(|err| to_status(err, "failed to delete user"))?;

        info!(uid = request.id, "delete user success");
        Ok(())
    }

    pub async fn list_users(&self, request: ListUsersRequest) -> Result<Vec<User>, Status> {
        info!(limit = ?request.limit, offset = ?request.offset, "list users request");

        let limit = non_negative(request.limit.unwrap_or(DEFAULT_LIST_LIMIT), "limit")?;
        let offset = non_negative(request.offset.unwrap_or(0), "offset")?;

        let users = self
            .service
            .list_users(limit, offset)
            .await
            .map_err(|err| to_status(err, "failed to list users"))?;

        info!(count = users.len(), "list users success");
        Ok(users)
    }
}

fn require_positive_id(id: UserId) -> Result<(), Status> {
    if id <= 0 {
        return Err(Status::invalid_argument("invalid user id"));
    }
    Ok(())
}

fn non_negative(value: i32, field: &str) -> Result<usize, Status> {
    usize::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("{field} must not be negative")))
}

/// Maps a domain error to the nearest wire status. Internal errors are logged
/// in full and replaced by the generic message.
pub fn to_status(err: DomainError, action: &str) -> Status {
    match err {
        DomainError::Validation(message) => Status::invalid_argument(message),
        DomainError::NotFound(message) => Status::not_found(message),
        DomainError::Conflict(message) => Status::already_exists(message),
        DomainError::Internal(message) => {
            error!(error = %message, "{action}");
            Status::internal()
        }
    }
}

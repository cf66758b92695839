use serde::Deserialize;

use crate::core::UserId;

/// Omitted `limit` on a list call.
pub const DEFAULT_LIST_LIMIT: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserRequest {
    pub id: UserId,
}

/// Missing fields decode to their zero value and are rejected by the
/// handler, not by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub id: UserId,
    pub name: String,
    pub age: i32,
}

/// Body of an update; the identifier comes from the route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserBody {
    pub name: String,
    pub age: i32,
}

impl UpdateUserBody {
    pub fn with_id(self, id: UserId) -> UpdateUserRequest {
        UpdateUserRequest {
            id,
            name: self.name,
            age: self.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserRequest {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ListUsersRequest {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

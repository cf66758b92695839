//! Entry handler: request messages in, records or [`Status`](crate::status::Status) out.

pub mod dto;
pub mod user_handler;

pub use dto::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateUserRequest,
};
pub use user_handler::UserHandler;

/// Fully-qualified method names, as they appear in logs.
pub mod methods {
    pub const GET: &str = "/users.UsersService/Get";
    pub const CREATE_USER: &str = "/users.UsersService/CreateUser";
    pub const UPDATE_USER: &str = "/users.UsersService/UpdateUser";
    pub const DELETE_USER: &str = "/users.UsersService/DeleteUser";
    pub const LIST_USERS: &str = "/users.UsersService/ListUsers";

    pub const ALL: [&str; 5] = [GET, CREATE_USER, UPDATE_USER, DELETE_USER, LIST_USERS];
}

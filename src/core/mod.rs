pub mod error;
pub mod types;

pub use error::{DomainError, ErrorKind, Result};
pub use types::{User, UserId};

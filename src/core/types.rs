use serde::{Deserialize, Serialize};

/// Store-assigned user identifier. Valid identifiers are strictly positive.
pub type UserId = i32;

/// A single user record.
///
/// Records are plain values: the store hands out clones, so a `User` held by
/// a caller never aliases stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i32,
}

impl User {
    /// Creates a record that has not been stored yet (`id` is 0).
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            age,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    /// Returns true once the store has assigned an identifier.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, UserRepository};
use crate::core::{User, UserId};

/// In-memory user store.
///
/// A single reader/writer lock guards the whole container: lookups and
/// listing share it, create/update/delete take it exclusively, so writes are
/// totally ordered. Records are kept in identifier order, which is the order
/// `list` and `get_by_name` walk them in.
///
/// Waiting on the lock is cancel-safe; a caller that is dropped while queued
/// gives up its place without holding anything.
pub struct InMemoryUserRepository {
    state: RwLock<StoreState>,
}

struct StoreState {
    users: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.name == name).cloned())
    }

    async fn create(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.write().await;

        let id = state.next_id;
        // The counter only moves forward, so ids stay unique after deletes.
        state.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let stored = user.with_id(id);
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.write().await;

        let Some(slot) = state.users.get_mut(&user.id) else {
            return Err(StoreError::NotFound(user.id));
        };

        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, limit: usize, offset: usize) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

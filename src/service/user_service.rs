use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::core::{DomainError, Result, User, UserId};
use crate::storage::UserRepository;
use crate::validation::validate_user;

/// Business rules for user records on top of a [`UserRepository`].
///
/// Create and update are check-then-write sequences (name uniqueness, then
/// the store call). They run under `write_gate` so two concurrent writers
/// cannot both pass the uniqueness check for the same name. Reads and deletes
/// go straight to the store.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    write_gate: Mutex<()>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            write_gate: Mutex::new(()),
        }
    }

    /// Absence is returned as `Ok(None)`; the caller decides what it means.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        info!(uid = id, "getting user");

        let user = self.repository.get_by_id(id).await.map_err(|err| {
            error!(uid = id, error = %err, "failed to get user from repository");
            DomainError::from(err).context("failed to get user")
        })?;

        info!(uid = id, found = user.is_some(), "user fetched");
        Ok(user)
    }

    pub async fn create_user(&self, user: User) -> Result<User> {
        info!(name = %user.name, "creating user");

        if let Err(err) = validate_user(&user.name, user.age) {
            warn!(name = %user.name, error = %err, "user validation failed");
            return Err(DomainError::from(err).context("user validation failed"));
        }

        let _gate = self.write_gate.lock().await;

        let existing = self
            .repository
            .get_by_name(&user.name)
            .await
            .map_err(|err| DomainError::from(err).context("failed to check user name"))?;
        if let Some(existing) = existing {
            warn!(name = %user.name, existing_uid = existing.id, "user name already taken");
            return Err(DomainError::conflict(format!(
                "user with name {} already exists",
                user.name
            )));
        }

        let created = self.repository.create(user).await.map_err(|err| {
            error!(error = %err, "failed to create user in repository");
            DomainError::from(err).context("failed to create user")
        })?;

        debug_assert!(created.is_persisted(), "store returned a user without an id");
        info!(uid = created.id, name = %created.name, "user created successfully");
        Ok(created)
    }

    /// Replaces name and age of an existing user. Renaming onto a name held by
    /// a different user is a conflict.
    pub async fn update_user(&self, user: User) -> Result<User> {
        info!(uid = user.id, "updating user");

        let _gate = self.write_gate.lock().await;

        let current = self
            .repository
            .get_by_id(user.id)
            .await
            .map_err(|err| DomainError::from(err).context("failed to get user"))?;
        if current.is_none() {
            warn!(uid = user.id, "user to update does not exist");
            return Err(DomainError::not_found(format!("user {} not found", user.id)));
        }

        if let Err(err) = validate_user(&user.name, user.age) {
            warn!(uid = user.id, error = %err, "user validation failed");
            return Err(DomainError::from(err).context("user validation failed"));
        }

        let holder = self
            .repository
            .get_by_name(&user.name)
            .await
            .map_err(|err| DomainError::from(err).context("failed to check user name"))?;
        if let Some(holder) = holder.filter(|holder| holder.id != user.id) {
            warn!(uid = user.id, holder_uid = holder.id, name = %user.name, "user name already taken");
            return Err(DomainError::conflict(format!(
                "user with name {} already exists",
                user.name
            )));
        }

        let uid = user.id;
        let updated = self.repository.update(user).await.map_err(|err| {
            error!(uid, error = %err, "failed to update user in repository");
            DomainError::from(err).context("failed to update user")
        })?;

        info!(uid = updated.id, "user updated successfully");
        Ok(updated)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        info!(uid = id, "deleting user");

        self.repository.delete(id).await.map_err(|err| {
            error!(uid = id, error = %err, "failed to delete user in repository");
            DomainError::from(err).context("failed to delete user")
        })?;

        info!(uid = id, "user deleted successfully");
        Ok(())
    }

    pub async fn list_users(&self, limit: usize, offset: usize) -> Result<Vec<User>> {
        info!(limit, offset, "listing users");

        let users = self.repository.list(limit, offset).await.map_err(|err| {
            error!(error = %err, "failed to list users from repository");
            DomainError::from(err).context("failed to list users")
        })?;

        info!(count = users.len(), "users listed successfully");
        Ok(users)
    }
}

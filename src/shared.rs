use std::sync::{Arc, RwLock};

use crate::error::{Result, StoreError};
use crate::model::User;
use crate::UserStore;

/// A `UserStore` behind one coarse lock, for callers on several threads.
/// Lookups hand back clones because a reference cannot outlive the guard.
#[derive(Debug, Clone, Default)]
pub struct SharedUserStore {
    inner: Arc<RwLock<UserStore>>,
}

impl SharedUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: UserStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    pub fn save(&self, user: User) -> Result<User> {
        let mut store = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(store.save(user).clone())
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let store = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.find_by_id(id).cloned())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let store = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.find_by_email(email).cloned())
    }

    pub fn set_active(&self, id: i64, active: bool) -> Result<bool> {
        let mut store = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(store.set_active(id, active))
    }

    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let mut store = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(store.delete_by_id(id))
    }

    pub fn count(&self) -> Result<usize> {
        let store = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(store.count())
    }

    /// Runs `f` with the lock held for reading.
    pub fn with_store<T>(&self, f: impl FnOnce(&UserStore) -> T) -> Result<T> {
        let store = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&store))
    }
}

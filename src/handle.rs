//! Operations over a store handle that may be absent.
//!
//! Writes through an absent handle fail with [`StoreError::InvalidHandle`];
//! reads degrade to an empty result instead.

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::model::User;
use crate::UserStore;

pub fn create() -> UserStore {
    UserStore::new()
}

/// Releases the store and every record it owns. No-op when already absent.
pub fn destroy(store: &mut Option<UserStore>) {
    if let Some(store) = store.take() {
        debug!(released = store.count(), "destroying store");
    }
}

pub fn save(store: Option<&mut UserStore>, user: User) -> Result<&User> {
    match store {
        Some(store) => Ok(store.save(user)),
        None => {
            warn!(id = user.id(), "save on absent store");
            Err(StoreError::InvalidHandle)
        }
    }
}

pub fn find_by_id(store: Option<&UserStore>, id: i64) -> Option<&User> {
    store?.find_by_id(id)
}

pub fn find_by_email<'a>(store: Option<&'a UserStore>, email: &str) -> Option<&'a User> {
    store?.find_by_email(email)
}

pub fn delete_by_id(store: Option<&mut UserStore>, id: i64) -> bool {
    store.is_some_and(|s| s.delete_by_id(id))
}

pub fn count(store: Option<&UserStore>) -> usize {
    store.map_or(0, UserStore::count)
}

pub mod config;
pub mod error;
pub mod handle;
pub mod ids;
pub mod model;
pub mod parser;
pub mod session;
pub mod shared;

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::model::User;

pub use crate::error::{Result, StoreError};

/// In-memory roster of users, newest first.
#[derive(Default, Clone)]
pub struct UserStore {
    users: VecDeque<User>,
}

impl fmt::Debug for UserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserStore")
        .field("count", &self.users.len())
        .finish()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self { users: VecDeque::new() }
    }

    /// Takes ownership of `user` and places it at the front.
    /// The returned reference borrows the store-owned copy.
    pub fn save(&mut self, user: User) -> &User {
        debug!(id = user.id(), email = user.email(), "saving user");
        self.users.push_front(user);
        &self.users[0]
    }

    pub fn find_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id() == id)
    }

    /// Only the `active` flag can be changed through this reference.
    pub fn find_by_id_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id() == id)
    }

    /// First match in iteration order; emails are not unique.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email() == email)
    }

    pub fn find_all(&self) -> Vec<&User> {
        self.users.iter().collect()
    }

    pub fn find_active(&self) -> Vec<&User> {
        self.users.iter().filter(|u| u.is_active()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn set_active(&mut self, id: i64, active: bool) -> bool {
        match self.find_by_id_mut(id) {
            Some(user) => {
                user.set_active(active);
                true
            }
            None => false,
        }
    }

    /// Removes the first record with `id`. Returns false when none matches.
    pub fn delete_by_id(&mut self, id: i64) -> bool {
        let Some(pos) = self.users.iter().position(|u| u.id() == id) else {
            return false;
        };
        // Dropping the removed record releases its storage.
        self.users.remove(pos);
        debug!(id, remaining = self.users.len(), "deleted user");
        true
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(released = self.users.len(), "clearing store");
        self.users.clear();
    }
}

impl<'a> IntoIterator for &'a UserStore {
    type Item = &'a User;
    type IntoIter = std::collections::vec_deque::Iter<'a, User>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.iter()
    }
}

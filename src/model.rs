use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::ids::{IdSource, SystemClock};

pub const INACTIVE_SUFFIX: &str = " (inactive)";

/// The atomic unit of the roster
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    /// Assigned by the factory, never changed afterwards
    id: i64,

    name: String,

    /// Secondary lookup key, not unique
    email: String,

    active: bool,
}

impl User {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// `name`, suffixed with the inactive marker when the record is inactive.
    pub fn display_name(&self) -> String {
        display_name(self)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{id={}, name='{}', email='{}', active={}}}",
            self.id, self.name, self.email, self.active
        )
    }
}

pub fn display_name(user: &User) -> String {
    if user.active {
        user.name.clone()
    } else {
        format!("{}{}", user.name, INACTIVE_SUFFIX)
    }
}

/// Copies `text` into a buffer of `capacity` bytes, one of which is reserved.
/// Cuts on a char boundary so multi-byte input never splits.
pub fn truncate_to_capacity(text: &str, capacity: usize) -> String {
    let limit = capacity.saturating_sub(1);
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Builds records with ids drawn from an injected clock.
#[derive(Debug, Clone)]
pub struct UserFactory<C: IdSource = SystemClock> {
    clock: C,
    config: StoreConfig,
}

impl UserFactory<SystemClock> {
    pub fn system() -> Self {
        Self::new(SystemClock, StoreConfig::default())
    }
}

impl<C: IdSource> UserFactory<C> {
    pub fn new(clock: C, config: StoreConfig) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn create_user(&self, name: &str, email: &str) -> User {
        User {
            id: self.clock.next_id(),
            name: truncate_to_capacity(name, self.config.name_capacity),
            email: truncate_to_capacity(email, self.config.email_capacity),
            active: true,
        }
    }
}

/// Shorthand for the wall-clock factory with default bounds.
pub fn create_user(name: &str, email: &str) -> User {
    UserFactory::system().create_user(name, email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{generate_id, FixedClock};

    #[test]
    fn test_create_user_defaults() {
        let before = generate_id();
        let user = create_user("Alice", "a@x.com");
        assert!(user.is_active());
        assert!(user.id() >= before);
        assert_eq!(user.name(), "Alice");
        assert_eq!(user.email(), "a@x.com");
    }

    #[test]
    fn test_display_name_tracks_active_flag() {
        let mut user = UserFactory::new(FixedClock(1), StoreConfig::default()).create_user("Bob", "b@x.com");
        assert_eq!(user.display_name(), "Bob");

        user.set_active(false);
        assert_eq!(user.display_name(), "Bob (inactive)");

        user.set_active(true);
        assert_eq!(display_name(&user), "Bob");
    }

    #[test]
    fn test_long_name_is_truncated() {
        let long = "n".repeat(500);
        let user = create_user(&long, "e@x.com");
        assert_eq!(user.name().len(), 99);
        assert_eq!(user.email(), "e@x.com");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is two bytes; a 4-byte capacity leaves room for 3 bytes.
        assert_eq!(truncate_to_capacity("éé", 4), "é");
        assert_eq!(truncate_to_capacity("abc", 4), "abc");
        assert_eq!(truncate_to_capacity("abcd", 4), "abc");
        assert_eq!(truncate_to_capacity("abc", 1), "");
    }

    #[test]
    fn test_custom_capacity() {
        let factory = UserFactory::new(FixedClock(7), StoreConfig::new(6, 4).unwrap());
        let user = factory.create_user("Charlotte", "c@x.com");
        assert_eq!(user.id(), 7);
        assert_eq!(user.name(), "Charl");
        assert_eq!(user.email(), "c@x");
    }

    #[test]
    fn test_hash_follows_all_fields() {
        use std::collections::HashSet;

        let factory = UserFactory::new(FixedClock(11), StoreConfig::default());
        let a = factory.create_user("Ann", "a@x.com");
        let mut inactive = a.clone();
        inactive.set_active(false);

        let mut set = HashSet::new();
        assert!(set.insert(a.clone()));
        assert!(!set.insert(a));
        assert!(set.insert(inactive));
        assert!(set.insert(factory.create_user("Ann", "other@x.com")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_display_format() {
        let user = UserFactory::new(FixedClock(3), StoreConfig::default()).create_user("Dee", "d@x.com");
        assert_eq!(user.to_string(), "User{id=3, name='Dee', email='d@x.com', active=true}");
    }
}

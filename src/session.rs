use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::handle;
use crate::ids::{IdSource, SystemClock};
use crate::model::{User, UserFactory};
use crate::parser::Command;
use crate::UserStore;

/// What a command did, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Opened,
    AlreadyOpen,
    Closed { released: usize },
    Saved { user: User },
    Found { user: Option<User> },
    Deleted { id: i64, deleted: bool },
    ActiveSet { id: i64, active: bool, found: bool },
    Listed { users: Vec<User> },
    Count { count: usize },
    Cleared { released: usize },
    Help,
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Opened => write!(f, "[\u{2713} OK] Store opened."),
            Outcome::AlreadyOpen => write!(f, "[\u{2713} OK] Store already open."),
            Outcome::Closed { released } => write!(f, "[\u{2713} OK] Store closed ({} records released).", released),
            Outcome::Saved { user } => write!(f, "[\u{2713} OK] Saved ID: {} ({})", user.id(), user.display_name()),
            Outcome::Found { user: Some(user) } => write!(f, "{} | {} | {}", user.id(), user.display_name(), user.email()),
            Outcome::Found { user: None } => write!(f, "[\u{2717}] Not Found."),
            Outcome::Deleted { id, deleted: true } => write!(f, "[\u{2713} OK] Deleted ID: {}", id),
            Outcome::Deleted { id, deleted: false } => write!(f, "[\u{2717}] ID {} Not Found.", id),
            Outcome::ActiveSet { id, active, found: true } => {
                write!(f, "[\u{2713} OK] ID {} is now {}.", id, if *active { "active" } else { "inactive" })
            }
            Outcome::ActiveSet { id, found: false, .. } => write!(f, "[\u{2717}] ID {} Not Found.", id),
            Outcome::Listed { users } => {
                write!(f, "{} record(s):", users.len())?;
                for user in users {
                    write!(f, "\n  \u{2022} {} | {} | {}", user.id(), user.display_name(), user.email())?;
                }
                Ok(())
            }
            Outcome::Count { count } => write!(f, "Count: {}", count),
            Outcome::Cleared { released } => write!(f, "[\u{2713} OK] Cleared {} records.", released),
            Outcome::Help => write!(f, "{}", HELP_TEXT),
            Outcome::Exit => write!(f, "Bye."),
        }
    }
}

pub const HELP_TEXT: &str = "\
--- Available Commands ---
1. OPEN:        Create an empty store
2. CLOSE:       Destroy the store and every record in it
3. ADD:         ADD \"name\" \"email\"
4. GET:         GET <id>
5. FIND:        FIND \"email\"
6. DELETE:      DELETE <id>
7. ACTIVATE:    ACTIVATE <id> / DEACTIVATE <id>
8. LIST:        LIST [ACTIVE]
9. COUNT:       COUNT
10. CLEAR:      CLEAR
11. EXIT:       Quit";

/// Drives a store handle from parsed commands.
/// The handle starts open; `CLOSE` makes it absent until the next `OPEN`.
#[derive(Debug)]
pub struct Session<C: IdSource = SystemClock> {
    store: Option<UserStore>,
    factory: UserFactory<C>,
}

impl<C: IdSource> Session<C> {
    pub fn new(factory: UserFactory<C>) -> Self {
        Self { store: Some(handle::create()), factory }
    }

    pub fn store(&self) -> Option<&UserStore> {
        self.store.as_ref()
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Outcome> {
        let outcome = match cmd {
            Command::Open => {
                if self.store.is_some() {
                    Outcome::AlreadyOpen
                } else {
                    self.store = Some(handle::create());
                    info!("store opened");
                    Outcome::Opened
                }
            }
            Command::Close => {
                let released = handle::count(self.store.as_ref());
                handle::destroy(&mut self.store);
                Outcome::Closed { released }
            }
            Command::Add { name, email } => {
                // No id is drawn for a save that cannot land.
                if self.store.is_none() {
                    return Err(StoreError::InvalidHandle);
                }
                let user = self.factory.create_user(&name, &email);
                let saved = handle::save(self.store.as_mut(), user)?;
                Outcome::Saved { user: saved.clone() }
            }
            Command::Get { id } => Outcome::Found {
                user: handle::find_by_id(self.store.as_ref(), id).cloned(),
            },
            Command::Find { email } => Outcome::Found {
                user: handle::find_by_email(self.store.as_ref(), &email).cloned(),
            },
            Command::Delete { id } => Outcome::Deleted {
                id,
                deleted: handle::delete_by_id(self.store.as_mut(), id),
            },
            Command::SetActive { id, active } => Outcome::ActiveSet {
                id,
                active,
                found: self.store.as_mut().is_some_and(|s| s.set_active(id, active)),
            },
            Command::List { active_only } => {
                let users = match &self.store {
                    Some(store) if active_only => store.find_active().into_iter().cloned().collect(),
                    Some(store) => store.find_all().into_iter().cloned().collect(),
                    None => Vec::new(),
                };
                Outcome::Listed { users }
            }
            Command::Count => Outcome::Count { count: handle::count(self.store.as_ref()) },
            Command::Clear => {
                let released = handle::count(self.store.as_ref());
                if let Some(store) = self.store.as_mut() {
                    store.clear();
                }
                Outcome::Cleared { released }
            }
            Command::Help => Outcome::Help,
            Command::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::ids::SequenceClock;
    use crate::parser::parse_command;

    fn session() -> Session<SequenceClock> {
        Session::new(UserFactory::new(SequenceClock::new(100, 1), StoreConfig::default()))
    }

    fn run(session: &mut Session<SequenceClock>, line: &str) -> Result<Outcome> {
        session.execute(parse_command(line).unwrap())
    }

    #[test]
    fn test_add_get_delete() {
        let mut s = session();
        let saved = run(&mut s, r#"ADD "Alice" "a@x.com""#).unwrap();
        assert!(matches!(saved, Outcome::Saved { ref user } if user.id() == 100));

        let found = run(&mut s, "GET 100").unwrap();
        assert!(matches!(found, Outcome::Found { user: Some(ref u) } if u.name() == "Alice"));

        assert_eq!(run(&mut s, "DELETE 100").unwrap(), Outcome::Deleted { id: 100, deleted: true });
        assert_eq!(run(&mut s, "GET 100").unwrap(), Outcome::Found { user: None });
    }

    #[test]
    fn test_closed_store_only_rejects_writes() {
        let mut s = session();
        run(&mut s, r#"ADD "Alice" "a@x.com""#).unwrap();
        assert_eq!(run(&mut s, "CLOSE").unwrap(), Outcome::Closed { released: 1 });

        assert_eq!(run(&mut s, r#"ADD "Bob" "b@x.com""#), Err(StoreError::InvalidHandle));
        assert_eq!(run(&mut s, "COUNT").unwrap(), Outcome::Count { count: 0 });
        assert_eq!(run(&mut s, "GET 100").unwrap(), Outcome::Found { user: None });
        assert_eq!(run(&mut s, "DELETE 100").unwrap(), Outcome::Deleted { id: 100, deleted: false });
        assert_eq!(run(&mut s, "CLOSE").unwrap(), Outcome::Closed { released: 0 });

        assert_eq!(run(&mut s, "OPEN").unwrap(), Outcome::Opened);
        assert_eq!(run(&mut s, "OPEN").unwrap(), Outcome::AlreadyOpen);
        assert!(run(&mut s, r#"ADD "Bob" "b@x.com""#).is_ok());
    }

    #[test]
    fn test_rejected_add_keeps_id_sequence() {
        let mut s = session();
        run(&mut s, "CLOSE").unwrap();
        assert_eq!(run(&mut s, r#"ADD "Ann" "a@x.com""#), Err(StoreError::InvalidHandle));
        assert_eq!(run(&mut s, r#"ADD "Ann" "a@x.com""#), Err(StoreError::InvalidHandle));
        run(&mut s, "OPEN").unwrap();

        match run(&mut s, r#"ADD "Ann" "a@x.com""#).unwrap() {
            Outcome::Saved { user } => assert_eq!(user.id(), 100),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_deactivate_shows_in_listing() {
        let mut s = session();
        run(&mut s, r#"ADD "Alice" "a@x.com""#).unwrap();
        run(&mut s, r#"ADD "Bob" "b@x.com""#).unwrap();
        run(&mut s, "DEACTIVATE 100").unwrap();

        let listed = run(&mut s, "LIST").unwrap();
        let text = listed.to_string();
        assert!(text.starts_with("2 record(s):"));
        assert!(text.contains("Alice (inactive)"));

        match run(&mut s, "LIST ACTIVE").unwrap() {
            Outcome::Listed { users } => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].name(), "Bob");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_json() {
        let mut s = session();
        let outcome = run(&mut s, r#"ADD "Alice" "a@x.com""#).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "saved");
        assert_eq!(json["user"]["id"], 100);
        assert_eq!(json["user"]["active"], true);

        let count = serde_json::to_value(run(&mut s, "COUNT").unwrap()).unwrap();
        assert_eq!(count, serde_json::json!({ "outcome": "count", "count": 1 }));
    }
}

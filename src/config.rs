use clap::Args;

use crate::error::{Result, StoreError};
use crate::ids::{clock_from, generate_id, IdSource, SequenceClock};
use crate::model::UserFactory;

// Byte capacity of each text field, one byte of which is reserved for a terminator.
pub const NAME_CAPACITY: usize = 100;
pub const EMAIL_CAPACITY: usize = 100;

/// Storage bounds applied by the factory when copying text into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub name_capacity: usize,
    pub email_capacity: usize,
}

impl StoreConfig {
    pub fn new(name_capacity: usize, email_capacity: usize) -> Result<Self> {
        if name_capacity == 0 {
            return Err(StoreError::Config("name capacity must be at least 1".into()));
        }
        if email_capacity == 0 {
            return Err(StoreError::Config("email capacity must be at least 1".into()));
        }
        Ok(Self { name_capacity, email_capacity })
    }

    /// Longest name that survives the copy, in bytes.
    pub fn max_name_len(&self) -> usize {
        self.name_capacity - 1
    }

    pub fn max_email_len(&self) -> usize {
        self.email_capacity - 1
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name_capacity: NAME_CAPACITY,
            email_capacity: EMAIL_CAPACITY,
        }
    }
}

/// Command-line knobs shared by both binaries.
#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Byte capacity of the name field, terminator included
    #[clap(long, default_value_t = NAME_CAPACITY)]
    pub name_capacity: usize,

    /// Byte capacity of the email field, terminator included
    #[clap(long, default_value_t = EMAIL_CAPACITY)]
    pub email_capacity: usize,

    /// Issue sequential ids from this value instead of reading the clock
    #[clap(long)]
    pub id_start: Option<i64>,
}

impl StoreArgs {
    pub fn config(&self) -> Result<StoreConfig> {
        StoreConfig::new(self.name_capacity, self.email_capacity)
    }

    pub fn factory(&self) -> Result<UserFactory<Box<dyn IdSource>>> {
        Ok(UserFactory::new(clock_from(self.id_start), self.config()?))
    }

    /// Always sequential: seeded from `--id-start`, else from the clock once,
    /// so records created back to back never share an id.
    pub fn sequential_factory(&self) -> Result<UserFactory<SequenceClock>> {
        let start = self.id_start.unwrap_or_else(generate_id);
        Ok(UserFactory::new(SequenceClock::new(start, 1), self.config()?))
    }
}
